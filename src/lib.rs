#![deny(clippy::all)]

//! Allen interval predicates over classified satellite image time series.
//!
//! A classified raster stores one land cover class per pixel and observation date. This crate
//! answers questions such as "is this pixel forest throughout 2001-2003?" or "does forest turn
//! into pasture at the next observation?" for every pixel at once, and returns the pixels where
//! the answer is yes as a [`ResultTable`].
//!
//! The inputs of an evaluation are bundled into a [`Dataset`]: a [`Raster`](raster::Raster)
//! with one layer per [`Timeline`] date, and the [`LabelSet`] naming its class values. The
//! predicates live in the [`predicates`] module and the area statistics of a result in
//! [`measures`].

pub mod dataset;
pub mod interval;
pub mod labels;
pub mod measures;
#[cfg(feature = "parser")]
pub mod parser;
pub mod predicates;
pub mod raster;
pub mod table;
pub mod timeline;

use std::rc::Rc;
use std::sync::Arc;

pub use crate::dataset::Dataset;
pub use crate::labels::LabelSet;
pub use crate::predicates::PredicateError;
pub use crate::table::ResultTable;
pub use crate::timeline::Timeline;

/// Evaluate a dataset into the table of pixels where a condition holds
pub trait Predicate {
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError>;
}

impl<T> Predicate for &T
where
    T: Predicate + ?Sized,
{
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        (**self).evaluate(data)
    }
}

impl<T> Predicate for Box<T>
where
    T: Predicate + ?Sized,
{
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        (**self).evaluate(data)
    }
}

impl<T> Predicate for Rc<T>
where
    T: Predicate + ?Sized,
{
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        (**self).evaluate(data)
    }
}

impl<T> Predicate for Arc<T>
where
    T: Predicate + ?Sized,
{
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        (**self).evaluate(data)
    }
}
