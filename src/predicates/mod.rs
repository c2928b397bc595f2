//! Temporal predicates over the pixels of a classified raster.
//!
//! Every predicate evaluates a [`Dataset`](crate::Dataset) into a
//! [`ResultTable`](crate::table::ResultTable) holding the pixels where the predicate is true. The
//! basic predicate is [`Holds`], which checks whether a class occupies a pixel during an
//! interval. The other predicates evaluate `Holds` over two disjoint, ordered intervals and
//! combine the two tables:
//!
//!   - [`Recur`]: a class disappears during the second interval and then comes back,
//!   - [`Evolve`]: a class is followed, at any later time, by another class,
//!   - [`Convert`]: a class is followed directly by another class at the next timeline date,
//!   - [`ConvertSweep`]: `Convert` over every pair of consecutive timeline dates.
//!
//! A `Holds` evaluation that matches no pixel is not an error. It produces an empty table, and
//! a predicate that receives an empty table logs that it cannot be applied and returns an empty
//! table itself. Malformed, overlapping, or unknown dates are errors.
//!
//! By default, predicates over two intervals drop the columns of the first interval from their
//! output, keeping only the dates at which the interesting behaviour was observed. This can be
//! disabled with the `keep_columns` method of each predicate.
//!
//! # Examples
//!
//! ```rust
//! use lucc::{Dataset, LabelSet, Predicate, Timeline};
//! use lucc::interval::Interval;
//! use lucc::predicates::{Convert, Holds};
//! use lucc::raster::{Brick, Coord};
//!
//! let timeline = Timeline::parse(["2001-09-01", "2002-09-01", "2003-09-01"]).unwrap();
//! let labels = LabelSet::new(["Forest", "Deforestation"]).unwrap();
//!
//! let mut brick = Brick::new(3);
//! brick.insert(Coord::from((5, 5)), vec![1, 1, 2]).unwrap();
//!
//! let data = Dataset::new(&brick, &timeline, &labels).unwrap();
//! let first = Interval::parse("2002-09-01", "2002-09-01").unwrap();
//! let second = Interval::parse("2003-09-01", "2003-09-01").unwrap();
//!
//! let convert = Convert::new(Holds::equals("Forest", first), Holds::equals("Deforestation", second));
//! let result = convert.evaluate(&data).unwrap();
//!
//! assert!(result.contains(&Coord::from((5, 5))));
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use crate::interval::{Interval, IntervalError};
use crate::labels::LabelError;
use crate::raster::{ClassValue, Coord};
use crate::table::{ResultTable, TableError};
use crate::timeline::{Timeline, TimelineError};

mod binary;
mod convert;
mod evolve;
mod holds;
mod recur;
pub mod relations;

pub use convert::{Convert, ConvertSweep};
pub use evolve::Evolve;
pub use holds::{Holds, HoldsAny};
pub use recur::{mask_recurrences, Recur};

/// Error produced while evaluating a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Pixel {coord} stores class value {value}, which is outside the label set")]
    InvalidClassValue { coord: Coord, value: ClassValue },
}

/// How a class has to occupy a pixel during an interval for [`Holds`] to be true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Relation {
    /// The class is observed at every date of the interval.
    #[default]
    Equals,

    /// The class is observed at one or more dates of the interval.
    Contains,
}

impl Relation {
    /// Decide the relation from the per-date matches of one pixel.
    pub fn is_satisfied(self, marks: &[bool]) -> bool {
        match self {
            Self::Equals => !marks.is_empty() && marks.iter().all(|marked| *marked),
            Self::Contains => marks.iter().any(|marked| *marked),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equals => write!(f, "equals"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown interval relation \"{0}\", expected \"equals\" or \"contains\"")]
pub struct ParseRelationError(String);

impl FromStr for Relation {
    type Err = ParseRelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equals" => Ok(Self::Equals),
            "contains" => Ok(Self::Contains),
            other => Err(ParseRelationError(other.to_string())),
        }
    }
}

/// Drop the dates of the first interval from a two-interval predicate result.
fn strip_antecedent(table: ResultTable, timeline: &Timeline, antecedent: &Interval, remove: bool) -> ResultTable {
    if remove {
        table.remove_columns(timeline.dates_within(antecedent))
    } else {
        table
    }
}
