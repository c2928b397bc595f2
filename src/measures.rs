//! Area statistics of a result table, per observation year and class.
//!
//! Every present cell of a [`ResultTable`] is one pixel where the predicate held at that date.
//! [`measures`] counts these cells for each year and class label, converts the counts to areas
//! using the pixel [`Resolution`], and accumulates them in year order.
//!
//! ```rust
//! use lucc::measures::{area_km2, Resolution};
//!
//! let resolution = Resolution::meters(30.0).unwrap();
//! assert_eq!(area_km2(1000, resolution), 0.9);
//! ```

use std::collections::BTreeMap;

use chrono::Datelike;
use ordered_float::NotNan;
use thiserror::Error;

use crate::table::ResultTable;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MeasuresError {
    #[error("Pixel resolution must be a positive, finite number of meters, got {0}")]
    InvalidResolution(f64),
}

/// Edge length of a square pixel, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution(NotNan<f64>);

impl Resolution {
    pub fn meters(value: f64) -> Result<Self, MeasuresError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(MeasuresError::InvalidResolution(value));
        }

        NotNan::new(value)
            .map(Self)
            .map_err(|_| MeasuresError::InvalidResolution(value))
    }

    pub fn get(&self) -> f64 {
        self.0.into_inner()
    }
}

/// Area covered by `count` pixels, in square kilometers.
pub fn area_km2(count: usize, resolution: Resolution) -> f64 {
    count as f64 * resolution.get().powi(2) / 1e6
}

/// Pixel count and area of one class in one year.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasuresRow {
    pub year: i32,
    pub class: String,
    pub pixel_count: usize,
    pub area_km2: f64,

    /// Pixel count of this row and every row before it.
    pub cumulative_sum: usize,

    /// Percentage of all counted pixels falling in this row.
    pub relative_frequency: f64,
    pub cumulative_relative_frequency: f64,
}

/// Count the present cells of a table per year and class.
///
/// Rows are ordered by year, then by class name. Cells of several columns in the same year are
/// counted together. An empty table yields no rows.
pub fn measures(table: &ResultTable, resolution: Resolution) -> Vec<MeasuresRow> {
    let mut counts: BTreeMap<(i32, &str), usize> = BTreeMap::new();

    for row in table {
        for (date, label) in row.present() {
            *counts.entry((date.year(), label)).or_default() += 1;
        }
    }

    let total: usize = counts.values().sum();
    let mut cumulative_sum = 0;

    counts
        .into_iter()
        .map(|((year, class), pixel_count)| {
            cumulative_sum += pixel_count;

            MeasuresRow {
                year,
                class: class.to_string(),
                pixel_count,
                area_km2: area_km2(pixel_count, resolution),
                cumulative_sum,
                relative_frequency: pixel_count as f64 / total as f64 * 100.0,
                cumulative_relative_frequency: cumulative_sum as f64 / total as f64 * 100.0,
            }
        })
        .collect()
}
