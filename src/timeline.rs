//! The ordered sequence of observation dates shared by every layer of a raster.
//!
//! A [`Timeline`] holds one date per raster layer, in layer order. Dates are strictly increasing,
//! so an index into the timeline is also an index into the raster layers and the column order of
//! every [`ResultTable`](crate::table::ResultTable) follows from it.
//!
//! ```rust
//! use lucc::Timeline;
//! use lucc::interval::Interval;
//!
//! let timeline = Timeline::parse(["2001-09-01", "2002-09-01", "2003-09-01"]).unwrap();
//! let layers = timeline.resolve(&Interval::parse("2002-09-01", "2003-09-01").unwrap()).unwrap();
//!
//! assert_eq!(layers, 1..=2);
//! ```

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use nonempty::NonEmpty;
use thiserror::Error;

use crate::interval::{parse_date, Interval, IntervalError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("Timeline must contain at least one date")]
    Empty,

    #[error("Timeline dates must be strictly increasing, found {0} followed by {1}")]
    NotIncreasing(NaiveDate, NaiveDate),

    #[error("Date {0} is not part of the timeline")]
    DateNotFound(NaiveDate),

    #[error("Invalid timeline date: {0}")]
    InvalidDate(#[from] IntervalError),
}

/// Strictly increasing, non-empty sequence of observation dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline(NonEmpty<NaiveDate>);

impl Timeline {
    /// Create a timeline from dates given in layer order.
    pub fn new<I>(dates: I) -> Result<Self, TimelineError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let dates: Vec<NaiveDate> = dates.into_iter().collect();

        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(TimelineError::NotIncreasing(pair[0], pair[1]));
        }

        NonEmpty::from_vec(dates).map(Self).ok_or(TimelineError::Empty)
    }

    /// Parse each date and create a timeline from them.
    pub fn parse<I, S>(dates: I) -> Result<Self, TimelineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dates = dates
            .into_iter()
            .map(|date| parse_date(date.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(dates)
    }

    /// Number of dates, equal to the number of raster layers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a timeline holds at least one date.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> NaiveDate {
        *self.0.first()
    }

    pub fn last(&self) -> NaiveDate {
        *self.0.last()
    }

    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    /// Layer index of a date. The date must be an exact member of the timeline.
    pub fn index_of(&self, date: NaiveDate) -> Result<usize, TimelineError> {
        self.0
            .iter()
            .position(|candidate| *candidate == date)
            .ok_or(TimelineError::DateNotFound(date))
    }

    /// Layer indices covered by an interval. Both endpoints must be timeline dates.
    pub fn resolve(&self, interval: &Interval) -> Result<RangeInclusive<usize>, TimelineError> {
        let start = self.index_of(interval.start())?;
        let end = self.index_of(interval.end())?;

        Ok(start..=end)
    }

    /// All timeline dates that fall inside an interval, whether or not its endpoints are
    /// timeline dates.
    pub fn dates_within(&self, interval: &Interval) -> impl Iterator<Item = NaiveDate> + '_ {
        let interval = *interval;
        self.iter().filter(move |date| interval.contains(*date))
    }

    /// Every pair of adjacent dates, in order.
    pub fn consecutive_pairs(&self) -> impl Iterator<Item = (NaiveDate, NaiveDate)> + '_ {
        self.iter().zip(self.iter().skip(1))
    }
}
