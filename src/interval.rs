//! Closed intervals of observation dates and the Allen relations between them.
//!
//! An [`Interval`] is a pair of dates `[start, end]` with `start <= end`. Both endpoints are
//! inclusive, so an interval whose endpoints are equal denotes a single observation date.
//!
//! ```rust
//! use lucc::interval::{AllenRelation, Interval};
//!
//! let first = Interval::parse("2001-09-01", "2001-09-01").unwrap();
//! let second = Interval::parse("2002-09-01", "2003-09-01").unwrap();
//!
//! assert!(first.is_instant());
//! assert_eq!(first.relation_to(&second), AllenRelation::Before);
//! ```
//!
//! Predicates over two intervals require them to be disjoint and ordered, which is checked with
//! [`check_ordered`]:
//!
//! ```rust
//! use lucc::interval::{check_ordered, Interval};
//!
//! let first = Interval::parse("2001-09-01", "2002-09-01").unwrap();
//! let second = Interval::parse("2002-09-01", "2003-09-01").unwrap();
//!
//! assert!(check_ordered(first, second).is_err());  // both contain 2002-09-01
//! ```

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use thiserror::Error;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("Could not parse date \"{input}\": {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid interval: start {0} is after end {1}")]
    InvalidInterval(NaiveDate, NaiveDate),

    #[error("Intervals {0} and {1} overlap")]
    Overlap(Interval, Interval),

    #[error("Interval {0} must end before interval {1} begins")]
    OutOfOrder(Interval, Interval),
}

/// Parse a calendar date written as `YYYY-MM-DD` or `YYYY/MM/DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate, IntervalError> {
    let input = input.trim();

    DATE_FORMATS[1..]
        .iter()
        .fold(NaiveDate::parse_from_str(input, DATE_FORMATS[0]), |result, format| {
            result.or_else(|_| NaiveDate::parse_from_str(input, format))
        })
        .map_err(|source| IntervalError::InvalidDate {
            input: input.to_string(),
            source,
        })
}

/// The thirteen qualitative relations of Allen's interval algebra.
///
/// Each variant reads as "self `<relation>` other", e.g. `Before` means the receiver ends before
/// the argument starts. Relations are computed on the closed endpoints of the two intervals, so
/// `Meets` holds when the first interval ends on the same date the second one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllenRelation {
    Before,
    Meets,
    Overlaps,
    FinishedBy,
    Contains,
    Starts,
    Equals,
    StartedBy,
    During,
    Finishes,
    OverlappedBy,
    MetBy,
    After,
}

impl AllenRelation {
    /// The relation obtained by swapping the two intervals.
    pub fn inverse(self) -> Self {
        match self {
            Self::Before => Self::After,
            Self::Meets => Self::MetBy,
            Self::Overlaps => Self::OverlappedBy,
            Self::FinishedBy => Self::Finishes,
            Self::Contains => Self::During,
            Self::Starts => Self::StartedBy,
            Self::Equals => Self::Equals,
            Self::StartedBy => Self::Starts,
            Self::During => Self::Contains,
            Self::Finishes => Self::FinishedBy,
            Self::OverlappedBy => Self::Overlaps,
            Self::MetBy => Self::Meets,
            Self::After => Self::Before,
        }
    }

    /// True if two intervals in this relation share no date.
    pub fn is_disjoint(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }
}

/// A closed interval of dates `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: NaiveDate,
    end: NaiveDate,
}

impl Interval {
    /// Create an interval, failing if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::InvalidInterval(start, end));
        }

        Ok(Self { start, end })
    }

    /// Parse both endpoints and create an interval from them.
    pub fn parse(start: &str, end: &str) -> Result<Self, IntervalError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Create an interval covering a single date.
    pub fn instant(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Compute the Allen relation between this interval and `other`.
    pub fn relation_to(&self, other: &Interval) -> AllenRelation {
        use std::cmp::Ordering::{Equal, Greater, Less};

        if self.end < other.start {
            return AllenRelation::Before;
        }

        if other.end < self.start {
            return AllenRelation::After;
        }

        if self.end == other.start && self.start < other.start && self.end < other.end {
            return AllenRelation::Meets;
        }

        if other.end == self.start && other.start < self.start && other.end < self.end {
            return AllenRelation::MetBy;
        }

        match (self.start.cmp(&other.start), self.end.cmp(&other.end)) {
            (Equal, Equal) => AllenRelation::Equals,
            (Equal, Less) => AllenRelation::Starts,
            (Equal, Greater) => AllenRelation::StartedBy,
            (Greater, Equal) => AllenRelation::Finishes,
            (Less, Equal) => AllenRelation::FinishedBy,
            (Greater, Less) => AllenRelation::During,
            (Less, Greater) => AllenRelation::Contains,
            (Less, Less) => AllenRelation::Overlaps,
            (Greater, Greater) => AllenRelation::OverlappedBy,
        }
    }

    /// True if the two intervals share at least one date.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !self.relation_to(other).is_disjoint()
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Fail if the two intervals share any date, otherwise return them unchanged.
pub fn check_disjoint(first: Interval, second: Interval) -> Result<(Interval, Interval), IntervalError> {
    if first.overlaps(&second) {
        return Err(IntervalError::Overlap(first, second));
    }

    Ok((first, second))
}

/// Fail unless `first` ends strictly before `second` begins.
pub fn check_ordered(first: Interval, second: Interval) -> Result<(Interval, Interval), IntervalError> {
    let (first, second) = check_disjoint(first, second)?;

    match first.relation_to(&second) {
        AllenRelation::Before => Ok((first, second)),
        _ => Err(IntervalError::OutOfOrder(first, second)),
    }
}
