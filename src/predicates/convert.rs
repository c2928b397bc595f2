use super::binary::BinaryPredicate;
use super::relations::meets;
use crate::dataset::Dataset;
use crate::interval::Interval;
use crate::predicates::{Holds, PredicateError};
use crate::table::ResultTable;
use crate::Predicate;

/// Predicate that is true where one class turns directly into another class.
///
/// Both operands are evaluated as [`Holds`] over their own interval, which must be disjoint and
/// in order. A pixel is kept if it appears in both tables and its last date in the first table is
/// the timeline date immediately before its first date in the second. Evaluated with
/// [`Relation::Equals`](super::Relation) on two single-date intervals, this captures a one-step
/// transition between consecutive observations.
///
/// ```rust
/// use lucc::interval::Interval;
/// use lucc::predicates::{Convert, Holds};
///
/// let forest = Holds::equals("Forest", Interval::parse("2001-09-01", "2001-09-01").unwrap());
/// let cleared = Holds::equals("Deforestation", Interval::parse("2002-09-01", "2002-09-01").unwrap());
///
/// let convert = Convert::new(forest, cleared);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convert(BinaryPredicate);

impl Convert {
    pub fn new(first: Holds, second: Holds) -> Self {
        Self(BinaryPredicate::new(first, second))
    }

    /// Keep the columns of the first interval in the output.
    pub fn keep_columns(self) -> Self {
        self.remove_columns(false)
    }

    /// Select whether the columns of the first interval are removed from the output.
    pub fn remove_columns(mut self, remove: bool) -> Self {
        self.0.remove_columns = remove;
        self
    }

    pub fn first(&self) -> &Holds {
        &self.0.first
    }

    pub fn second(&self) -> &Holds {
        &self.0.second
    }
}

impl Predicate for Convert {
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        self.0
            .evaluate("convert", data, |first, second| meets(first, second, data.timeline()))
    }
}

/// [`Convert`] between every pair of consecutive timeline dates, merged into one table.
///
/// For each pair `(t, t + 1)` the pixels where `from` is observed at `t` and `to` at `t + 1` are
/// found, and the per-pair tables are merged with an outer join. With the default column removal,
/// the output has a column for every date at which some pixel had just converted, and a pixel
/// that did not convert at a date has an absent cell there. Pairs without any conversion do not
/// interrupt the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSweep {
    from: String,
    to: String,
    remove_columns: bool,
}

impl ConvertSweep {
    pub fn new<S, T>(from: S, to: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            from: from.into(),
            to: to.into(),
            remove_columns: true,
        }
    }

    /// Keep the date before each conversion in the output.
    pub fn keep_columns(self) -> Self {
        self.remove_columns(false)
    }

    pub fn remove_columns(mut self, remove: bool) -> Self {
        self.remove_columns = remove;
        self
    }
}

impl Predicate for ConvertSweep {
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        let mut result = ResultTable::default();

        for (before, after) in data.timeline().consecutive_pairs() {
            let first = Holds::equals(self.from.as_str(), Interval::instant(before));
            let second = Holds::equals(self.to.as_str(), Interval::instant(after));
            let step = Convert::new(first, second)
                .remove_columns(self.remove_columns)
                .evaluate(data)?;

            log::debug!(
                "convert sweep {} -> {} between {} and {}: {} pixels",
                self.from,
                self.to,
                before,
                after,
                step.len()
            );

            result = result.merge(&step)?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::{Convert, ConvertSweep};
    use crate::dataset::Dataset;
    use crate::interval::{Interval, IntervalError};
    use crate::predicates::fixtures::{brick, date, labels, timeline};
    use crate::predicates::{Holds, PredicateError};
    use crate::raster::Coord;
    use crate::Predicate;

    type TestResult = Result<(), Box<dyn Error>>;

    #[test]
    fn direct_conversion() -> TestResult {
        let (timeline, labels) = (timeline(3), labels());
        let brick = brick(&labels, &[((5, 5), ["Forest", "Forest", "Deforestation"])]);
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let forest = Holds::equals("Forest", Interval::instant(date(2002)));
        let cleared = Holds::equals("Deforestation", Interval::instant(date(2003)));
        let result = Convert::new(forest, cleared).evaluate(&data)?;

        assert_eq!(result.columns(), &[date(2003)]);
        assert_eq!(result.cell(&Coord::from((5, 5)), date(2003)), Some("Deforestation"));

        Ok(())
    }

    #[test]
    fn conversion_must_be_adjacent() -> TestResult {
        let (timeline, labels) = (timeline(3), labels());
        let brick = brick(&labels, &[((5, 5), ["Forest", "Deforestation", "Deforestation"])]);
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let forest = Holds::equals("Forest", Interval::instant(date(2001)));

        let next = Holds::equals("Deforestation", Interval::instant(date(2002)));
        assert_eq!(Convert::new(forest.clone(), next).evaluate(&data)?.len(), 1);

        let later = Holds::equals("Deforestation", Interval::instant(date(2003)));
        assert!(Convert::new(forest, later).evaluate(&data)?.is_empty());

        Ok(())
    }

    #[test]
    fn reversed_intervals() -> TestResult {
        let (timeline, labels) = (timeline(3), labels());
        let brick = brick(&labels, &[((5, 5), ["Forest", "Forest", "Deforestation"])]);
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let forest = Holds::equals("Forest", Interval::instant(date(2003)));
        let cleared = Holds::equals("Deforestation", Interval::instant(date(2002)));
        let result = Convert::new(forest, cleared).evaluate(&data);

        assert!(matches!(result, Err(PredicateError::Interval(IntervalError::OutOfOrder(..)))));

        Ok(())
    }

    #[test]
    fn sweep_merges_every_step() -> TestResult {
        let (timeline, labels) = (timeline(4), labels());
        let brick = brick(
            &labels,
            &[
                ((1, 1), ["Forest", "Pasture", "Pasture", "Pasture"]),
                ((2, 2), ["Forest", "Forest", "Forest", "Pasture"]),
                ((3, 3), ["Forest", "Forest", "Forest", "Forest"]),
            ],
        );
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let result = ConvertSweep::new("Forest", "Pasture").evaluate(&data)?;

        assert_eq!(result.columns(), &[date(2002), date(2004)]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.cell(&Coord::from((1, 1)), date(2002)), Some("Pasture"));
        assert_eq!(result.cell(&Coord::from((1, 1)), date(2004)), None);
        assert_eq!(result.cell(&Coord::from((2, 2)), date(2002)), None);
        assert_eq!(result.cell(&Coord::from((2, 2)), date(2004)), Some("Pasture"));
        assert!(!result.contains(&Coord::from((3, 3))));

        Ok(())
    }

    #[test]
    fn sweep_keeping_columns() -> TestResult {
        let (timeline, labels) = (timeline(3), labels());
        let brick = brick(&labels, &[((1, 1), ["Forest", "Pasture", "Pasture"])]);
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let result = ConvertSweep::new("Forest", "Pasture").keep_columns().evaluate(&data)?;

        assert_eq!(result.columns(), &[date(2001), date(2002)]);
        assert_eq!(result.cell(&Coord::from((1, 1)), date(2001)), Some("Forest"));

        Ok(())
    }
}
