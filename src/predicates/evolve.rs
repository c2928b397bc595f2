use super::binary::BinaryPredicate;
use super::relations::follows;
use crate::dataset::Dataset;
use crate::predicates::{Holds, PredicateError};
use crate::table::ResultTable;
use crate::Predicate;

/// Predicate that is true where one class is followed, at any later date, by another class.
///
/// Both operands are evaluated as [`Holds`] over their own interval, which must be disjoint and
/// in order. A pixel is kept if it appears in both tables and its last date in the first table is
/// not after its first date in the second. Using [`Relation::Contains`](super::Relation) on both
/// sides only requires each class to be observed once in its interval.
///
/// | date       | pixel (5, 5)  |
/// | ---------- | ------------- |
/// | 2001-09-01 | Forest        |
/// | 2002-09-01 | Forest        |
/// | 2003-09-01 | Deforestation |
///
/// ```rust
/// use lucc::interval::Interval;
/// use lucc::predicates::{Evolve, Holds};
///
/// let forest = Holds::equals("Forest", Interval::parse("2001-09-01", "2001-09-01").unwrap());
/// let cleared = Holds::contains("Deforestation", Interval::parse("2002-09-01", "2003-09-01").unwrap());
///
/// let evolve = Evolve::new(forest, cleared);
/// ```
///
/// The output holds the columns of the second interval only, unless
/// [`Evolve::keep_columns`] is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evolve(BinaryPredicate);

impl Evolve {
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

impl Predicate for Evolve {
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        self.0.evaluate("evolve", data, follows)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::Evolve;
    use crate::dataset::Dataset;
    use crate::interval::{Interval, IntervalError};
    use crate::predicates::fixtures::{brick, date, labels, timeline};
    use crate::predicates::{Holds, PredicateError};
    use crate::raster::Coord;
    use crate::Predicate;

    type TestResult = Result<(), Box<dyn Error>>;

    #[test]
    fn forest_evolves_into_deforestation() -> TestResult {
        let (timeline, labels) = (timeline(3), labels());
        let brick = brick(
            &labels,
            &[
                ((5, 5), ["Forest", "Forest", "Deforestation"]),
                ((6, 6), ["Forest", "Forest", "Forest"]),
                ((7, 7), ["Pasture", "Deforestation", "Deforestation"]),
            ],
        );
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let first = Holds::equals("Forest", Interval::instant(date(2001)));
        let second = Holds::contains("Deforestation", Interval::new(date(2002), date(2003))?);
        let result = Evolve::new(first, second).evaluate(&data)?;

        assert_eq!(result.coords().collect::<Vec<_>>(), vec![Coord::from((5, 5))]);
        assert_eq!(result.columns(), &[date(2002), date(2003)]);
        assert_eq!(result.cell(&Coord::from((5, 5)), date(2002)), None);
        assert_eq!(result.cell(&Coord::from((5, 5)), date(2003)), Some("Deforestation"));

        Ok(())
    }

    #[test]
    fn keep_columns() -> TestResult {
        let (timeline, labels) = (timeline(3), labels());
        let brick = brick(&labels, &[((5, 5), ["Forest", "Forest", "Deforestation"])]);
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let first = Holds::equals("Forest", Interval::new(date(2001), date(2002))?);
        let second = Holds::contains("Deforestation", Interval::instant(date(2003)));
        let result = Evolve::new(first, second).keep_columns().evaluate(&data)?;

        assert_eq!(result.columns(), &[date(2001), date(2002), date(2003)]);
        assert_eq!(result.cell(&Coord::from((5, 5)), date(2001)), Some("Forest"));

        Ok(())
    }

    #[test]
    fn empty_operand_cannot_be_applied() -> TestResult {
        let (timeline, labels) = (timeline(3), labels());
        let brick = brick(&labels, &[((5, 5), ["Forest", "Forest", "Forest"])]);
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let first = Holds::equals("Forest", Interval::instant(date(2001)));
        let second = Holds::contains("Soy", Interval::new(date(2002), date(2003))?);

        assert!(Evolve::new(first, second).evaluate(&data)?.is_empty());

        Ok(())
    }

    #[test]
    fn overlapping_intervals() -> TestResult {
        let (timeline, labels) = (timeline(3), labels());
        let brick = brick(&labels, &[((5, 5), ["Forest", "Forest", "Forest"])]);
        let data = Dataset::new(&brick, &timeline, &labels)?;

        let first = Holds::equals("Forest", Interval::new(date(2001), date(2002))?);
        let second = Holds::contains("Forest", Interval::new(date(2002), date(2003))?);
        let result = Evolve::new(first, second).evaluate(&data);

        assert!(matches!(result, Err(PredicateError::Interval(IntervalError::Overlap(..)))));

        Ok(())
    }
}
