use crate::dataset::Dataset;
use crate::interval::check_ordered;
use crate::predicates::{strip_antecedent, Holds, PredicateError};
use crate::table::{ResultTable, TableError};
use crate::Predicate;

/// Two `Holds` operands over ordered, disjoint intervals, shared by `Evolve` and `Convert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct BinaryPredicate {
    pub(super) first: Holds,
    pub(super) second: Holds,
    pub(super) remove_columns: bool,
}

impl BinaryPredicate {
    pub(super) fn new(first: Holds, second: Holds) -> Self {
        Self {
            first,
            second,
            remove_columns: true,
        }
    }

    pub(super) fn evaluate<F>(&self, name: &str, data: &Dataset<'_>, combine: F) -> Result<ResultTable, PredicateError>
    where
        F: FnOnce(&ResultTable, &ResultTable) -> Result<ResultTable, TableError>,
    {
        let (antecedent, _) = check_ordered(self.first.interval(), self.second.interval())?;
        let first = self.first.evaluate(data)?;
        let second = self.second.evaluate(data)?;

        for (operand, table) in [(&self.first, &first), (&self.second, &second)] {
            if table.is_empty() {
                log::warn!(
                    "{} cannot be applied: {} does not hold ({}) at any pixel during {}",
                    name,
                    operand.class(),
                    operand.relation(),
                    operand.interval()
                );

                return Ok(ResultTable::default());
            }
        }

        let combined = combine(&first, &second)?;

        if combined.is_empty() {
            log::warn!(
                "{} cannot be applied: no pixel goes from {} to {}",
                name,
                self.first.class(),
                self.second.class()
            );

            return Ok(ResultTable::default());
        }

        Ok(strip_antecedent(combined, data.timeline(), &antecedent, self.remove_columns))
    }
}
