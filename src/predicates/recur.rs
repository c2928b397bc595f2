use crate::dataset::Dataset;
use crate::interval::{check_ordered, Interval};
use crate::predicates::{strip_antecedent, Holds, PredicateError};
use crate::table::{Cell, ResultTable, Row, TableError};
use crate::Predicate;

/// Predicate that is true where a class disappears and then comes back.
///
/// The class must hold ([`Relation::Equals`](super::Relation)) at every date of the first
/// interval. During the second interval, which must come after the first and span two or more
/// timeline dates, the pixel must lose the class and then observe it again. Dates where the class
/// is still present before its first absence are continuations, not recurrences, and are left
/// absent in the output.
///
/// | date       | pixel (7, 7)  |
/// | ---------- | ------------- |
/// | 2001-09-01 | Forest        |
/// | 2002-09-01 | Deforestation |
/// | 2003-09-01 | Forest        |
///
/// ```rust
/// use lucc::interval::Interval;
/// use lucc::predicates::Recur;
///
/// let anchor = Interval::parse("2001-09-01", "2001-09-01").unwrap();
/// let window = Interval::parse("2002-09-01", "2003-09-01").unwrap();
///
/// let recur = Recur::new("Forest", anchor, window);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recur {
    class: String,
    first: Interval,
    second: Interval,
    remove_columns: bool,
}

impl Recur {
    pub fn new<S: Into<String>>(class: S, first: Interval, second: Interval) -> Self {
        Self {
            class: class.into(),
            first,
            second,
            remove_columns: true,
        }
    }

    /// Keep the columns of the first interval in the output.
    pub fn keep_columns(self) -> Self {
        self.remove_columns(false)
    }

    /// Select whether the columns of the first interval are removed from the output.
    pub fn remove_columns(mut self, remove: bool) -> Self {
        self.remove_columns = remove;
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn first(&self) -> Interval {
        self.first
    }

    pub fn second(&self) -> Interval {
        self.second
    }
}

impl Predicate for Recur {
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        let (first, second) = check_ordered(self.first, self.second)?;
        let anchor = Holds::equals(self.class.as_str(), first).evaluate(data)?;
        let later = Holds::contains(self.class.as_str(), second).evaluate(data)?;

        if later.columns().len() < 2 {
            log::warn!("recur cannot be applied: {} covers fewer than two timeline dates", second);

            return Ok(ResultTable::default());
        }

        if anchor.is_empty() || later.is_empty() {
            log::warn!(
                "recur cannot be applied: {} is not observed during {} and {}",
                self.class,
                first,
                second
            );

            return Ok(ResultTable::default());
        }

        let recurrences = mask_recurrences(&later)?;
        let result = anchor.join_with(&recurrences, |_, _| true)?;

        if result.is_empty() {
            log::warn!("recur cannot be applied: {} never comes back during {}", self.class, second);

            return Ok(ResultTable::default());
        }

        Ok(strip_antecedent(result, data.timeline(), &first, self.remove_columns))
    }
}

fn mask_row(row: Row<'_>) -> Option<Vec<Cell>> {
    if row.is_full() {
        return None;
    }

    let mut absent = false;

    let cells = row
        .cells()
        .iter()
        .map(|cell| {
            absent |= cell.is_none();
            if absent {
                cell.clone()
            } else {
                None
            }
        })
        .collect();

    Some(cells)
}

/// Keep only the labels observed after the first absence of each row.
///
/// Rows without any absence are dropped, as are rows left without a label once the leading
/// presences are masked.
pub fn mask_recurrences(table: &ResultTable) -> Result<ResultTable, TableError> {
    table.filter_map_rows(mask_row)
}
