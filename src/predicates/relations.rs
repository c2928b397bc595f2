//! Temporal orderings between the rows of two [`Holds`](super::Holds) tables.
//!
//! Both combinators join two tables on pixel coordinates, so only pixels present in both
//! survive, and then compare the span of present labels of each pair of rows. The output has the
//! union of the columns of both tables.

use chrono::NaiveDate;

use crate::table::{ResultTable, Row, TableError};
use crate::timeline::Timeline;

fn spans(first: &Row<'_>, second: &Row<'_>) -> Option<(NaiveDate, NaiveDate)> {
    Some((first.last_present()?, second.first_present()?))
}

/// Keep the pixels whose last label in `first` is observed no later than their first label in
/// `second`. Any gap between the two is allowed.
pub fn follows(first: &ResultTable, second: &ResultTable) -> Result<ResultTable, TableError> {
    first.join_with(second, |left, right| match spans(&left, &right) {
        Some((end, start)) => end <= start,
        None => false,
    })
}

/// Keep the pixels whose last label in `first` is observed at the timeline date directly before
/// their first label in `second`.
pub fn meets(first: &ResultTable, second: &ResultTable, timeline: &Timeline) -> Result<ResultTable, TableError> {
    first.join_with(second, |left, right| match spans(&left, &right) {
        Some((end, start)) => match (timeline.index_of(end), timeline.index_of(start)) {
            (Ok(end), Ok(start)) => end + 1 == start,
            _ => false,
        },
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::{follows, meets};
    use crate::predicates::fixtures::{date, timeline};
    use crate::raster::Coord;
    use crate::table::{ResultTable, TableError};

    fn table(year: i32, rows: &[((i32, i32), &str)]) -> ResultTable {
        let rows = rows
            .iter()
            .map(|(coord, label)| (Coord::from(*coord), vec![Some(label.to_string())]));

        ResultTable::from_rows(vec![date(year)], rows).unwrap()
    }

    #[test]
    fn follows_allows_gaps() -> Result<(), TableError> {
        let first = table(2001, &[((1, 1), "Forest"), ((2, 2), "Forest")]);
        let second = table(2003, &[((1, 1), "Soy"), ((3, 3), "Soy")]);
        let result = follows(&first, &second)?;

        assert_eq!(result.coords().collect::<Vec<_>>(), vec![Coord::from((1, 1))]);
        assert_eq!(result.columns(), &[date(2001), date(2003)]);

        Ok(())
    }

    #[test]
    fn follows_rejects_reverse_order() -> Result<(), TableError> {
        let first = table(2003, &[((1, 1), "Forest")]);
        let second = table(2001, &[((1, 1), "Soy")]);

        assert!(follows(&first, &second)?.is_empty());

        Ok(())
    }

    #[test]
    fn meets_requires_adjacent_dates() -> Result<(), TableError> {
        let timeline = timeline(3);
        let first = table(2001, &[((1, 1), "Forest")]);

        let next = table(2002, &[((1, 1), "Soy")]);
        assert_eq!(meets(&first, &next, &timeline)?.len(), 1);

        let later = table(2003, &[((1, 1), "Soy")]);
        assert!(meets(&first, &later, &timeline)?.is_empty());

        Ok(())
    }
}
