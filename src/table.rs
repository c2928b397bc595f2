//! Sparse, coordinate-keyed tables of class labels over dated columns.
//!
//! A [`ResultTable`] is the output of every predicate. Each row belongs to a unique pixel
//! [`Coord`] and holds one [`Cell`] per column, where the columns are strictly increasing
//! timeline dates. A cell is either the label of the class observed at that date, or `None` when
//! the class was absent. Rows in which every cell is absent are never stored, so a coordinate
//! appears in a table only if the predicate held there at least once.
//!
//! Tables are never modified after construction. The algebra below builds new tables instead:
//!
//!   - [`ResultTable::from_rows`] collapses duplicate rows for the same coordinate,
//!   - [`ResultTable::remove_columns`] drops dated columns,
//!   - [`ResultTable::merge`] is an outer join on coordinates,
//!   - [`ResultTable::join_with`] is an inner join on coordinates with a row filter.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lucc::raster::Coord;
//! use lucc::table::ResultTable;
//!
//! let d1 = NaiveDate::from_ymd_opt(2001, 9, 1).unwrap();
//! let d2 = NaiveDate::from_ymd_opt(2002, 9, 1).unwrap();
//!
//! let first = ResultTable::from_rows(vec![d1], [(Coord::from((1, 1)), vec![Some("Forest".to_string())])]).unwrap();
//! let second = ResultTable::from_rows(vec![d2], [(Coord::from((2, 2)), vec![Some("Pasture".to_string())])]).unwrap();
//!
//! let merged = first.merge(&second).unwrap();
//!
//! assert_eq!(merged.columns(), &[d1, d2]);
//! assert_eq!(merged.cell(&Coord::from((1, 1)), d2), None);
//! assert_eq!(merged.cell(&Coord::from((2, 2)), d2), Some("Pasture"));
//! ```

use std::collections::btree_map::{self, Entry};
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use thiserror::Error;

use crate::raster::Coord;

/// Class label observed at a date, or `None` if the class was absent.
pub type Cell = Option<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Table columns must be strictly increasing dates")]
    UnorderedColumns,

    #[error("Row {coord} has {found} cells, expected {expected}")]
    RowWidth { coord: Coord, expected: usize, found: usize },

    #[error("Conflicting labels at {coord} on {date}: \"{left}\" and \"{right}\"")]
    Conflict {
        coord: Coord,
        date: NaiveDate,
        left: String,
        right: String,
    },
}

/// Borrowed view of a single table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    coord: Coord,
    columns: &'a [NaiveDate],
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    /// Label at a date, or `None` if absent or the date is not a column.
    pub fn get(&self, date: NaiveDate) -> Option<&'a str> {
        self.columns
            .binary_search(&date)
            .ok()
            .and_then(|index| self.cells[index].as_deref())
    }

    /// Iterate over `(date, label)` pairs for every column.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<&'a str>)> + 'a {
        let cells = self.cells;
        self.columns
            .iter()
            .zip(cells)
            .map(|(date, cell)| (*date, cell.as_deref()))
    }

    /// Iterate over the dates where a label is present.
    pub fn present(&self) -> impl Iterator<Item = (NaiveDate, &'a str)> + 'a {
        self.iter().filter_map(|(date, cell)| cell.map(|label| (date, label)))
    }

    pub fn first_present(&self) -> Option<NaiveDate> {
        self.present().next().map(|(date, _)| date)
    }

    pub fn last_present(&self) -> Option<NaiveDate> {
        self.present().last().map(|(date, _)| date)
    }

    /// True if every column holds a label.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Sparse table of class labels keyed by pixel coordinate.
///
/// See the [`table`](crate::table) module for more information about the semantics of this type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultTable {
    columns: Vec<NaiveDate>,
    rows: BTreeMap<Coord, Vec<Cell>>,
}

fn check_columns(columns: &[NaiveDate]) -> Result<(), TableError> {
    if columns.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(TableError::UnorderedColumns);
    }

    Ok(())
}

fn union_columns(left: &[NaiveDate], right: &[NaiveDate]) -> Vec<NaiveDate> {
    left.iter()
        .chain(right)
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Re-index the cells of a row from one column set onto another, leaving new columns absent.
fn reshape(cells: &[Cell], from: &[NaiveDate], to: &[NaiveDate]) -> Vec<Cell> {
    to.iter()
        .map(|date| match from.binary_search(date) {
            Ok(index) => cells[index].clone(),
            Err(_) => None,
        })
        .collect()
}

impl ResultTable {
    /// Create a table with the given columns and no rows.
    pub fn new(columns: Vec<NaiveDate>) -> Result<Self, TableError> {
        check_columns(&columns)?;

        Ok(Self {
            columns,
            rows: BTreeMap::new(),
        })
    }

    /// Create a table from rows that may repeat a coordinate.
    ///
    /// Rows sharing a coordinate are combined cell by cell: a label wins over an absent cell and
    /// identical labels collapse into one. Two different labels for the same coordinate and date
    /// produce [`TableError::Conflict`]. Rows without any label are dropped.
    pub fn from_rows<I>(columns: Vec<NaiveDate>, rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (Coord, Vec<Cell>)>,
    {
        let mut table = Self::new(columns)?;

        for (coord, cells) in rows {
            table.insert_row(coord, cells)?;
        }

        Ok(table)
    }

    fn insert_row(&mut self, coord: Coord, cells: Vec<Cell>) -> Result<(), TableError> {
        if cells.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                coord,
                expected: self.columns.len(),
                found: cells.len(),
            });
        }

        if cells.iter().all(Option::is_none) {
            return Ok(());
        }

        match self.rows.entry(coord) {
            Entry::Vacant(entry) => {
                entry.insert(cells);
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut().iter_mut();

                for ((date, current), incoming) in self.columns.iter().zip(existing).zip(cells) {
                    let incoming = match incoming {
                        Some(label) => label,
                        None => continue,
                    };

                    match current {
                        None => *current = Some(incoming),
                        Some(label) if *label == incoming => {}
                        Some(label) => {
                            return Err(TableError::Conflict {
                                coord,
                                date: *date,
                                left: label.clone(),
                                right: incoming,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }

    pub fn columns(&self) -> &[NaiveDate] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no pixel satisfied the predicate that produced this table.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, coord: &Coord) -> bool {
        self.rows.contains_key(coord)
    }

    pub fn row(&self, coord: &Coord) -> Option<Row<'_>> {
        self.rows.get_key_value(coord).map(|(coord, cells)| Row {
            coord: *coord,
            columns: &self.columns,
            cells,
        })
    }

    /// Label at a coordinate and date, or `None` if absent.
    pub fn cell(&self, coord: &Coord, date: NaiveDate) -> Option<&str> {
        self.row(coord).and_then(|row| row.get(date))
    }

    /// Coordinates of every row in ascending order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.rows.keys().copied()
    }

    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Create a table without the given dates. Rows left without any label are dropped.
    pub fn remove_columns<I>(&self, dates: I) -> ResultTable
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let removed: BTreeSet<NaiveDate> = dates.into_iter().collect();
        let columns: Vec<NaiveDate> = self
            .columns
            .iter()
            .copied()
            .filter(|date| !removed.contains(date))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|(coord, cells)| (*coord, reshape(cells, &self.columns, &columns)))
            .filter(|(_, cells)| cells.iter().any(Option::is_some))
            .collect();

        ResultTable { columns, rows }
    }

    /// Outer join on coordinates over the union of both column sets.
    ///
    /// A pixel missing from one table has absent cells for that table's columns. Merging a table
    /// with itself yields the same table.
    pub fn merge(&self, other: &ResultTable) -> Result<ResultTable, TableError> {
        let columns = union_columns(&self.columns, &other.columns);
        let left = self
            .rows
            .iter()
            .map(|(coord, cells)| (*coord, reshape(cells, &self.columns, &columns)));
        let right = other
            .rows
            .iter()
            .map(|(coord, cells)| (*coord, reshape(cells, &other.columns, &columns)));
        let rows: Vec<_> = left.chain(right).collect();

        ResultTable::from_rows(columns, rows)
    }

    /// Inner join on coordinates over the union of both column sets, keeping only the pairs of
    /// rows accepted by `keep`.
    pub fn join_with<F>(&self, other: &ResultTable, keep: F) -> Result<ResultTable, TableError>
    where
        F: Fn(Row<'_>, Row<'_>) -> bool,
    {
        let columns = union_columns(&self.columns, &other.columns);
        let mut rows = Vec::new();

        for left in self {
            let right = match other.row(&left.coord) {
                Some(right) => right,
                None => continue,
            };

            if keep(left, right) {
                rows.push((left.coord, reshape(left.cells, &self.columns, &columns)));
                rows.push((right.coord, reshape(right.cells, &other.columns, &columns)));
            }
        }

        ResultTable::from_rows(columns, rows)
    }

    /// Create a table with the same columns by rewriting or discarding each row.
    pub fn filter_map_rows<F>(&self, mut f: F) -> Result<ResultTable, TableError>
    where
        F: FnMut(Row<'_>) -> Option<Vec<Cell>>,
    {
        let rows: Vec<_> = self
            .iter()
            .filter_map(|row| f(row).map(|cells| (row.coord, cells)))
            .collect();

        ResultTable::from_rows(self.columns.clone(), rows)
    }
}

/// Iterator over the rows of a table in ascending coordinate order.
pub struct Iter<'a> {
    columns: &'a [NaiveDate],
    rows: btree_map::Iter<'a, Coord, Vec<Cell>>,
}

impl<'a> Iter<'a> {
    fn make_row(&self, (coord, cells): (&'a Coord, &'a Vec<Cell>)) -> Row<'a> {
        Row {
            coord: *coord,
            columns: self.columns,
            cells,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.rows.next()?;
        Some(self.make_row(next))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let next = self.rows.next_back()?;
        Some(self.make_row(next))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {
    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = Row<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            columns: &self.columns,
            rows: self.rows.iter(),
        }
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    use super::{ResultTable, Row};

    struct Record<'a>(Row<'a>);

    impl Serialize for Record<'_> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut map = serializer.serialize_map(Some(self.0.cells.len() + 2))?;
            map.serialize_entry("x", &self.0.coord.x())?;
            map.serialize_entry("y", &self.0.coord.y())?;

            for (date, label) in self.0.iter() {
                map.serialize_entry(&date.format("%Y-%m-%d").to_string(), &label)?;
            }

            map.end()
        }
    }

    /// Serialized as a sequence of records, one per row, holding `x`, `y` and one entry per
    /// dated column whose value is the label or `null`.
    impl Serialize for ResultTable {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;

            for row in self {
                seq.serialize_element(&Record(row))?;
            }

            seq.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Cell, ResultTable, TableError};
    use crate::raster::Coord;

    fn date(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 9, 1).unwrap()
    }

    fn cells(labels: &[Option<&str>]) -> Vec<Cell> {
        labels.iter().map(|label| label.map(String::from)).collect()
    }

    fn table() -> ResultTable {
        ResultTable::from_rows(
            vec![date(2001), date(2002), date(2003)],
            [
                (Coord::from((10, 20)), cells(&[Some("Forest"), Some("Forest"), Some("Forest")])),
                (Coord::from((30, 40)), cells(&[Some("Forest"), None, Some("Forest")])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_unordered_columns() {
        assert_eq!(ResultTable::new(vec![date(2002), date(2001)]), Err(TableError::UnorderedColumns));
    }

    #[test]
    fn rejects_wrong_row_width() {
        let result = ResultTable::from_rows(vec![date(2001)], [(Coord::from((0, 0)), cells(&[None, None]))]);
        assert!(matches!(result, Err(TableError::RowWidth { expected: 1, found: 2, .. })));
    }

    #[test]
    fn drops_absent_rows() -> Result<(), TableError> {
        let table = ResultTable::from_rows(
            vec![date(2001), date(2002)],
            [
                (Coord::from((0, 0)), cells(&[None, None])),
                (Coord::from((1, 1)), cells(&[None, Some("Soy")])),
            ],
        )?;

        assert_eq!(table.len(), 1);
        assert!(!table.contains(&Coord::from((0, 0))));

        Ok(())
    }

    #[test]
    fn deduplicates_rows() -> Result<(), TableError> {
        let coord = Coord::from((5, 5));
        let table = ResultTable::from_rows(
            vec![date(2001), date(2002)],
            [
                (coord, cells(&[Some("Forest"), None])),
                (coord, cells(&[Some("Forest"), None])),
                (coord, cells(&[None, Some("Pasture")])),
            ],
        )?;

        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(&coord, date(2001)), Some("Forest"));
        assert_eq!(table.cell(&coord, date(2002)), Some("Pasture"));

        Ok(())
    }

    #[test]
    fn conflicting_rows() {
        let coord = Coord::from((5, 5));
        let result = ResultTable::from_rows(
            vec![date(2001)],
            [(coord, cells(&[Some("Forest")])), (coord, cells(&[Some("Pasture")]))],
        );

        assert!(matches!(result, Err(TableError::Conflict { .. })));
    }

    #[test]
    fn remove_columns() {
        let table = table();
        let removed = table.remove_columns([date(2001), date(2003)]);

        assert_eq!(removed.columns(), &[date(2002)]);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed.cell(&Coord::from((10, 20)), date(2002)), Some("Forest"));

        let unchanged = table.remove_columns([date(1999)]);
        assert_eq!(unchanged, table);
    }

    #[test]
    fn merge_with_itself() -> Result<(), TableError> {
        let table = table();
        assert_eq!(table.merge(&table)?, table);

        Ok(())
    }

    #[test]
    fn merge_is_an_outer_join() -> Result<(), TableError> {
        let left = table().remove_columns([date(2002), date(2003)]);
        let right = ResultTable::from_rows(vec![date(2004)], [(Coord::from((50, 60)), cells(&[Some("Soy")]))])?;
        let merged = left.merge(&right)?;

        assert_eq!(merged.columns(), &[date(2001), date(2004)]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.cell(&Coord::from((10, 20)), date(2004)), None);
        assert_eq!(merged.cell(&Coord::from((50, 60)), date(2001)), None);
        assert_eq!(merged.cell(&Coord::from((50, 60)), date(2004)), Some("Soy"));

        let empty = ResultTable::default();
        assert_eq!(empty.merge(&right)?, right);

        Ok(())
    }

    #[test]
    fn join_keeps_shared_coordinates() -> Result<(), TableError> {
        let left = table().remove_columns([date(2002), date(2003)]);
        let right = ResultTable::from_rows(
            vec![date(2004)],
            [
                (Coord::from((10, 20)), cells(&[Some("Pasture")])),
                (Coord::from((70, 80)), cells(&[Some("Pasture")])),
            ],
        )?;

        let joined = left.join_with(&right, |_, _| true)?;

        assert_eq!(joined.columns(), &[date(2001), date(2004)]);
        assert_eq!(joined.coords().collect::<Vec<_>>(), vec![Coord::from((10, 20))]);
        assert_eq!(joined.cell(&Coord::from((10, 20)), date(2001)), Some("Forest"));
        assert_eq!(joined.cell(&Coord::from((10, 20)), date(2004)), Some("Pasture"));

        let rejected = left.join_with(&right, |_, _| false)?;
        assert!(rejected.is_empty());

        Ok(())
    }

    #[test]
    fn row_spans() {
        let table = table();
        let row = table.row(&Coord::from((30, 40))).unwrap();

        assert!(!row.is_full());
        assert_eq!(row.first_present(), Some(date(2001)));
        assert_eq!(row.last_present(), Some(date(2003)));
        assert_eq!(row.present().count(), 2);
        assert!(table.row(&Coord::from((10, 20))).unwrap().is_full());
    }

    #[test]
    fn rows_are_sorted_by_coordinate() {
        let table = table();
        let coords: Vec<_> = table.iter().map(|row| row.coord()).collect();

        assert_eq!(coords, vec![Coord::from((10, 20)), Coord::from((30, 40))]);
        assert_eq!(table.iter().rev().next().map(|row| row.coord()), Some(Coord::from((30, 40))));
    }
}
