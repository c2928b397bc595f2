use crate::dataset::Dataset;
use crate::interval::Interval;
use crate::labels::LabelSet;
use crate::predicates::{PredicateError, Relation};
use crate::raster::{ClassValue, PixelSeries};
use crate::table::ResultTable;
use crate::Predicate;

/// Predicate that is true where a class occupies a pixel during an interval.
///
/// The raster layers between the two interval endpoints are scanned, and each pixel is marked at
/// every date where it stores the requested class. With [`Relation::Equals`] a pixel is kept
/// only if it is marked at every date, and with [`Relation::Contains`] if it is marked at least
/// once. The output has one column per date of the interval; marked cells hold the class name
/// and unmarked cells are absent.
///
/// | date       | pixel (10, 20) | pixel (30, 40) |
/// | ---------- | -------------- | -------------- |
/// | 2001-09-01 | Forest         | Forest         |
/// | 2002-09-01 | Forest         | Pasture        |
/// | 2003-09-01 | Forest         | Forest         |
///
/// For the raster above, `Holds::equals("Forest", [2001-09-01, 2003-09-01])` keeps only pixel
/// `(10, 20)`, while `Holds::contains` keeps both pixels and leaves the `2002-09-01` cell of
/// pixel `(30, 40)` absent.
///
/// ```rust
/// use lucc::interval::Interval;
/// use lucc::predicates::{Holds, Relation};
///
/// let interval = Interval::parse("2001-09-01", "2003-09-01").unwrap();
/// let holds = Holds::new("Forest", interval, Relation::Contains);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holds {
    class: String,
    interval: Interval,
    relation: Relation,
}

impl Holds {
    pub fn new<S>(class: S, interval: Interval, relation: Relation) -> Self
    where
        S: Into<String>,
    {
        Self {
            class: class.into(),
            interval,
            relation,
        }
    }

    /// Require the class at every date of the interval.
    pub fn equals<S: Into<String>>(class: S, interval: Interval) -> Self {
        Self::new(class, interval, Relation::Equals)
    }

    /// Require the class at one or more dates of the interval.
    pub fn contains<S: Into<String>>(class: S, interval: Interval) -> Self {
        Self::new(class, interval, Relation::Contains)
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }
}

fn mark_pixel(pixel: &PixelSeries, target: ClassValue, labels: &LabelSet) -> Result<Vec<bool>, PredicateError> {
    pixel
        .values
        .iter()
        .map(|value| match value {
            None => Ok(false),
            Some(value) if labels.contains_value(*value) => Ok(*value == target),
            Some(value) => Err(PredicateError::InvalidClassValue {
                coord: pixel.coord,
                value: *value,
            }),
        })
        .collect()
}

impl Predicate for Holds {
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        let target = data.labels().class_value(&self.class)?;
        let timeline = data.timeline();
        let layers: Vec<usize> = timeline.resolve(&self.interval)?.collect();
        let columns = layers.iter().filter_map(|layer| timeline.get(*layer)).collect();

        let pixels = data.raster().layer_values(&layers);
        let scanned = pixels.len();
        let mut rows = Vec::new();

        for pixel in &pixels {
            let marks = mark_pixel(pixel, target, data.labels())?;

            if self.relation.is_satisfied(&marks) {
                let cells = marks
                    .into_iter()
                    .map(|marked| marked.then(|| self.class.clone()))
                    .collect();

                rows.push((pixel.coord, cells));
            }
        }

        log::debug!(
            "holds({}, {}, {}) matched {} of {} pixels",
            self.class,
            self.interval,
            self.relation,
            rows.len(),
            scanned
        );

        Ok(ResultTable::from_rows(columns, rows)?)
    }
}

/// [`Holds`] evaluated for several classes and merged into one table.
///
/// A cell holds whichever of the classes was observed at that date, so the output can mix
/// labels within a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldsAny {
    classes: Vec<String>,
    interval: Interval,
    relation: Relation,
}

impl HoldsAny {
    pub fn new<I, S>(classes: I, interval: Interval, relation: Relation) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            interval,
            relation,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl Predicate for HoldsAny {
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        let mut result = ResultTable::default();

        for class in &self.classes {
            let table = Holds::new(class.as_str(), self.interval, self.relation).evaluate(data)?;
            result = result.merge(&table)?;
        }

        Ok(result)
    }
}
