//! The read-only raster interface consumed by the predicates.
//!
//! A classified raster is a stack of layers, one per timeline date, where each pixel stores the
//! [`ClassValue`] of the class observed at that date. Predicates only need two things from a
//! raster: how many layers it has, and the values of every pixel for a selection of layers. Both
//! are captured by the [`Raster`] trait so that file-backed rasters can be plugged in without the
//! predicates knowing how the values are decoded.
//!
//! [`Brick`] is an in-memory implementation, either built pixel by pixel or from a dense grid.
//!
//! ```rust
//! use lucc::raster::{Brick, Coord, Raster};
//!
//! let mut brick = Brick::new(3);
//! brick.insert(Coord::from((10, 20)), vec![1, 1, 1]).unwrap();
//! brick.insert(Coord::from((30, 40)), vec![1, 2, 1]).unwrap();
//!
//! let pixels = brick.layer_values(&[0, 1]);
//! assert_eq!(pixels[1].values, vec![Some(1), Some(2)]);
//! ```

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::sync::Arc;

use ordered_float::{FloatIsNan, NotNan};
use thiserror::Error;

/// Value stored in a raster cell. Non-zero values index the label set starting from one.
pub type ClassValue = u16;

/// Location of a pixel, ordered by `x` then `y`.
///
/// Coordinates are never NaN, which lets them be used as keys of ordered maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    x: NotNan<f64>,
    y: NotNan<f64>,
}

impl Coord {
    /// Create a coordinate, failing if either component is NaN.
    pub fn new(x: f64, y: f64) -> Result<Self, FloatIsNan> {
        Ok(Self {
            x: NotNan::new(x)?,
            y: NotNan::new(y)?,
        })
    }

    pub fn x(&self) -> f64 {
        self.x.into_inner()
    }

    pub fn y(&self) -> f64 {
        self.y.into_inner()
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: NotNan::from(x),
            y: NotNan::from(y),
        }
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The values of one pixel for a selection of layers, in the order the layers were requested.
/// No-data cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSeries {
    pub coord: Coord,
    pub values: Vec<Option<ClassValue>>,
}

/// Read-only access to the layers of a classified raster.
pub trait Raster {
    /// Number of layers, one per timeline date.
    fn layer_count(&self) -> usize;

    /// Values of every pixel for the given layer indices. Indices are smaller than
    /// [`Raster::layer_count`]; a value for an index outside that range is reported as no-data.
    fn layer_values(&self, layers: &[usize]) -> Vec<PixelSeries>;
}

impl<T> Raster for &T
where
    T: Raster + ?Sized,
{
    fn layer_count(&self) -> usize {
        (**self).layer_count()
    }

    fn layer_values(&self, layers: &[usize]) -> Vec<PixelSeries> {
        (**self).layer_values(layers)
    }
}

impl<T> Raster for Box<T>
where
    T: Raster + ?Sized,
{
    fn layer_count(&self) -> usize {
        (**self).layer_count()
    }

    fn layer_values(&self, layers: &[usize]) -> Vec<PixelSeries> {
        (**self).layer_values(layers)
    }
}

impl<T> Raster for Rc<T>
where
    T: Raster + ?Sized,
{
    fn layer_count(&self) -> usize {
        (**self).layer_count()
    }

    fn layer_values(&self, layers: &[usize]) -> Vec<PixelSeries> {
        (**self).layer_values(layers)
    }
}

impl<T> Raster for Arc<T>
where
    T: Raster + ?Sized,
{
    fn layer_count(&self) -> usize {
        (**self).layer_count()
    }

    fn layer_values(&self, layers: &[usize]) -> Vec<PixelSeries> {
        (**self).layer_values(layers)
    }
}

#[derive(Debug, Clone, Error)]
pub enum BrickError {
    #[error("Pixel {coord} has {found} layer values, expected {expected}")]
    LayerLength { coord: Coord, expected: usize, found: usize },

    #[error("Layer {layer} has {found} cells, expected {expected} for the grid")]
    GridSize { layer: usize, expected: usize, found: usize },

    #[error("Geotransform must have a finite origin and a positive resolution")]
    InvalidTransform,

    #[error("Invalid pixel coordinate: {0}")]
    InvalidCoord(#[from] FloatIsNan),
}

/// Maps grid cells to the coordinates of their centres.
///
/// Rows are counted from the top of the grid, so `y` decreases as the row index grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub x_min: f64,
    pub y_max: f64,
    pub resolution: f64,
}

impl GeoTransform {
    fn is_valid(&self) -> bool {
        self.x_min.is_finite() && self.y_max.is_finite() && self.resolution.is_finite() && self.resolution > 0.0
    }

    fn pixel_centre(&self, row: usize, col: usize) -> Result<Coord, FloatIsNan> {
        let x = self.x_min + (col as f64 + 0.5) * self.resolution;
        let y = self.y_max - (row as f64 + 0.5) * self.resolution;

        Coord::new(x, y)
    }
}

/// In-memory classified raster holding every layer of every pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brick {
    layer_count: usize,
    no_data: Option<ClassValue>,
    pixels: BTreeMap<Coord, Vec<ClassValue>>,
}

impl Brick {
    /// Create an empty brick whose pixels each hold `layer_count` values. Cells storing `0` are
    /// treated as no-data unless [`Brick::with_no_data`] selects another value.
    pub fn new(layer_count: usize) -> Self {
        Self {
            layer_count,
            no_data: Some(0),
            pixels: BTreeMap::new(),
        }
    }

    /// Select the value reported as no-data, or `None` to treat every value as data.
    pub fn with_no_data(mut self, no_data: Option<ClassValue>) -> Self {
        self.no_data = no_data;
        self
    }

    /// Build a brick from a dense grid. Each layer lists its cells in row-major order.
    pub fn from_grid(
        width: usize,
        height: usize,
        transform: GeoTransform,
        layers: Vec<Vec<ClassValue>>,
    ) -> Result<Self, BrickError> {
        if !transform.is_valid() {
            return Err(BrickError::InvalidTransform);
        }

        let cells = width * height;

        for (layer, values) in layers.iter().enumerate() {
            if values.len() != cells {
                return Err(BrickError::GridSize {
                    layer,
                    expected: cells,
                    found: values.len(),
                });
            }
        }

        let mut brick = Self::new(layers.len());

        for row in 0..height {
            for col in 0..width {
                let cell = row * width + col;
                let values = layers.iter().map(|layer| layer[cell]).collect();

                brick.pixels.insert(transform.pixel_centre(row, col)?, values);
            }
        }

        Ok(brick)
    }

    /// Insert the values of one pixel, replacing any values already stored at `coord`.
    pub fn insert(&mut self, coord: Coord, values: Vec<ClassValue>) -> Result<Option<Vec<ClassValue>>, BrickError> {
        if values.len() != self.layer_count {
            return Err(BrickError::LayerLength {
                coord,
                expected: self.layer_count,
                found: values.len(),
            });
        }

        Ok(self.pixels.insert(coord, values))
    }

    /// Number of pixels in the brick.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn read(&self, values: &[ClassValue], layer: usize) -> Option<ClassValue> {
        values
            .get(layer)
            .copied()
            .filter(|value| Some(*value) != self.no_data)
    }
}

impl Raster for Brick {
    fn layer_count(&self) -> usize {
        self.layer_count
    }

    fn layer_values(&self, layers: &[usize]) -> Vec<PixelSeries> {
        self.pixels
            .iter()
            .map(|(coord, values)| PixelSeries {
                coord: *coord,
                values: layers.iter().map(|layer| self.read(values, *layer)).collect(),
            })
            .collect()
    }
}
