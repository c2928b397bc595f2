use thiserror::Error;

use crate::labels::LabelSet;
use crate::raster::Raster;
use crate::timeline::Timeline;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("Raster has {layers} layers but the timeline has {dates} dates")]
    LayerCountMismatch { layers: usize, dates: usize },
}

/// A classified raster together with the timeline and label set that describe it.
///
/// The raster is borrowed read-only for as long as the dataset lives, and every layer is
/// guaranteed to have a matching timeline date.
#[derive(Clone, Copy)]
pub struct Dataset<'a> {
    raster: &'a dyn Raster,
    timeline: &'a Timeline,
    labels: &'a LabelSet,
}

impl<'a> Dataset<'a> {
    pub fn new(raster: &'a dyn Raster, timeline: &'a Timeline, labels: &'a LabelSet) -> Result<Self, DatasetError> {
        let layers = raster.layer_count();

        if layers != timeline.len() {
            return Err(DatasetError::LayerCountMismatch {
                layers,
                dates: timeline.len(),
            });
        }

        Ok(Self {
            raster,
            timeline,
            labels,
        })
    }

    pub fn raster(&self) -> &'a dyn Raster {
        self.raster
    }

    pub fn timeline(&self) -> &'a Timeline {
        self.timeline
    }

    pub fn labels(&self) -> &'a LabelSet {
        self.labels
    }
}
