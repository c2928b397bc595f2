//! Class names of a classified raster.
//!
//! Raster cells store small positive integers. A value `v` names the class at position `v` of the
//! [`LabelSet`], counting from one, so the first label is stored as `1`.

use nonempty::NonEmpty;
use thiserror::Error;

use crate::raster::ClassValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("Label set must contain at least one class")]
    Empty,

    #[error("Class \"{0}\" appears more than once in the label set")]
    Duplicate(String),

    #[error("Class \"{0}\" is not in the label set")]
    UnknownClass(String),

    #[error("Label set has {0} classes, more than a raster cell can index")]
    TooMany(usize),
}

/// Ordered, duplicate-free, non-empty set of class names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet(NonEmpty<String>);

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();

        for label in labels {
            let label = label.into();

            if names.contains(&label) {
                return Err(LabelError::Duplicate(label));
            }

            names.push(label);
        }

        if names.len() > usize::from(ClassValue::MAX) {
            return Err(LabelError::TooMany(names.len()));
        }

        NonEmpty::from_vec(names).map(Self).ok_or(LabelError::Empty)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a label set holds at least one class.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Raster value used to store the named class.
    pub fn class_value(&self, name: &str) -> Result<ClassValue, LabelError> {
        self.0
            .iter()
            .position(|label| label == name)
            .and_then(|index| ClassValue::try_from(index + 1).ok())
            .ok_or_else(|| LabelError::UnknownClass(name.to_string()))
    }

    /// Class named by a raster value, or `None` if the value is outside the label set.
    pub fn name(&self, value: ClassValue) -> Option<&str> {
        usize::from(value)
            .checked_sub(1)
            .and_then(|index| self.0.get(index))
            .map(String::as_str)
    }

    pub fn contains_value(&self, value: ClassValue) -> bool {
        self.name(value).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{LabelError, LabelSet};

    #[test]
    fn one_based_values() -> Result<(), LabelError> {
        let labels = LabelSet::new(["Forest", "Pasture", "Deforestation"])?;

        assert_eq!(labels.class_value("Forest")?, 1);
        assert_eq!(labels.class_value("Deforestation")?, 3);
        assert_eq!(labels.name(2), Some("Pasture"));
        assert_eq!(labels.name(0), None);
        assert_eq!(labels.name(4), None);

        Ok(())
    }

    #[test]
    fn unknown_class() {
        let labels = LabelSet::new(["Forest"]).unwrap();
        assert_eq!(labels.class_value("Soy"), Err(LabelError::UnknownClass("Soy".into())));
    }

    #[test]
    fn invalid_label_sets() {
        assert_eq!(LabelSet::new(Vec::<String>::new()), Err(LabelError::Empty));
        assert_eq!(
            LabelSet::new(["Forest", "Soy", "Forest"]),
            Err(LabelError::Duplicate("Forest".into()))
        );
    }
}
