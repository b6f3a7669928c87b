//! Ordered class names.

use crate::core::errors::TtaError;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// The ten camera models, in the column order of the classifier output.
pub const DEFAULT_CAMERA_CLASSES: [&str; 10] = [
    "HTC-1-M7",
    "LG-Nexus-5x",
    "Motorola-Droid-Maxx",
    "Motorola-Nexus-6",
    "Motorola-X",
    "Samsung-Galaxy-Note3",
    "Samsung-Galaxy-S4",
    "Sony-NEX-7",
    "iPhone-4s",
    "iPhone-6",
];

/// Immutable mapping from output column index to class name.
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels {
    names: Arc<[String]>,
}

impl ClassLabels {
    /// Builds labels from names in column order.
    ///
    /// # Errors
    ///
    /// Returns `TtaError::InvalidInput` when the list is empty or contains a
    /// duplicate, since either would make the output columns ambiguous.
    pub fn new<I, S>(names: I) -> Result<Self, TtaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(TtaError::invalid_input("class label list is empty"));
        }
        let mut seen = HashSet::with_capacity(names.len());
        if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(TtaError::invalid_input(format!(
                "duplicate class label '{dup}'"
            )));
        }
        Ok(Self {
            names: names.into(),
        })
    }

    /// Reads labels from a newline-delimited file.
    pub fn from_file(path: &Path) -> Result<Self, TtaError> {
        Self::new(crate::utils::read_label_file(path)?)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of class `index`, if in range.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        Self {
            names: DEFAULT_CAMERA_CLASSES
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_labels_are_sorted_camera_models() {
        let labels = ClassLabels::default();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels.name(0), Some("HTC-1-M7"));
        assert_eq!(labels.name(9), Some("iPhone-6"));
        assert_eq!(labels.name(10), None);
        let mut sorted = labels.as_slice().to_vec();
        sorted.sort();
        assert_eq!(sorted, labels.as_slice());
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert!(ClassLabels::new(Vec::<String>::new()).is_err());
        assert!(ClassLabels::new(["A", "B", "A"]).is_err());
        assert!(ClassLabels::new(["A", "B", "C"]).is_ok());
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "A\nB\nC").unwrap();
        let labels = ClassLabels::from_file(file.path()).unwrap();
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }
}
