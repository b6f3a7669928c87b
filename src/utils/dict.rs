//! Label file loading.

use crate::core::errors::TtaError;
use std::path::Path;

/// Reads a newline-delimited label file.
///
/// Surrounding whitespace is trimmed and blank lines are skipped.
///
/// # Errors
///
/// Returns `TtaError::InvalidInput` if the file cannot be read.
///
/// # Example
///
/// ```rust,no_run
/// use d4_tta::utils::read_label_file;
/// use std::path::Path;
///
/// let labels = read_label_file(Path::new("path/to/labels.txt"))?;
/// # Ok::<(), d4_tta::core::TtaError>(())
/// ```
pub fn read_label_file(path: &Path) -> Result<Vec<String>, TtaError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        TtaError::invalid_input(format!(
            "Failed to read label file from '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
