//! Submission CSV and Parquet probability tables.
//!
//! The CSV is streamed row by row. The probability tables are accumulated in
//! memory and written when the writer is finished; each Parquet file carries
//! the key/value metadata `table = prob`.

use super::naming::OutputNames;
use crate::core::constants::{CLASS_COLUMN, FILENAME_COLUMN, PROBABILITY_TABLE_KEY};
use crate::core::errors::TtaError;
use crate::domain::{ClassLabels, PredictionRecord};
use arrow_array::{ArrayRef, Float32Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Metadata key naming the table stored in a probability file.
pub const TABLE_METADATA_KEY: &str = "table";

/// Column-major table with one `Float32` column per class followed by `fname`.
#[derive(Debug, Clone)]
pub struct ProbabilityTable {
    labels: ClassLabels,
    columns: Vec<Vec<f32>>,
    names: Vec<String>,
}

impl ProbabilityTable {
    /// Creates an empty table.
    ///
    /// # Errors
    ///
    /// `TtaError::InvalidInput` if a class is named like the file name column.
    pub fn new(labels: ClassLabels) -> Result<Self, TtaError> {
        if labels.iter().any(|l| l == FILENAME_COLUMN) {
            return Err(TtaError::invalid_input(format!(
                "class label '{FILENAME_COLUMN}' collides with the file name column"
            )));
        }
        let columns = vec![Vec::new(); labels.len()];
        Ok(Self {
            labels,
            columns,
            names: Vec::new(),
        })
    }

    /// Appends one row.
    pub fn push_row(&mut self, name: impl Into<String>, probabilities: &[f32]) -> Result<(), TtaError> {
        if probabilities.len() != self.columns.len() {
            return Err(TtaError::tensor_shape_mismatch(
                "probability table row",
                &[self.columns.len()],
                &[probabilities.len()],
            ));
        }
        for (column, &p) in self.columns.iter_mut().zip(probabilities) {
            column.push(p);
        }
        self.names.push(name.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Arrow schema: class columns in label order, then `fname`.
    pub fn schema(&self) -> Schema {
        let mut fields: Vec<Field> = self
            .labels
            .iter()
            .map(|label| Field::new(label, DataType::Float32, false))
            .collect();
        fields.push(Field::new(FILENAME_COLUMN, DataType::Utf8, false));
        Schema::new(fields)
    }

    /// Builds a record batch holding a copy of the table.
    pub fn to_record_batch(&self) -> Result<RecordBatch, TtaError> {
        let mut arrays: Vec<ArrayRef> = self
            .columns
            .iter()
            .map(|column| Arc::new(Float32Array::from(column.clone())) as ArrayRef)
            .collect();
        arrays.push(Arc::new(StringArray::from(self.names.clone())) as ArrayRef);
        Ok(RecordBatch::try_new(Arc::new(self.schema()), arrays)?)
    }

    /// Writes the table to a Parquet file tagged `table = prob`.
    pub fn write_parquet(&self, path: &Path) -> Result<(), TtaError> {
        let batch = self.to_record_batch()?;
        let props = WriterProperties::builder()
            .set_key_value_metadata(Some(vec![KeyValue::new(
                TABLE_METADATA_KEY.to_string(),
                PROBABILITY_TABLE_KEY.to_string(),
            )]))
            .build();

        let file = File::create(path)
            .map_err(|e| TtaError::output(&format!("creating '{}'", path.display()), e))?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        debug!("wrote {} rows to {}", batch.num_rows(), path.display());
        Ok(())
    }
}

/// Writes every output of a run.
pub struct PredictionWriter {
    names: OutputNames,
    csv: csv::Writer<File>,
    images: ProbabilityTable,
    views: ProbabilityTable,
}

impl PredictionWriter {
    /// Creates the output directory, opens the CSV and writes its header.
    pub fn create(output_dir: &Path, names: OutputNames, labels: ClassLabels) -> Result<Self, TtaError> {
        std::fs::create_dir_all(output_dir)?;

        let mut csv = csv::Writer::from_path(&names.submission_csv)?;
        csv.write_record([FILENAME_COLUMN, CLASS_COLUMN])?;

        Ok(Self {
            images: ProbabilityTable::new(labels.clone())?,
            views: ProbabilityTable::new(labels)?,
            names,
            csv,
        })
    }

    /// Appends one image: a CSV row, one aggregated row and its per-view rows.
    pub fn append(&mut self, record: &PredictionRecord) -> Result<(), TtaError> {
        self.csv
            .write_record([record.file_name.as_str(), record.class_label.as_str()])?;
        self.images
            .push_row(record.file_name.clone(), &record.probabilities)?;
        for (name, row) in record.view_names().zip(record.view_probabilities.rows()) {
            self.views.push_row(name, &row.to_vec())?;
        }
        Ok(())
    }

    /// Number of images appended so far.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Flushes the CSV and writes both probability tables.
    pub fn finish(mut self) -> Result<OutputNames, TtaError> {
        self.csv.flush()?;
        self.images.write_parquet(&self.names.image_probabilities)?;
        self.views.write_parquet(&self.names.view_probabilities)?;
        info!(
            "wrote {} predictions to {}",
            self.images.len(),
            self.names.submission_csv.display()
        );
        Ok(self.names)
    }
}
