//! End-to-end runs over generated images with a deterministic predictor.

use approx::assert_relative_eq;
use arrow_array::{Array, Float32Array, RecordBatch, StringArray};
use d4_tta::core::config::ParallelPolicy;
use d4_tta::core::{ProbabilityPredictor, Tensor2D, Tensor4D, TtaError};
use d4_tta::domain::{ClassLabels, DEFAULT_CAMERA_CLASSES};
use d4_tta::pipeline::{TtaConfig, TtaRunner};
use image::{Rgb, RgbImage};
use ndarray::Axis;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

/// Picks a class from the mean brightness of each view; manipulated images
/// shift the pick by one.
struct BrightnessPredictor {
    calls: Mutex<Vec<(usize, f32)>>,
}

impl BrightnessPredictor {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ProbabilityPredictor for BrightnessPredictor {
    fn predict_probabilities(
        &self,
        images: &Tensor4D,
        manipulated: &Tensor2D,
    ) -> Result<Tensor2D, TtaError> {
        let n = images.shape()[0];
        self.calls
            .lock()
            .unwrap()
            .push((n, manipulated[[0, 0]]));

        let mut out = Tensor2D::from_elem((n, 10), 0.01);
        for (i, view) in images.axis_iter(Axis(0)).enumerate() {
            let mean = view.mean().unwrap_or(0.0);
            let class = (mean as usize / 20 + manipulated[[i, 0]] as usize) % 10;
            out[[i, class]] = 0.91;
        }
        Ok(out)
    }

    fn model_name(&self) -> &str {
        "brightness"
    }
}

fn write_image(dir: &Path, name: &str, value: u8) {
    RgbImage::from_pixel(512, 512, Rgb([value, value, value]))
        .save(dir.join(name))
        .unwrap();
}

fn read_parquet(path: &Path) -> (Vec<RecordBatch>, Vec<(String, Option<String>)>) {
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap()).unwrap();
    let metadata = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .map(|kv| {
            kv.iter()
                .map(|e| (e.key.clone(), e.value.clone()))
                .collect()
        })
        .unwrap_or_default();
    let batches = builder.build().unwrap().map(|b| b.unwrap()).collect();
    (batches, metadata)
}

fn config(output_dir: &Path, use_tta: bool) -> TtaConfig {
    TtaConfig::new()
        .with_tta(use_tta)
        .with_image_extension("png")
        .with_output_dir(output_dir)
        .with_parallel(ParallelPolicy::new().with_num_workers(2).with_prefetch(1))
}

#[test]
fn tta_run_writes_all_outputs_in_sorted_order() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_image(data.path(), "img_b.png", 70);
    write_image(data.path(), "img_a.png", 0);
    write_image(data.path(), "img_c_manip.png", 110);
    std::fs::write(data.path().join("notes.txt"), "ignored").unwrap();

    let predictor = BrightnessPredictor::new();
    let runner = TtaRunner::new(&predictor, config(out.path(), true)).unwrap();
    let summary = runner.run(data.path()).unwrap();

    let calls = predictor.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(40, 0.0), (40, 0.0), (40, 1.0)]);

    let names = &summary.outputs;
    assert_eq!(names.run_name, "brightness_tta_geometric");
    assert!(names.submission_csv.ends_with("submission_brightness_tta_geometric.csv"));

    let csv = std::fs::read_to_string(&names.submission_csv).unwrap();
    let expected = format!(
        "fname,camera\nimg_a.png,{}\nimg_b.png,{}\nimg_c_manip.png,{}\n",
        DEFAULT_CAMERA_CLASSES[0], DEFAULT_CAMERA_CLASSES[3], DEFAULT_CAMERA_CLASSES[6]
    );
    assert_eq!(csv, expected);

    let (batches, metadata) = read_parquet(&names.image_probabilities);
    assert!(metadata.contains(&("table".to_string(), Some("prob".to_string()))));
    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(batch.num_columns(), 11);
    assert_eq!(batch.schema().field(10).name(), "fname");
    assert_eq!(batch.schema().field(0).name(), DEFAULT_CAMERA_CLASSES[0]);

    let top = batch
        .column(3)
        .as_any()
        .downcast_ref::<Float32Array>()
        .unwrap();
    assert_relative_eq!(top.value(1), 0.91, epsilon = 1e-5);

    let (view_batches, view_metadata) = read_parquet(&names.view_probabilities);
    assert!(view_metadata.contains(&("table".to_string(), Some("prob".to_string()))));
    let rows: usize = view_batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 120);
    let fnames = view_batches[0]
        .column(10)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(fnames.value(0), "img_a.png_tta0");
    assert_eq!(fnames.value(39), "img_a.png_tta39");
    assert_eq!(fnames.value(40), "img_b.png_tta0");
    assert!(!fnames.is_null(0));

    assert_eq!(summary.distribution.total(), 3);
    assert_eq!(summary.distribution.count(0), 1);
    assert_eq!(summary.stats.images_processed, 3);
    assert_eq!(summary.stats.views_scored, 120);
}

#[test]
fn single_view_run_uses_plain_model_name() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_image(data.path(), "only.png", 30);

    let predictor = BrightnessPredictor::new();
    let runner = TtaRunner::new(&predictor, config(out.path(), false)).unwrap();
    let summary = runner.run(data.path()).unwrap();

    assert_eq!(predictor.calls.lock().unwrap().as_slice(), &[(1, 0.0)]);
    assert_eq!(summary.outputs.run_name, "brightness");
    assert!(out.path().join("submission_brightness.csv").is_file());
    assert!(out.path().join("brightness_test_pr.parquet").is_file());
    assert!(out.path().join("brightness_test_pr_with_tta.parquet").is_file());

    let (batches, _) = read_parquet(&summary.outputs.view_probabilities);
    assert_eq!(batches[0].num_rows(), 1);
}

#[test]
fn custom_labels_name_the_columns() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_image(data.path(), "x.png", 0);

    let labels = ClassLabels::new((0..10).map(|i| format!("cam{i}"))).unwrap();
    let runner = TtaRunner::new(BrightnessPredictor::new(), config(out.path(), false))
        .unwrap()
        .with_labels(labels);
    let summary = runner.run(data.path()).unwrap();

    let csv = std::fs::read_to_string(&summary.outputs.submission_csv).unwrap();
    assert_eq!(csv, "fname,camera\nx.png,cam0\n");
}

#[test]
fn empty_directory_is_rejected() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_image(data.path(), "wrong_extension.tif", 0);

    let runner = TtaRunner::new(BrightnessPredictor::new(), config(out.path(), true)).unwrap();
    let err = runner.run(data.path()).unwrap_err();
    assert!(matches!(err, TtaError::InvalidInput { .. }));
    assert!(!out.path().join("submission_brightness_tta_geometric.csv").exists());
}

#[test]
fn wrong_image_size_aborts_the_run() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_image(data.path(), "a.png", 0);
    RgbImage::new(500, 500).save(data.path().join("b.png")).unwrap();

    let runner = TtaRunner::new(BrightnessPredictor::new(), config(out.path(), true)).unwrap();
    let err = runner.run(data.path()).unwrap_err();
    assert!(matches!(err, TtaError::InvalidImageShape { .. }));
}
