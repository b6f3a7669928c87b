//! Run statistics.
//!
//! This module defines the `PipelineStats` structure used to track how much
//! work a prediction run did and where its time went.

use std::fmt;
use std::time::Duration;

/// Statistics for one prediction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    /// The number of images scored.
    pub images_processed: usize,
    /// The number of augmented views sent to the model.
    pub views_scored: usize,
    /// Total time spent inside the predictor, in milliseconds.
    pub inference_time_ms: f64,
    /// Total time spent waiting for the loader, in milliseconds.
    pub loader_wait_ms: f64,
}

impl PipelineStats {
    /// Creates a new PipelineStats instance with zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one scored image.
    pub fn record_image(&mut self, views: usize, inference: Duration) {
        self.images_processed += 1;
        self.views_scored += views;
        self.inference_time_ms += inference.as_secs_f64() * 1000.0;
    }

    /// Records time the consumer spent blocked on the loader.
    pub fn record_wait(&mut self, wait: Duration) {
        self.loader_wait_ms += wait.as_secs_f64() * 1000.0;
    }

    /// Returns the average inference time per image in milliseconds.
    pub fn average_inference_time_ms(&self) -> f64 {
        if self.images_processed == 0 {
            0.0
        } else {
            self.inference_time_ms / self.images_processed as f64
        }
    }

    /// Returns the inference throughput in images per second.
    pub fn images_per_second(&self) -> f64 {
        let average = self.average_inference_time_ms();
        if average == 0.0 { 0.0 } else { 1000.0 / average }
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Statistics:")?;
        writeln!(f, "  Images processed: {}", self.images_processed)?;
        writeln!(f, "  Views scored: {}", self.views_scored)?;
        writeln!(
            f,
            "  Average inference time: {:.2} ms",
            self.average_inference_time_ms()
        )?;
        writeln!(
            f,
            "  Processing speed: {:.2} images/sec",
            self.images_per_second()
        )?;
        writeln!(f, "  Loader wait: {:.2} ms", self.loader_wait_ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineStats;
    use std::time::Duration;

    #[test]
    fn averages_handle_zero_processed() {
        let stats = PipelineStats::default();
        assert_eq!(stats.average_inference_time_ms(), 0.0);
        assert_eq!(stats.images_per_second(), 0.0);
    }

    #[test]
    fn record_image_accumulates() {
        let mut stats = PipelineStats::new();
        stats.record_image(40, Duration::from_millis(100));
        stats.record_image(40, Duration::from_millis(300));
        stats.record_wait(Duration::from_millis(5));

        assert_eq!(stats.images_processed, 2);
        assert_eq!(stats.views_scored, 80);
        assert!((stats.average_inference_time_ms() - 200.0).abs() < 1e-9);
        assert!((stats.images_per_second() - 5.0).abs() < 1e-9);
        assert!((stats.loader_wait_ms - 5.0).abs() < 1e-9);
    }

    #[test]
    fn display_formats_metrics() {
        let stats = PipelineStats {
            images_processed: 10,
            views_scored: 400,
            inference_time_ms: 1250.0,
            loader_wait_ms: 3.0,
        };

        let display = stats.to_string();
        assert!(display.contains("Pipeline Statistics:"));
        assert!(display.contains("Images processed: 10"));
        assert!(display.contains("Views scored: 400"));
        assert!(display.contains("Average inference time: 125.00 ms"));
        assert!(display.contains("Processing speed: 8.00 images/sec"));
    }
}
