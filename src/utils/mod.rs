//! Utility functions for the prediction pipeline.
//!
//! Image decoding helpers, label file reading, and logging setup.

pub mod dict;
pub mod image;

pub use dict::read_label_file;
pub use image::{dynamic_to_rgb, load_image, open_image};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
