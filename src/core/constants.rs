//! Constants used throughout the prediction pipeline.
//!
//! Default values for image geometry, augmentation fan-out, data loading and
//! output naming.

/// The side length of the square test images the classifier was trained on.
pub const DEFAULT_IMAGE_SIZE: u32 = 512;

/// The side length of the square crops fed to the classifier.
pub const DEFAULT_CROP_SIZE: u32 = 480;

/// Number of color channels expected in every test image.
pub const IMAGE_CHANNELS: u8 = 3;

/// Number of spatial crops taken from each image (four corners plus center).
pub const FIVE_CROP_COUNT: usize = 5;

/// Number of elements in the dihedral group of the square.
pub const D4_GROUP_ORDER: usize = 8;

/// Number of augmented views produced per image when TTA is enabled.
pub const TTA_BATCH_SIZE: usize = FIVE_CROP_COUNT * D4_GROUP_ORDER;

/// File extension of the test images.
pub const DEFAULT_IMAGE_EXTENSION: &str = "tif";

/// Directory that receives submission artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "submit";

/// Default number of decoding/augmentation worker threads.
pub const DEFAULT_NUM_WORKERS: usize = 7;

/// Default number of finished batches buffered ahead of the consumer.
pub const DEFAULT_PREFETCH: usize = 2;

/// Substring of a file name marking a synthetically manipulated image.
pub const MANIPULATED_MARKER: &str = "manip";

/// Name under which probability tables are stored.
pub const PROBABILITY_TABLE_KEY: &str = "prob";

/// Column holding the file name in probability tables.
pub const FILENAME_COLUMN: &str = "fname";

/// Column holding the predicted class name in the submission CSV.
pub const CLASS_COLUMN: &str = "camera";

/// Default ONNX input name for the image batch.
pub const DEFAULT_IMAGE_INPUT_NAME: &str = "image";

/// Default ONNX input name for the manipulated-flag batch.
pub const DEFAULT_AUX_INPUT_NAME: &str = "manipulated";
