pub mod load;
pub mod save;
pub mod types;

pub use load::DEFAULT_SETTINGS_PATH;
pub use save::save_settings;
pub use types::{
    Config, DEFAULT_FALLBACK_FPS, DEFAULT_JPEG_QUALITY, DEFAULT_NUM_PROCESSES, ExtractorSettings,
    VideoExtensionTable,
};
