mod ffprobe_info;
mod path_validator;
mod video_scanner;

pub use ffprobe_info::FpsProber;
pub use path_validator::{absolute_directory, ensure_directory_exists, validate_directory_exists};
pub use video_scanner::scan_video_files;
