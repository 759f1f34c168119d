pub mod models;
pub mod traits;
pub mod video_id;
pub mod ytdlp;

pub use models::{Format, StreamVariant, VideoInfo, VideoRef};
pub use traits::Extractor;
pub use video_id::parse_video_id;
pub use ytdlp::YtDlpExtractor;
