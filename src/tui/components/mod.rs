//! UI components

pub mod directory_picker;
pub mod download_button;
pub mod progress_bar;
pub mod stream_picker;
pub mod url_input;

pub use directory_picker::{DirectoryPicker, LocationPart};
pub use download_button::{DownloadControl, Trigger};
pub use progress_bar::progress_bar;
pub use stream_picker::StreamPicker;
pub use url_input::UrlInput;
