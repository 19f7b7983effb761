pub mod duplicates;
mod manager;
mod sample_data;

pub use duplicates::{group_by_url, UrlGroup};
pub use manager::{LibraryError, LibraryManager, SharedLibraryManager};
pub use sample_data::sample_media_items;
