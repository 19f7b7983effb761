// Library exports for the server binary and integration tests

pub mod config;
pub mod db;
pub mod library;
pub mod server;
pub mod store;

pub use config::Config;
pub use library::{LibraryManager, SharedLibraryManager};
