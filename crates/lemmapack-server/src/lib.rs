pub mod config;
pub mod handlers;

pub use config::{DictMode, ServerArgs};
pub use handlers::{AppState, router};
