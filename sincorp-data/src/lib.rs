pub mod loader;
pub mod logging;

pub use loader::{LineItemLoader, LineItemRecord, LoaderError};
