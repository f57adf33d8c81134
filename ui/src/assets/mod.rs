pub mod error;
pub mod loader;
pub mod model;

pub use error::LoadError;
pub use loader::{LoadEvent, LoadProgress, ModelLoad, load_model};
pub use model::ModelAsset;
