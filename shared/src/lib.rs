pub mod models;
pub mod utils;

// Data models and formatting helpers shared by the engine and any presentation
// back end. No aggregation logic lives here; see `engine::analytics`.
