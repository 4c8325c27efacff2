pub mod stats;
pub mod store;

pub use stats::{plant_care_stats, PlantCareStats};
pub use store::SessionStore;
