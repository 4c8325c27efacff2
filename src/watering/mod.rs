pub mod commands;
pub mod controller;
pub mod events;
mod poller;
pub mod state;

pub use controller::{StartOutcome, WateringAvailability, WateringController};
pub use events::{TauriEvents, WateringEvents};
pub use state::{WateringPhase, WateringSnapshot, WateringState};
