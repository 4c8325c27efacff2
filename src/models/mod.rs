pub mod auth;
pub mod chat;
pub mod dex;
pub mod plant;
pub mod sensor;
pub mod watering_session;

pub use auth::{AuthSession, AuthUser, LoginRequest, RegisterRequest};
pub use chat::{ChatMessage, ChatRole};
pub use dex::DexEntry;
pub use plant::{Mood, Plant};
pub use sensor::SensorReading;
pub use watering_session::WateringSession;
