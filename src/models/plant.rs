//! Plant data model.
//!
//! Plants are fetched from the remote API and never owned by this crate;
//! rename/delete/pair-sensor are passthrough mutations. `Mood` is a
//! display-only attribute used to pick accent colors and viewer animation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Mood {
    Happy,
    Thirsty,
    Sleepy,
    Excited,
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Happy
    }
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Thirsty, Mood::Sleepy, Mood::Excited];

    /// Wire name, matching the serde rename.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Thirsty => "thirsty",
            Mood::Sleepy => "sleepy",
            Mood::Excited => "excited",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: i64,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub mood: Mood,
    /// Paired soil-moisture sensor, if any. Watering cannot start without one.
    pub sensor_id: Option<String>,
    /// Soil humidity (percent) the watering loop drives toward.
    pub target_humidity: f64,
    pub model_url: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}
