//! 3D plant viewer decisions.
//!
//! The webview owns rendering; this module owns the choices that must be
//! consistent everywhere the viewer appears: where the model comes from,
//! how the camera may move, and which animation clip plays for a mood.
//! Everything here is a pure function over plant data.

use serde::Serialize;
use tauri::State;

use crate::models::{Mood, Plant};
use crate::AppState;

/// Shown whenever a model is missing or fails to load. No retry.
pub const PLACEHOLDER_GLYPH: &str = "🌱";

pub const AUTO_ROTATE_DEGREES_PER_SECOND: f64 = 30.0;
pub const MIN_PITCH_DEG: f64 = -20.0;
pub const MAX_PITCH_DEG: f64 = 70.0;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ModelSource {
    /// Load a glTF binary from the URL. The glyph rides along so a load
    /// failure can degrade without a second round trip.
    Gltf { url: String, fallback_glyph: String },
    Placeholder { glyph: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewerMode {
    /// Ambient spin for the garden grid; ignores input.
    AutoRotate { degrees_per_second: f64 },
    /// Gesture-driven rotate and zoom, clamped to keep the plant in frame.
    Interactive {
        min_pitch_deg: f64,
        max_pitch_deg: f64,
        min_zoom: f64,
        max_zoom: f64,
    },
}

impl ViewerMode {
    pub fn auto_rotate() -> Self {
        ViewerMode::AutoRotate {
            degrees_per_second: AUTO_ROTATE_DEGREES_PER_SECOND,
        }
    }

    pub fn interactive() -> Self {
        ViewerMode::Interactive {
            min_pitch_deg: MIN_PITCH_DEG,
            max_pitch_deg: MAX_PITCH_DEG,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    #[allow(dead_code)]
    pub fn clamp_pitch(&self, pitch_deg: f64) -> f64 {
        match self {
            ViewerMode::AutoRotate { .. } => pitch_deg,
            ViewerMode::Interactive {
                min_pitch_deg,
                max_pitch_deg,
                ..
            } => pitch_deg.clamp(*min_pitch_deg, *max_pitch_deg),
        }
    }

    #[allow(dead_code)]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        match self {
            ViewerMode::AutoRotate { .. } => zoom,
            ViewerMode::Interactive {
                min_zoom, max_zoom, ..
            } => zoom.clamp(*min_zoom, *max_zoom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClipSelection {
    /// Play one named clip, looping.
    Clip { name: String },
    /// Nothing matched; play everything the model ships with.
    AllClips,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerScene {
    pub source: ModelSource,
    pub mode: ViewerMode,
}

pub fn model_source(plant: &Plant) -> ModelSource {
    match plant.model_url.as_deref() {
        Some(url) if !url.is_empty() => ModelSource::Gltf {
            url: url.to_string(),
            fallback_glyph: PLACEHOLDER_GLYPH.to_string(),
        },
        _ => ModelSource::Placeholder {
            glyph: PLACEHOLDER_GLYPH.to_string(),
        },
    }
}

pub fn viewer_scene(plant: &Plant, interactive: bool) -> ViewerScene {
    ViewerScene {
        source: model_source(plant),
        mode: if interactive {
            ViewerMode::interactive()
        } else {
            ViewerMode::auto_rotate()
        },
    }
}

fn mood_clip_name(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "bloom",
        Mood::Thirsty => "droop",
        Mood::Sleepy => "sway",
        Mood::Excited => "bounce",
    }
}

fn mood_table_clip(mood: Mood, available_clips: &[String]) -> Option<String> {
    let wanted = mood_clip_name(mood);
    available_clips
        .iter()
        .find(|clip| clip.as_str() == wanted)
        .cloned()
}

fn idle_clip(_mood: Mood, available_clips: &[String]) -> Option<String> {
    available_clips
        .iter()
        .find(|clip| clip.as_str() == "idle")
        .cloned()
}

/// Clip lookup strategies, tried in order. The first hit wins; no hit
/// means every clip plays at once.
const CLIP_STRATEGIES: [fn(Mood, &[String]) -> Option<String>; 2] = [mood_table_clip, idle_clip];

/// Total function: any mood and any clip list, including an empty one,
/// resolve to a playable selection.
pub fn select_clip(mood: Mood, available_clips: &[String]) -> ClipSelection {
    for strategy in CLIP_STRATEGIES {
        if let Some(name) = strategy(mood, available_clips) {
            return ClipSelection::Clip { name };
        }
    }
    ClipSelection::AllClips
}

#[tauri::command]
pub async fn get_viewer_scene(
    state: State<'_, AppState>,
    plant_id: i64,
    interactive: bool,
) -> Result<ViewerScene, String> {
    let plant = state
        .api
        .get_plant(plant_id)
        .await
        .map_err(|e| state.surface_api_error(e))?;
    Ok(viewer_scene(&plant, interactive))
}

/// Called by the webview once it knows which clips the loaded model
/// actually contains.
#[tauri::command]
pub fn select_viewer_clip(mood: Mood, available_clips: Vec<String>) -> Result<ClipSelection, String> {
    Ok(select_clip(mood, &available_clips))
}
