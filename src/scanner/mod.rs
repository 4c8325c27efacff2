//! Plant scanner glue.
//!
//! The webview streams camera frames here; we gate auto-capture on the
//! feed holding still. A frame is steady when its perceptual hash sits
//! within a fixed hamming distance of the previous frame, and capture
//! unlocks after three steady frames in a row. The first frame, any hash
//! failure, and any movement reset the streak.

pub mod phash;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use serde::Serialize;
use tauri::State;

use crate::api::IdentifyResult;
use crate::AppState;

use phash::{compute_hamming_distance, compute_phash};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

const STEADY_DISTANCE_THRESHOLD: u32 = 8;
const STEADY_STREAK_TARGET: u32 = 3;
const MAX_UPLOAD_EDGE: u32 = 1024;
const UPLOAD_JPEG_QUALITY: u8 = 80;

/// Rolling per-frame gate state. Lives behind the app-state mutex; one
/// scanner screen at a time.
#[derive(Debug, Default)]
pub struct ScannerState {
    last_phash: Option<String>,
    steady_streak: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAssessment {
    pub steady: bool,
    /// Hamming distance to the previous frame; `None` on the first frame.
    pub distance: Option<u32>,
    pub streak: u32,
    /// True once the streak target is met; the UI may auto-capture.
    pub capture_ready: bool,
}

impl FrameAssessment {
    fn unsteady() -> Self {
        Self {
            steady: false,
            distance: None,
            streak: 0,
            capture_ready: false,
        }
    }
}

impl ScannerState {
    /// Fold one frame's hash into the gate.
    pub fn observe(&mut self, phash: String) -> FrameAssessment {
        let assessment = match self.last_phash.take() {
            None => {
                self.steady_streak = 0;
                FrameAssessment::unsteady()
            }
            Some(previous) => {
                let distance = compute_hamming_distance(&phash, &previous);
                let steady = distance < STEADY_DISTANCE_THRESHOLD;
                self.steady_streak = if steady { self.steady_streak + 1 } else { 0 };

                FrameAssessment {
                    steady,
                    distance: Some(distance),
                    streak: self.steady_streak,
                    capture_ready: self.steady_streak >= STEADY_STREAK_TARGET,
                }
            }
        };

        self.last_phash = Some(phash);
        assessment
    }

    pub fn reset(&mut self) {
        self.last_phash = None;
        self.steady_streak = 0;
    }
}

/// Shrink and re-encode a captured photo for upload. Returns base64 JPEG
/// with the longest edge bounded.
pub fn prepare_upload(photo_bytes: &[u8]) -> Result<String> {
    let img = image::load_from_memory(photo_bytes).context("could not decode captured photo")?;

    let img = if img.width().max(img.height()) > MAX_UPLOAD_EDGE {
        img.thumbnail(MAX_UPLOAD_EDGE, MAX_UPLOAD_EDGE)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, UPLOAD_JPEG_QUALITY)
        .encode_image(&rgb)
        .context("could not encode upload image")?;

    Ok(STANDARD.encode(&encoded))
}

#[tauri::command]
pub async fn scan_frame(
    state: State<'_, AppState>,
    frame_base64: String,
) -> Result<FrameAssessment, String> {
    let bytes = STANDARD
        .decode(frame_base64.as_bytes())
        .map_err(|e| e.to_string())?;

    let hashed = tokio::task::spawn_blocking(move || compute_phash(&bytes))
        .await
        .map_err(|e| e.to_string())?;

    let mut scanner = state.scanner.lock().await;
    match hashed {
        Ok(phash) => Ok(scanner.observe(phash)),
        Err(err) => {
            log_warn!("frame hash failed, resetting steadiness gate: {err:?}");
            scanner.reset();
            Ok(FrameAssessment::unsteady())
        }
    }
}

#[tauri::command]
pub async fn reset_scanner(state: State<'_, AppState>) -> Result<(), String> {
    state.scanner.lock().await.reset();
    Ok(())
}

#[tauri::command]
pub async fn identify_plant(
    state: State<'_, AppState>,
    photo_base64: String,
) -> Result<IdentifyResult, String> {
    let bytes = STANDARD
        .decode(photo_base64.as_bytes())
        .map_err(|e| e.to_string())?;

    let prepared = tokio::task::spawn_blocking(move || prepare_upload(&bytes))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;

    state
        .api
        .identify_plant(&prepared)
        .await
        .map_err(|e| state.surface_api_error(e))
}
