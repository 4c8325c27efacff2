//! Theme context: process-wide light/dark selection.
//!
//! The mode is a persisted user preference (`system`, `light`, or `dark`);
//! `system` follows the OS appearance the webview reports. Resolution is an
//! explicit function of (mode, OS hint): no hidden global, the resolved
//! state is computed on demand and pushed over a `theme-changed` event when
//! the preference mutates.

pub mod tokens;

use serde::{Deserialize, Serialize};

use tokens::{DesignTokens, Palette};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ThemeMode {
    System,
    Light,
    Dark,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::System
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Appearance {
    Light,
    Dark,
}

/// Everything a screen needs to paint itself, returned by the theme command
/// and carried on `theme-changed`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub appearance: Appearance,
    pub palette: Palette,
    pub tokens: DesignTokens,
}

/// Resolve the active appearance. Explicit modes win; `system` follows the
/// OS hint and defaults to light when the webview could not report one.
pub fn resolve(mode: ThemeMode, os_prefers_dark: Option<bool>) -> Appearance {
    match mode {
        ThemeMode::Light => Appearance::Light,
        ThemeMode::Dark => Appearance::Dark,
        ThemeMode::System => {
            if os_prefers_dark.unwrap_or(false) {
                Appearance::Dark
            } else {
                Appearance::Light
            }
        }
    }
}

pub fn palette(appearance: Appearance) -> Palette {
    match appearance {
        Appearance::Light => tokens::LIGHT,
        Appearance::Dark => tokens::DARK,
    }
}

pub fn theme_state(mode: ThemeMode, os_prefers_dark: Option<bool>) -> ThemeState {
    let appearance = resolve(mode, os_prefers_dark);
    ThemeState {
        mode,
        appearance,
        palette: palette(appearance),
        tokens: tokens::design_tokens(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_modes_ignore_os_hint() {
        assert_eq!(resolve(ThemeMode::Light, Some(true)), Appearance::Light);
        assert_eq!(resolve(ThemeMode::Dark, Some(false)), Appearance::Dark);
    }

    #[test]
    fn system_mode_follows_os_hint() {
        assert_eq!(resolve(ThemeMode::System, Some(true)), Appearance::Dark);
        assert_eq!(resolve(ThemeMode::System, Some(false)), Appearance::Light);
        assert_eq!(resolve(ThemeMode::System, None), Appearance::Light);
    }

    #[test]
    fn state_carries_matching_palette() {
        let state = theme_state(ThemeMode::Dark, None);
        assert_eq!(state.palette, tokens::DARK);
        assert_eq!(state.appearance, Appearance::Dark);
    }

    #[test]
    fn state_serves_the_design_token_bundle() {
        let state = theme_state(ThemeMode::Light, None);

        assert_eq!(state.tokens.spacing.md, tokens::spacing::MD);
        assert_eq!(state.tokens.radius.pill, tokens::radius::PILL);
        assert_eq!(state.tokens.font.display, tokens::font::DISPLAY);
        assert_eq!(state.tokens.mood_accents.len(), crate::models::Mood::ALL.len());
        assert_eq!(state.tokens.mood_accents["thirsty"], "#4A90C2");
    }
}
