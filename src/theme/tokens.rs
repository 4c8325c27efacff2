//! Design tokens: the raw color, spacing, and type constants every screen
//! consumes. Nothing in here depends on app state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Mood;

/// One resolved color set. Hex strings go straight to the webview.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background: &'static str,
    pub surface: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub accent: &'static str,
    pub accent_soft: &'static str,
    pub danger: &'static str,
    pub water: &'static str,
    /// Top-to-bottom screen gradient.
    pub gradient: [&'static str; 2],
}

pub const LIGHT: Palette = Palette {
    background: "#F6F4EC",
    surface: "#FFFFFF",
    text_primary: "#1F2A1F",
    text_secondary: "#5C6B5C",
    accent: "#3E8E5A",
    accent_soft: "#DCEFE2",
    danger: "#C4483B",
    water: "#4A90C2",
    gradient: ["#EAF4EC", "#F6F4EC"],
};

pub const DARK: Palette = Palette {
    background: "#121812",
    surface: "#1C241C",
    text_primary: "#ECF2EC",
    text_secondary: "#9CAC9C",
    accent: "#5FBF85",
    accent_soft: "#27382C",
    danger: "#E06A5E",
    water: "#6FB3DE",
    gradient: ["#15241B", "#101510"],
};

/// Spacing scale in logical pixels.
pub mod spacing {
    pub const XS: u16 = 4;
    pub const SM: u16 = 8;
    pub const MD: u16 = 16;
    pub const LG: u16 = 24;
    pub const XL: u16 = 32;
}

/// Corner radii in logical pixels.
pub mod radius {
    pub const SM: u16 = 8;
    pub const MD: u16 = 12;
    pub const LG: u16 = 20;
    pub const PILL: u16 = 999;
}

/// Font sizes in logical pixels.
pub mod font {
    pub const CAPTION: u16 = 12;
    pub const BODY: u16 = 15;
    pub const TITLE: u16 = 20;
    pub const HEADING: u16 = 28;
    pub const DISPLAY: u16 = 36;
}

/// Accent color for a plant mood, same in both appearances.
pub fn mood_accent(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "#F2B441",
        Mood::Thirsty => "#4A90C2",
        Mood::Sleepy => "#8E7CC3",
        Mood::Excited => "#E0715E",
    }
}

/// The non-color tokens plus the mood accents, bundled onto `ThemeState` so
/// the webview never hardcodes them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    pub spacing: SpacingScale,
    pub radius: RadiusScale,
    pub font: FontScale,
    /// Keyed by the mood's wire name.
    pub mood_accents: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingScale {
    pub xs: u16,
    pub sm: u16,
    pub md: u16,
    pub lg: u16,
    pub xl: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusScale {
    pub sm: u16,
    pub md: u16,
    pub lg: u16,
    pub pill: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontScale {
    pub caption: u16,
    pub body: u16,
    pub title: u16,
    pub heading: u16,
    pub display: u16,
}

pub fn design_tokens() -> DesignTokens {
    DesignTokens {
        spacing: SpacingScale {
            xs: spacing::XS,
            sm: spacing::SM,
            md: spacing::MD,
            lg: spacing::LG,
            xl: spacing::XL,
        },
        radius: RadiusScale {
            sm: radius::SM,
            md: radius::MD,
            lg: radius::LG,
            pill: radius::PILL,
        },
        font: FontScale {
            caption: font::CAPTION,
            body: font::BODY,
            title: font::TITLE,
            heading: font::HEADING,
            display: font::DISPLAY,
        },
        mood_accents: Mood::ALL
            .into_iter()
            .map(|mood| (mood.as_str(), mood_accent(mood)))
            .collect(),
    }
}
