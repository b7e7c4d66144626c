//! Reader preferences and reading-rate bounds.

use serde::{Deserialize, Serialize};

/// Slowest selectable reading rate.
pub const MIN_WPM: u32 = 100;
/// Fastest selectable reading rate.
pub const MAX_WPM: u32 = 1000;
/// Increment used by rate controls.
pub const WPM_STEP: u32 = 25;

pub const DEFAULT_WPM: u32 = 300;
pub const DEFAULT_PUNCTUATION_PAUSE_MS: u32 = 150;

/// Clamp a rate into `[MIN_WPM, MAX_WPM]`.
pub fn clamp_wpm(wpm: u32) -> u32 {
    wpm.clamp(MIN_WPM, MAX_WPM)
}

/// Move `wpm` by `steps` increments of [`WPM_STEP`], staying in range.
pub fn step_wpm(wpm: u32, steps: i32) -> u32 {
    let moved = i64::from(wpm) + i64::from(steps) * i64::from(WPM_STEP);
    clamp_wpm(moved.clamp(0, i64::from(MAX_WPM)) as u32)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    #[default]
    Rsvp,
    Traditional,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Sepia,
    Forest,
}

impl Theme {
    pub fn display_name(self) -> &'static str {
        match self {
            Theme::Dark => "Midnight",
            Theme::Light => "Daylight",
            Theme::Sepia => "Parchment",
            Theme::Forest => "Forest",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Theme::Dark => "Dark blue-gray for low-light reading",
            Theme::Light => "Clean white for bright environments",
            Theme::Sepia => "Warm tones for reduced eye strain",
            Theme::Forest => "Deep green for a natural feel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilitySettings {
    pub dyslexic_font: bool,
    pub font_size: u32,
    pub letter_spacing: f32,
    pub line_height: f32,
    pub word_spacing: f32,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            dyslexic_font: false,
            font_size: 18,
            letter_spacing: 0.0,
            line_height: 1.6,
            word_spacing: 0.0,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

/// Persisted reader settings. Keys missing from stored data take their
/// default values, so older records keep loading as fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub default_speed: u32,
    pub theme: Theme,
    pub orp_highlight_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font: String,
    pub font_size: u32,
    /// Extra milliseconds after sentence punctuation.
    pub punctuation_pause: u32,
    pub auto_save: bool,
    pub last_used_mode: ReadingMode,
    #[serde(rename = "showWPM")]
    pub show_wpm: bool,
    /// 1 to 3 words shown at a time.
    pub words_per_chunk: u8,
    pub accessibility: AccessibilitySettings,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_speed: DEFAULT_WPM,
            theme: Theme::default(),
            orp_highlight_color: "#60a5fa".to_string(),
            background_color: "#0a0a0f".to_string(),
            text_color: "#f5f5f5".to_string(),
            font: "Geist".to_string(),
            font_size: 18,
            punctuation_pause: DEFAULT_PUNCTUATION_PAUSE_MS,
            auto_save: true,
            last_used_mode: ReadingMode::default(),
            show_wpm: true,
            words_per_chunk: 1,
            accessibility: AccessibilitySettings::default(),
        }
    }
}

impl UserPreferences {
    /// The stored default speed, clamped to the selectable range.
    pub fn rate(&self) -> u32 {
        clamp_wpm(self.default_speed)
    }

    /// Bring out-of-range values from hand-edited or older data back into
    /// range.
    pub fn normalized(mut self) -> Self {
        self.default_speed = clamp_wpm(self.default_speed);
        self.words_per_chunk = self.words_per_chunk.clamp(1, 3);
        self
    }
}
