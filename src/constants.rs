//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the crate, providing a single source of truth for constant values.

/// Settings file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "presentation-settings";

    /// Settings file name inside APP_DIR
    pub const FILENAME: &str = "settings.json";

    /// Environment variable overriding the full settings file path
    pub const PATH_ENV: &str = "PRESENTATION_SETTINGS_PATH";
}

/// Audio mixer constants
pub mod audio {
    /// Channel receiving the music volume
    pub const MUSIC_CHANNEL: &str = "music";

    /// Channel receiving the sound effects volume
    pub const SOUND_CHANNEL: &str = "sound";

    /// Lowest value a volume slider should offer.
    /// Zero maps to negative infinity decibels.
    pub const MIN_SLIDER_VOLUME: f32 = 0.0001;

    /// Highest slider value (unity gain, 0 dB)
    pub const MAX_SLIDER_VOLUME: f32 = 1.0;

    /// Linear-to-decibel multiplier for amplitude values
    pub const DECIBEL_SCALE: f32 = 20.0;
}

/// Display defaults used by the headless host
pub mod display {
    /// Modes reported when none are given on the command line, ascending
    pub const DEFAULT_MODES: &[(u32, u32)] = &[
        (800, 600),
        (1024, 768),
        (1280, 720),
        (1280, 960),
        (1366, 768),
        (1600, 900),
        (1600, 1200),
        (1920, 1080),
        (2560, 1440),
    ];

    /// Brightness reported before anything is applied
    pub const DEFAULT_BRIGHTNESS: f32 = 1.0;
}
