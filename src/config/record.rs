//! The persisted settings record

use serde::{Deserialize, Serialize};

use crate::resolution::DetailLevel;

/// Everything that survives a restart.
///
/// Every field is required and unknown keys are rejected, so a partial or
/// foreign file fails to parse and the loader falls back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsRecord {
    /// Linear music volume, stored as given (normally 0..=1)
    pub music_volume: f32,
    /// Linear sound effects volume, stored as given (normally 0..=1)
    pub sound_volume: f32,
    pub resolution_level: DetailLevel,
    pub full_screen: bool,
    pub post_processing: bool,
}

impl SettingsRecord {
    /// Fresh record; full screen mirrors whatever the host is doing now
    pub fn defaults(host_full_screen: bool) -> Self {
        Self {
            music_volume: 1.0,
            sound_volume: 1.0,
            resolution_level: DetailLevel::Max,
            full_screen: host_full_screen,
            post_processing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let record = SettingsRecord::defaults(true);
        assert_eq!(record.music_volume, 1.0);
        assert_eq!(record.sound_volume, 1.0);
        assert_eq!(record.resolution_level, DetailLevel::Max);
        assert!(record.full_screen);
        assert!(record.post_processing);

        assert!(!SettingsRecord::defaults(false).full_screen);
    }

    #[test]
    fn test_json_field_names() {
        let record = SettingsRecord {
            music_volume: 0.5,
            sound_volume: 0.25,
            resolution_level: DetailLevel::Middle,
            full_screen: false,
            post_processing: true,
        };
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "musicVolume": 0.5,
                "soundVolume": 0.25,
                "resolutionLevel": 2,
                "fullScreen": false,
                "postProcessing": true
            })
        );
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"musicVolume":1.0,"soundVolume":1.0,"resolutionLevel":0,"fullScreen":true}"#;
        assert!(serde_json::from_str::<SettingsRecord>(json).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{"musicVolume":1.0,"soundVolume":1.0,"resolutionLevel":0,"fullScreen":true,"postProcessing":true,"brightness":0.5}"#;
        assert!(serde_json::from_str::<SettingsRecord>(json).is_err());
    }

    #[test]
    fn test_out_of_range_level_rejected() {
        let json = r#"{"musicVolume":1.0,"soundVolume":1.0,"resolutionLevel":7,"fullScreen":true,"postProcessing":true}"#;
        assert!(serde_json::from_str::<SettingsRecord>(json).is_err());
    }

    #[test]
    fn test_values_loaded_verbatim() {
        // No range validation on load
        let json = r#"{"musicVolume":3.5,"soundVolume":-1.0,"resolutionLevel":3,"fullScreen":false,"postProcessing":false}"#;
        let record: SettingsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.music_volume, 3.5);
        assert_eq!(record.sound_volume, -1.0);
        assert_eq!(record.resolution_level, DetailLevel::Low);
    }
}
