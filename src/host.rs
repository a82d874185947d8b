//! Host subsystem seams
//!
//! The store never talks to a window system or a mixer directly; it goes
//! through these traits. Headless implementations are provided for the CLI
//! and for embedding without a real display.

use std::collections::BTreeMap;
use tracing::debug;

use crate::constants::display::DEFAULT_BRIGHTNESS;
use crate::resolution::Resolution;

/// Display subsystem of the host
pub trait DisplayHost {
    /// Every mode the display supports, in the order the host reports them
    fn supported_resolutions(&self) -> Vec<Resolution>;

    /// Mode currently in use (fallback when the ladder is empty)
    fn current_resolution(&self) -> Resolution;

    fn is_full_screen(&self) -> bool;

    fn apply_resolution(&mut self, width: u32, height: u32, full_screen: bool);

    fn set_full_screen(&mut self, full_screen: bool);

    fn set_brightness(&mut self, brightness: f32);
}

/// Audio mixer of the host
pub trait AudioHost {
    fn set_channel_level(&mut self, channel: &str, decibels: f32);
}

/// In-process display that only remembers what was applied
#[derive(Debug, Clone)]
pub struct HeadlessDisplay {
    modes: Vec<Resolution>,
    current: Resolution,
    full_screen: bool,
    brightness: f32,
    /// Every `apply_resolution` call, oldest first
    pub applied: Vec<(Resolution, bool)>,
}

impl HeadlessDisplay {
    pub fn new(modes: Vec<Resolution>, current: Resolution, full_screen: bool) -> Self {
        Self {
            modes,
            current,
            full_screen,
            brightness: DEFAULT_BRIGHTNESS,
            applied: Vec::new(),
        }
    }

    /// Use the last (native) mode as the current one
    pub fn with_modes(modes: Vec<Resolution>) -> Self {
        let current = modes.last().copied().unwrap_or(Resolution::new(0, 0));
        Self::new(modes, current, false)
    }

    /// Replace the reported modes, as after a monitor change
    pub fn set_modes(&mut self, modes: Vec<Resolution>) {
        self.modes = modes;
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }
}

impl DisplayHost for HeadlessDisplay {
    fn supported_resolutions(&self) -> Vec<Resolution> {
        self.modes.clone()
    }

    fn current_resolution(&self) -> Resolution {
        self.current
    }

    fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    fn apply_resolution(&mut self, width: u32, height: u32, full_screen: bool) {
        let resolution = Resolution::new(width, height);
        debug!(resolution = %resolution, full_screen, "headless display: apply resolution");
        self.current = resolution;
        self.full_screen = full_screen;
        self.applied.push((resolution, full_screen));
    }

    fn set_full_screen(&mut self, full_screen: bool) {
        debug!(full_screen, "headless display: set full screen");
        self.full_screen = full_screen;
    }

    fn set_brightness(&mut self, brightness: f32) {
        debug!(brightness, "headless display: set brightness");
        self.brightness = brightness;
    }
}

/// Mixer that records the last level sent to each channel
#[derive(Debug, Clone, Default)]
pub struct MixerLevels {
    levels: BTreeMap<String, f32>,
}

impl MixerLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level in decibels, if the channel was ever set
    pub fn level(&self, channel: &str) -> Option<f32> {
        self.levels.get(channel).copied()
    }

    pub fn channels(&self) -> impl Iterator<Item = (&str, f32)> {
        self.levels.iter().map(|(name, db)| (name.as_str(), *db))
    }
}

impl AudioHost for MixerLevels {
    fn set_channel_level(&mut self, channel: &str, decibels: f32) {
        debug!(channel, decibels, "mixer: set channel level");
        self.levels.insert(channel.to_string(), decibels);
    }
}
