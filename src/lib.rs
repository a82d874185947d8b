//! Presentation settings: volume, resolution detail level, full screen,
//! post-processing and brightness, persisted as JSON and applied to the host.
//!
//! The resolution ladder reduces whatever modes the display reports to four
//! detail levels that keep the native aspect ratio.

#![forbid(unsafe_code)]

pub mod aspect;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod events;
pub mod host;
pub mod resolution;
pub mod store;

pub use aspect::AspectRatio;
pub use catalog::{LevelOption, ResolutionCatalog};
pub use config::{FileStore, FsFileStore, MemoryFileStore, SettingsFile, SettingsRecord};
pub use events::{Observers, SettingsEvent, Subscription};
pub use host::{AudioHost, DisplayHost, HeadlessDisplay, MixerLevels};
pub use resolution::{resolve_index, DetailLevel, Resolution, ResolutionLadder};
pub use store::{volume_to_decibels, SettingsStore};
