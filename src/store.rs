//! Settings store
//!
//! Owns the settings record and runs every change through the same pipeline:
//! mutate the record, apply it to the host, persist the whole record, then
//! notify subscribers (typed event first, then `Changed`).

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::catalog::{LevelOption, ResolutionCatalog};
use crate::config::{FileStore, SettingsFile, SettingsRecord};
use crate::constants::audio::{DECIBEL_SCALE, MUSIC_CHANNEL, SOUND_CHANNEL};
use crate::events::{Observers, SettingsEvent, Subscription};
use crate::host::{AudioHost, DisplayHost};
use crate::resolution::{DetailLevel, Resolution, ResolutionLadder};

/// Linear slider value to mixer attenuation.
/// Zero gives negative infinity and negative values give NaN; both are
/// passed to the mixer unchanged.
pub fn volume_to_decibels(volume: f32) -> f32 {
    volume.log10() * DECIBEL_SCALE
}

pub struct SettingsStore<D, A, F> {
    record: SettingsRecord,
    file: SettingsFile<F>,
    catalog: ResolutionCatalog,
    display: D,
    audio: A,
    observers: Observers,
}

impl<D: DisplayHost, A: AudioHost, F: FileStore> SettingsStore<D, A, F> {
    /// Create the store and load the persisted record (defaults on any failure).
    /// Nothing is applied to the host until a setter or `apply_all` runs.
    pub fn open(path: impl Into<PathBuf>, display: D, audio: A, files: F) -> Self {
        let file = SettingsFile::new(path, files);
        let record = file.load(display.is_full_screen());
        info!(path = %file.path().display(), ?record, "Settings store opened");
        Self {
            record,
            file,
            catalog: ResolutionCatalog::new(),
            display,
            audio,
            observers: Observers::new(),
        }
    }

    pub fn record(&self) -> &SettingsRecord {
        &self.record
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn files(&self) -> &F {
        self.file.files()
    }

    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl FnMut(&SettingsEvent) + 'static) -> Subscription {
        self.observers.subscribe(callback)
    }

    /// Read the persisted record without touching the in-memory one
    pub fn load(&self) -> SettingsRecord {
        self.file.load(self.display.is_full_screen())
    }

    /// Replace the in-memory record with the persisted one
    pub fn reload(&mut self) {
        self.record = self.load();
        info!(record = ?self.record, "Settings reloaded");
    }

    /// Persist `record`. The in-memory record is left as it is either way.
    pub fn save(&mut self, record: &SettingsRecord) -> Result<()> {
        self.file.save(record)
    }

    /// Push every persisted value to the host, as done once at startup
    pub fn apply_all(&mut self) {
        let record = self.record;
        self.set_music_volume(record.music_volume);
        self.set_sound_volume(record.sound_volume);
        self.set_resolution_level(record.resolution_level);
        self.set_full_screen(record.full_screen);
        self.set_post_processing(record.post_processing);
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.record.music_volume = volume;
        self.audio.set_channel_level(MUSIC_CHANNEL, volume_to_decibels(volume));
        self.commit(SettingsEvent::MusicVolume(volume));
    }

    pub fn set_sound_volume(&mut self, volume: f32) {
        self.record.sound_volume = volume;
        self.audio.set_channel_level(SOUND_CHANNEL, volume_to_decibels(volume));
        self.commit(SettingsEvent::SoundVolume(volume));
    }

    /// Switch to the ladder entry for `level`. With an empty ladder the
    /// display's current resolution is re-applied.
    pub fn set_resolution_level(&mut self, level: DetailLevel) {
        self.record.resolution_level = level;
        let resolution = self.catalog.resolution_for(level, &self.display);
        let full_screen = self.display.is_full_screen();
        info!(level = %level, resolution = %resolution, full_screen, "Applying resolution");
        self.display.apply_resolution(resolution.width, resolution.height, full_screen);
        self.commit(SettingsEvent::ResolutionLevel(level));
    }

    pub fn set_full_screen(&mut self, full_screen: bool) {
        self.record.full_screen = full_screen;
        self.display.set_full_screen(full_screen);
        self.commit(SettingsEvent::FullScreen(full_screen));
    }

    /// Only recorded; the renderer reads it from the record
    pub fn set_post_processing(&mut self, post_processing: bool) {
        self.record.post_processing = post_processing;
        self.commit(SettingsEvent::PostProcessing(post_processing));
    }

    /// Applied to the display but not persisted, and no `Changed` event
    pub fn set_brightness(&mut self, brightness: f32) {
        let brightness = brightness.clamp(0.0, 1.0);
        self.display.set_brightness(brightness);
        self.observers.emit(&SettingsEvent::Brightness(brightness));
    }

    /// Physical resolution a detail level maps to on this display
    pub fn resolution_for(&mut self, level: DetailLevel) -> Resolution {
        self.catalog.resolution_for(level, &self.display)
    }

    pub fn ladder(&mut self) -> ResolutionLadder {
        self.catalog.ladder(&self.display)
    }

    pub fn resolution_options(&mut self) -> Vec<LevelOption> {
        self.catalog.level_options(&self.display)
    }

    /// The host reports a new display configuration: rebuild the ladder
    pub fn display_changed(&mut self) -> ResolutionLadder {
        self.catalog.rebuild(&self.display)
    }

    /// Mutable host access, e.g. to feed it new modes before `display_changed`
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn commit(&mut self, event: SettingsEvent) {
        if let Err(e) = self.file.save(&self.record) {
            error!(error = %format!("{e:#}"), "Failed to save settings, keeping in-memory values");
        }
        self.observers.emit(&event);
        self.observers.emit(&SettingsEvent::Changed);
    }
}
