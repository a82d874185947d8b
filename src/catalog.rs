//! Memoized resolution ladder for the current display

use std::fmt;
use tracing::info;

use crate::host::DisplayHost;
use crate::resolution::{DetailLevel, Resolution, ResolutionLadder};

/// One selectable entry: a detail level and the mode it resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOption {
    pub level: DetailLevel,
    pub resolution: Resolution,
}

impl fmt::Display for LevelOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} x {})", self.level, self.resolution.width, self.resolution.height)
    }
}

/// Caches the ladder built from the display's modes.
/// Built on first use; only `invalidate`/`rebuild` refresh it.
#[derive(Debug, Default)]
pub struct ResolutionCatalog {
    ladder: Option<ResolutionLadder>,
}

impl ResolutionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        self.ladder.is_some()
    }

    /// Cached ladder, building it from `display` if needed
    pub fn ladder(&mut self, display: &impl DisplayHost) -> ResolutionLadder {
        if let Some(ladder) = &self.ladder {
            return ladder.clone();
        }
        self.rebuild(display)
    }

    /// Drop the cached ladder; the next access rebuilds it
    pub fn invalidate(&mut self) {
        self.ladder = None;
    }

    /// Replace the cached ladder with a fresh build
    pub fn rebuild(&mut self, display: &impl DisplayHost) -> ResolutionLadder {
        let ladder = ResolutionLadder::build(&display.supported_resolutions());
        info!(entries = ladder.len(), "Resolution ladder built");
        self.ladder = Some(ladder.clone());
        ladder
    }

    /// Physical mode for `level`, falling back to the display's current mode
    pub fn resolution_for(&mut self, level: DetailLevel, display: &impl DisplayHost) -> Resolution {
        self.ladder(display).resolution_for(level, display.current_resolution())
    }

    /// One option per detail level, best first. Empty when the display
    /// reported nothing usable.
    pub fn level_options(&mut self, display: &impl DisplayHost) -> Vec<LevelOption> {
        let ladder = self.ladder(display);
        if ladder.is_empty() {
            return Vec::new();
        }

        let fallback = display.current_resolution();
        DetailLevel::ALL
            .into_iter()
            .map(|level| LevelOption {
                level,
                resolution: ladder.resolution_for(level, fallback),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessDisplay;

    fn res(width: u32, height: u32) -> Resolution {
        Resolution::new(width, height)
    }

    fn wide_display() -> HeadlessDisplay {
        HeadlessDisplay::with_modes(vec![
            res(800, 600),
            res(1280, 720),
            res(1600, 900),
            res(1600, 1200),
            res(1920, 1080),
        ])
    }

    #[test]
    fn test_ladder_built_lazily_and_cached() {
        let mut display = wide_display();
        let mut catalog = ResolutionCatalog::new();
        assert!(!catalog.is_built());

        let first = catalog.ladder(&display);
        assert!(catalog.is_built());
        assert_eq!(first.len(), 3);

        // Host changes are not picked up without an explicit rebuild
        display.set_modes(vec![res(1024, 768)]);
        let second = catalog.ladder(&display);
        assert!(first.same_build(&second));
    }

    #[test]
    fn test_invalidate_then_access_rebuilds() {
        let mut display = wide_display();
        let mut catalog = ResolutionCatalog::new();
        let before = catalog.ladder(&display);

        display.set_modes(vec![res(1024, 768)]);
        catalog.invalidate();
        assert!(!catalog.is_built());

        let after = catalog.ladder(&display);
        assert!(!before.same_build(&after));
        assert_eq!(after.entries(), &[res(1024, 768)]);
        // The old handle is untouched
        assert_eq!(before.len(), 3);
    }

    #[test]
    fn test_rebuild_replaces_ladder() {
        let mut display = wide_display();
        let mut catalog = ResolutionCatalog::new();
        catalog.ladder(&display);

        display.set_modes(vec![res(1280, 720), res(2560, 1440)]);
        let rebuilt = catalog.rebuild(&display);
        assert_eq!(rebuilt.entries(), &[res(2560, 1440), res(1280, 720)]);
        assert!(rebuilt.same_build(&catalog.ladder(&display)));
    }

    #[test]
    fn test_resolution_for_falls_back_to_current() {
        let display = HeadlessDisplay::new(Vec::new(), res(1024, 768), false);
        let mut catalog = ResolutionCatalog::new();
        for level in DetailLevel::ALL {
            assert_eq!(catalog.resolution_for(level, &display), res(1024, 768));
        }
    }

    #[test]
    fn test_level_options_labels() {
        let display = wide_display();
        let mut catalog = ResolutionCatalog::new();
        let labels: Vec<String> = catalog.level_options(&display).iter().map(|o| o.to_string()).collect();
        // 3 entries: High = 1*2/3 = 0, Middle = 2*2/3 = 1
        assert_eq!(
            labels,
            vec![
                "Max (1920 x 1080)",
                "High (1920 x 1080)",
                "Middle (1600 x 900)",
                "Low (1280 x 720)",
            ]
        );
    }

    #[test]
    fn test_level_options_empty_ladder() {
        let display = HeadlessDisplay::new(Vec::new(), res(1024, 768), false);
        let mut catalog = ResolutionCatalog::new();
        assert!(catalog.level_options(&display).is_empty());
    }
}
