//! Resolution ladder and detail level mapping
//!
//! The ladder is the same-aspect subset of the modes a display reports,
//! largest first. Detail levels are spread over it by integer interpolation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, error};

use crate::aspect::AspectRatio;

/// A display mode as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WIDTHxHEIGHT` (an uppercase `X` is accepted too)
impl FromStr for Resolution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w.trim().parse().with_context(|| format!("invalid width in '{s}'"))?;
        let height = h.trim().parse().with_context(|| format!("invalid height in '{s}'"))?;
        Ok(Self { width, height })
    }
}

/// Quality tier selected instead of a raw resolution.
/// Ordinals run from best (`Max = 0`) to worst (`Low = 3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetailLevel {
    #[default]
    Max = 0,
    High = 1,
    Middle = 2,
    Low = 3,
}

impl DetailLevel {
    pub const ALL: [DetailLevel; 4] = [Self::Max, Self::High, Self::Middle, Self::Low];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Max => "Max",
            Self::High => "High",
            Self::Middle => "Middle",
            Self::Low => "Low",
        };
        f.pad(name)
    }
}

impl FromStr for DetailLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "max" | "0" => Ok(Self::Max),
            "high" | "1" => Ok(Self::High),
            "middle" | "2" => Ok(Self::Middle),
            "low" | "3" => Ok(Self::Low),
            other => Err(anyhow!("unknown detail level '{other}' (expected max, high, middle or low)")),
        }
    }
}

/// Persisted as the bare ordinal (0-3)
impl Serialize for DetailLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for DetailLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ordinal = u8::deserialize(deserializer)?;
        Self::from_ordinal(ordinal)
            .ok_or_else(|| serde::de::Error::custom(format!("detail level {ordinal} out of range 0-3")))
    }
}

/// Map a detail level onto a ladder index.
///
/// `index = ordinal * (ladder_size - 1) / Low.ordinal()`, truncated, so Max is
/// always the first entry and Low always the last. A zero size yields 0;
/// callers must not index an empty ladder with it.
pub fn resolve_index(level: DetailLevel, ladder_size: usize) -> usize {
    level.ordinal() * ladder_size.saturating_sub(1) / DetailLevel::Low.ordinal()
}

/// Same-aspect display modes, largest first.
/// Immutable once built; clones share the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionLadder {
    entries: Rc<[Resolution]>,
}

impl ResolutionLadder {
    pub fn empty() -> Self {
        Self { entries: Rc::from(Vec::new()) }
    }

    /// Build the ladder from every mode the host reports.
    ///
    /// The last mode is taken as the native one (hosts report ascending), its
    /// ratio becomes the reference, and the list is walked backwards keeping
    /// every match. Duplicates are kept.
    pub fn build(all: &[Resolution]) -> Self {
        let Some(&reference) = all.last() else {
            debug!("no resolutions reported, ladder is empty");
            return Self::empty();
        };

        let Some(ratio) = AspectRatio::of(reference) else {
            error!(reference = %reference, "Reference resolution has a zero dimension, ladder is empty");
            return Self::empty();
        };

        let entries: Vec<Resolution> = all
            .iter()
            .rev()
            .copied()
            .filter(|candidate| ratio.matches(*candidate))
            .collect();

        debug!(reference = %reference, ratio = %ratio, kept = entries.len(), total = all.len(), "built resolution ladder");
        Self { entries: Rc::from(entries) }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Resolution] {
        &self.entries
    }

    /// Resolution for a detail level, or `fallback` when the ladder is empty
    pub fn resolution_for(&self, level: DetailLevel, fallback: Resolution) -> Resolution {
        if self.entries.is_empty() {
            return fallback;
        }
        self.entries[resolve_index(level, self.entries.len())]
    }

    /// Whether two handles point at the same built ladder
    pub fn same_build(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}
