//! Aspect ratio classification
//!
//! Reduces a width/height pair to lowest terms and checks whether another
//! resolution shares that ratio.

use std::fmt;

use crate::resolution::Resolution;

/// Width:height in lowest integer terms. Both units are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    pub width_units: u32,
    pub height_units: u32,
}

impl AspectRatio {
    /// Reduce `width:height` by their greatest common divisor.
    /// Returns None for a zero dimension, which has no meaningful ratio.
    pub fn reduce(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let divisor = gcd(width, height);
        Some(Self {
            width_units: width / divisor,
            height_units: height / divisor,
        })
    }

    pub fn of(resolution: Resolution) -> Option<Self> {
        Self::reduce(resolution.width, resolution.height)
    }

    /// Check whether `candidate` shares this ratio.
    ///
    /// Compares `width / width_units` against `height / height_units` with
    /// truncating division. This is a heuristic: every exact multiple of the
    /// reduced units matches, but so can resolutions whose truncated quotients
    /// coincide without the ratio being identical (e.g. 1366x768 against 16:9).
    pub fn matches(&self, candidate: Resolution) -> bool {
        candidate.width / self.width_units == candidate.height / self.height_units
    }

    pub fn as_f32(&self) -> f32 {
        self.width_units as f32 / self.height_units as f32
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width_units, self.height_units)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while a != 0 && b != 0 {
        if a > b {
            a %= b;
        } else {
            b %= a;
        }
    }
    a | b
}
