use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ScanError;

/// Which way a camera faces relative to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    #[default]
    Back,
    Front,
}

/// A clockwise rotation restricted to quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parse a rotation in degrees.
    ///
    /// Multiples of 90 outside `0..360` (drivers have been seen reporting
    /// `-90`) are normalized modulo 360. Anything else is rejected.
    pub fn from_degrees(degrees: i32) -> Result<Self, ScanError> {
        if degrees % 90 != 0 {
            return Err(ScanError::InvalidRotation(degrees));
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Self::Deg0,
            90 => Self::Deg90,
            180 => Self::Deg180,
            _ => Self::Deg270,
        })
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// `(360 - self) mod 360`: the same turn taken counter-clockwise.
    pub fn mirrored(self) -> Self {
        Self::from_quarter_turns(4 - self.quarter_turns())
    }

    /// `(360 + self - other) mod 360`.
    pub fn minus(self, other: Self) -> Self {
        Self::from_quarter_turns(4 + self.quarter_turns() - other.quarter_turns())
    }

    fn quarter_turns(self) -> u32 {
        self.degrees() / 90
    }

    fn from_quarter_turns(turns: u32) -> Self {
        match turns % 4 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Width × height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Strictly taller than wide. Squares count as landscape.
    pub fn is_portrait(&self) -> bool {
        self.width < self.height
    }

    pub fn transposed(&self) -> Self {
        Self::new(self.height, self.width)
    }

    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// The same size with the longer edge first.
    pub fn landscape(&self) -> Self {
        if self.is_portrait() {
            self.transposed()
        } else {
            *self
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A point in frame coordinates reported by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultPoint {
    pub x: f32,
    pub y: f32,
}

impl ResultPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
