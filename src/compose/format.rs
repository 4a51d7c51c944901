//! Target pixel formats for share images.
//!
//! The set is closed: two orientations (square and portrait) each with a
//! standard and an HD variant. HD variants keep the aspect ratio of their
//! standard counterpart and multiply both dimensions by [`HD_MULTIPLIER`].
//!
//! | Format | Slug | Pixels |
//! |---|---|---|
//! | [`ShareFormat::Square`] | `square` | 1080×1080 |
//! | [`ShareFormat::Portrait`] | `portrait` | 1080×1920 |
//! | [`ShareFormat::SquareHd`] | `square-hd` | 2160×2160 |
//! | [`ShareFormat::PortraitHd`] | `portrait-hd` | 2160×3840 |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Integer multiplier applied to the standard formats to get the HD ones.
pub const HD_MULTIPLIER: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown share format '{0}' (expected one of: square, portrait, square-hd, portrait-hd)")]
pub struct FormatParseError(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShareFormat {
    Square,
    #[default]
    Portrait,
    SquareHd,
    PortraitHd,
}

impl ShareFormat {
    pub const ALL: [ShareFormat; 4] = [
        ShareFormat::Square,
        ShareFormat::Portrait,
        ShareFormat::SquareHd,
        ShareFormat::PortraitHd,
    ];

    /// The non-HD counterpart (identity for standard formats).
    pub fn standard(self) -> Self {
        match self {
            Self::Square | Self::SquareHd => Self::Square,
            Self::Portrait | Self::PortraitHd => Self::Portrait,
        }
    }

    /// 1 for standard formats, [`HD_MULTIPLIER`] for HD ones.
    pub fn hd_scale(self) -> u32 {
        if self.is_hd() { HD_MULTIPLIER } else { 1 }
    }

    pub fn width(self) -> u32 {
        1080 * self.hd_scale()
    }

    pub fn height(self) -> u32 {
        let base = match self.standard() {
            Self::Square => 1080,
            _ => 1920,
        };
        base * self.hd_scale()
    }

    pub fn is_square(self) -> bool {
        matches!(self, Self::Square | Self::SquareHd)
    }

    pub fn is_portrait(self) -> bool {
        matches!(self, Self::Portrait | Self::PortraitHd)
    }

    pub fn is_hd(self) -> bool {
        matches!(self, Self::SquareHd | Self::PortraitHd)
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Portrait => "portrait",
            Self::SquareHd => "square-hd",
            Self::PortraitHd => "portrait-hd",
        }
    }

    /// Width over height.
    pub fn aspect_ratio(self) -> f32 {
        self.width() as f32 / self.height() as f32
    }
}

impl fmt::Display for ShareFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ShareFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|f| f.slug() == normalized)
            .ok_or_else(|| FormatParseError(s.to_string()))
    }
}
