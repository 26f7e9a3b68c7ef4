//! Range bands and their attack modifiers
//!
//! Engagement distance is a fixed ordered set of bands. Each band carries
//! its own attack DM; the three outer bands count as "long range" for
//! tactical-stance and auto-missile purposes.

use serde::{Deserialize, Serialize};

/// Distance category between the fleets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum RangeBand {
    Adjacent,
    Close,
    Short,
    #[default]
    Medium,
    Long,
    VeryLong,
    Distant,
}

impl RangeBand {
    pub const ALL: [RangeBand; 7] = [
        RangeBand::Adjacent,
        RangeBand::Close,
        RangeBand::Short,
        RangeBand::Medium,
        RangeBand::Long,
        RangeBand::VeryLong,
        RangeBand::Distant,
    ];

    /// Attack DM at this band
    pub fn dm(&self) -> i32 {
        match self {
            RangeBand::Adjacent => 2,
            RangeBand::Close => 1,
            RangeBand::Short => 1,
            RangeBand::Medium => 0,
            RangeBand::Long => -2,
            RangeBand::VeryLong => -4,
            RangeBand::Distant => -6,
        }
    }

    /// Long-range classification: missiles fly, fast ships jink
    pub fn is_long(&self) -> bool {
        matches!(
            self,
            RangeBand::Long | RangeBand::VeryLong | RangeBand::Distant
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangeBand::Adjacent => "Adjacent",
            RangeBand::Close => "Close",
            RangeBand::Short => "Short",
            RangeBand::Medium => "Medium",
            RangeBand::Long => "Long",
            RangeBand::VeryLong => "Very Long",
            RangeBand::Distant => "Distant",
        }
    }

    /// Case-insensitive lookup from a band label
    pub fn from_label(label: &str) -> Option<RangeBand> {
        let normalized = label.trim().to_ascii_lowercase().replace(['_', ' '], "");
        Self::ALL
            .iter()
            .copied()
            .find(|band| band.label().to_ascii_lowercase().replace(' ', "") == normalized)
    }
}

/// DM for a band given by label; unknown labels modify nothing
pub fn range_dm_for_label(label: &str) -> i32 {
    RangeBand::from_label(label).map(|band| band.dm()).unwrap_or(0)
}
