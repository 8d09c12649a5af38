//! Wait-time urgency tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display emphasis for a waitlist row, derived from days waited.
///
/// Used for colouring only; the waitlist is never reordered by tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    /// Under 15 days (including future-dated contacts)
    Low,
    /// 15 to 29 days
    Medium,
    /// 30 days or more
    High,
}

impl UrgencyTier {
    /// Background colour as a 24-bit RGB value.
    pub fn rgb(&self) -> u32 {
        match self {
            UrgencyTier::Low => 0xD4EDDA,
            UrgencyTier::Medium => 0xFFF3CD,
            UrgencyTier::High => 0xF8D7DA,
        }
    }

    /// Background colour as a CSS hex string.
    pub fn background_color(&self) -> &'static str {
        match self {
            UrgencyTier::Low => "#d4edda",
            UrgencyTier::Medium => "#fff3cd",
            UrgencyTier::High => "#f8d7da",
        }
    }

    /// CSS class for table rows.
    pub fn css_class(&self) -> &'static str {
        match self {
            UrgencyTier::Low => "urgency-low",
            UrgencyTier::Medium => "urgency-medium",
            UrgencyTier::High => "urgency-high",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Low => "low",
            UrgencyTier::Medium => "medium",
            UrgencyTier::High => "high",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
