//! Human-readable byte counts

use serde::{Deserialize, Serialize};

/// Formats a raw byte count for display
pub trait ByteHumanizer {
    fn humanize(&self, bytes: u64) -> String;
}

impl<H: ByteHumanizer + ?Sized> ByteHumanizer for &H {
    fn humanize(&self, bytes: u64) -> String {
        (**self).humanize(bytes)
    }
}

/// Unit system for [`BytesForHumans`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteUnits {
    /// Powers of 1000: KB, MB, GB, TB
    #[default]
    Decimal,
    /// Powers of 1024: KiB, MiB, GiB, TiB
    Binary,
}

impl ByteUnits {
    fn base(self) -> f64 {
        match self {
            Self::Decimal => 1000.0,
            Self::Binary => 1024.0,
        }
    }

    fn suffixes(self) -> [&'static str; 4] {
        match self {
            Self::Decimal => ["KB", "MB", "GB", "TB"],
            Self::Binary => ["KiB", "MiB", "GiB", "TiB"],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BytesForHumans {
    pub units: ByteUnits,
}

impl BytesForHumans {
    pub fn new(units: ByteUnits) -> Self {
        Self { units }
    }
}

impl ByteHumanizer for BytesForHumans {
    fn humanize(&self, bytes: u64) -> String {
        let base = self.units.base();
        let mut value = bytes as f64;

        if value < base {
            return format!("{} B", bytes);
        }

        let suffixes = self.units.suffixes();
        let mut unit = 0;
        value /= base;
        while value >= base && unit + 1 < suffixes.len() {
            value /= base;
            unit += 1;
        }

        // One fractional digit at most, and no trailing ".0"
        let mut rounded = (value * 10.0).round() / 10.0;
        if rounded >= base && unit + 1 < suffixes.len() {
            unit += 1;
            rounded = (value / base * 10.0).round() / 10.0;
        }
        if rounded.fract() == 0.0 {
            format!("{:.0} {}", rounded, suffixes[unit])
        } else {
            format!("{:.1} {}", rounded, suffixes[unit])
        }
    }
}
