use std::fmt::Display;

const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteCount(pub u64);

impl From<u64> for ByteCount {
    fn from(x: u64) -> Self {
        ByteCount(x)
    }
}

impl ByteCount {
    /// Renders the count with binary units and two decimals, e.g. `3.64 TiB`.
    /// Counts below 1 KiB are rendered as a plain number of bytes.
    pub fn to_human_readable(&self) -> String {
        if self.0 < 1024 {
            return format!("{} {}", self.0, UNITS[0]);
        }

        let mut value = self.0 as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        // Rounding to two decimals can carry into the next unit
        if (value * 100.0).round() >= 1024.0 * 100.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }

        format!("{:.2} {}", value, UNITS[unit])
    }
}

impl Display for ByteCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_human_readable())
    }
}
