use std::fmt;
use std::str::FromStr;

/// Frequency in Hertz (Hz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hertz(pub u64);

impl fmt::Display for Hertz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            hz if hz >= 1_000_000_000 => write!(f, "{:.6} GHz", hz as f64 / 1e9),
            hz if hz >= 1_000_000 => write!(f, "{:.3} MHz", hz as f64 / 1e6),
            hz if hz >= 1_000 => write!(f, "{:.3} kHz", hz as f64 / 1e3),
            hz => write!(f, "{} Hz", hz),
        }
    }
}

impl Hertz {
    pub const fn khz(khz: u64) -> Self {
        Self(khz * 1_000)
    }

    pub const fn mhz(mhz: u64) -> Self {
        Self(mhz * 1_000_000)
    }

    pub const fn ghz(ghz: u64) -> Self {
        Self(ghz * 1_000_000_000)
    }

    pub const fn as_hz(self) -> u64 {
        self.0
    }
}

impl From<u64> for Hertz {
    fn from(hz: u64) -> Self {
        Self(hz)
    }
}

impl From<u32> for Hertz {
    fn from(hz: u32) -> Self {
        Self(u64::from(hz))
    }
}

impl From<Hertz> for u64 {
    fn from(hz: Hertz) -> Self {
        hz.0
    }
}

/// Error returned when a frequency string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHertzError(String);

impl fmt::Display for ParseHertzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid frequency '{}' (expected e.g. 915M, 2.4M, 200k)", self.0)
    }
}

impl std::error::Error for ParseHertzError {}

impl FromStr for Hertz {
    type Err = ParseHertzError;

    /// Parses plain Hz (`915000000`) or a value with a k/M/G suffix
    /// (`915M`, `2.4M`, `200k`). A trailing `Hz` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseHertzError(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_suffix("Hz")
            .or_else(|| trimmed.strip_suffix("hz"))
            .unwrap_or(trimmed)
            .trim_end();

        let (number, scale) = match trimmed.chars().last() {
            Some('k' | 'K') => (&trimmed[..trimmed.len() - 1], 1e3),
            Some('M') => (&trimmed[..trimmed.len() - 1], 1e6),
            Some('G' | 'g') => (&trimmed[..trimmed.len() - 1], 1e9),
            _ => (trimmed, 1.0),
        };

        if scale == 1.0 {
            return number.parse::<u64>().map(Hertz).map_err(|_| err());
        }

        let value: f64 = number.trim().parse().map_err(|_| err())?;
        let hz = (value * scale).round();
        if !hz.is_finite() || hz < 0.0 || hz > u64::MAX as f64 {
            return Err(err());
        }
        Ok(Hertz(hz as u64))
    }
}

/// Level in Decibels (dB).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Decibels(pub f32);

impl fmt::Display for Decibels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} dB", self.0)
    }
}

impl Decibels {
    /// Convert decibels to linear amplitude.
    /// For voltage/amplitude: linear = 10^(dB/20)
    pub fn to_linear(self) -> f32 {
        10.0_f32.powf(self.0 / 20.0)
    }

    /// Convert linear amplitude to decibels.
    /// For voltage/amplitude: dB = 20 * log10(linear)
    pub fn from_linear(linear: f32) -> Self {
        Self(20.0 * linear.log10())
    }

    pub const fn as_db(self) -> f32 {
        self.0
    }
}

impl From<f32> for Decibels {
    fn from(db: f32) -> Self {
        Self(db)
    }
}

impl From<Decibels> for f32 {
    fn from(db: Decibels) -> Self {
        db.0
    }
}
