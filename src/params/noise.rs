//! Noise field and fractal sampling parameters.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::error::ConfigError;

/// Upper bound on fractal octaves; past this the amplitude is below f64 noise
pub const MAX_OCTAVES: u32 = 16;

/// Growth policy for a memoisation table
///
/// Results never depend on the policy, only memory use does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Always recompute
    Disabled,
    /// Keep every entry for the lifetime of the process
    Unbounded,
    /// Keep at most this many entries, evicting least recently used
    Lru(NonZeroUsize),
}

impl CachePolicy {
    /// Bounded policy; `0` means disabled
    pub fn lru(entries: usize) -> Self {
        NonZeroUsize::new(entries).map_or(Self::Disabled, Self::Lru)
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "off" | "none" | "disabled" => Ok(Self::Disabled),
            "unbounded" => Ok(Self::Unbounded),
            other => other
                .strip_prefix("lru:")
                .unwrap_or(other)
                .parse::<usize>()
                .map(Self::lru)
                .map_err(|_| ConfigError::InvalidCachePolicy(s.to_string())),
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "off"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::Lru(n) => write!(f, "lru:{}", n),
        }
    }
}

/// Noise field configuration
#[derive(Debug, Clone)]
pub struct NoiseConfig {
    /// Fractal octaves summed per sample (frequency x2, amplitude x0.5 each)
    pub octaves: u32,

    /// Lattice gradient memo table (16 bytes key + 16 bytes value per entry)
    pub gradient_cache: CachePolicy,

    /// Sampled value memo table; hits only on bit-identical coordinates
    pub value_cache: CachePolicy,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 5,
            gradient_cache: CachePolicy::lru(4096),
            value_cache: CachePolicy::lru(16384),
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves > MAX_OCTAVES {
            return Err(ConfigError::TooManyOctaves {
                got: self.octaves,
                max: MAX_OCTAVES,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policies() {
        assert_eq!("off".parse::<CachePolicy>(), Ok(CachePolicy::Disabled));
        assert_eq!("Unbounded".parse::<CachePolicy>(), Ok(CachePolicy::Unbounded));
        assert_eq!("lru:512".parse::<CachePolicy>(), Ok(CachePolicy::lru(512)));
        assert_eq!("64".parse::<CachePolicy>(), Ok(CachePolicy::lru(64)));
        assert_eq!("lru:0".parse::<CachePolicy>(), Ok(CachePolicy::Disabled));
        assert!("lru:lots".parse::<CachePolicy>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for policy in [
            CachePolicy::Disabled,
            CachePolicy::Unbounded,
            CachePolicy::lru(4096),
        ] {
            assert_eq!(policy.to_string().parse::<CachePolicy>(), Ok(policy));
        }
    }

    #[test]
    fn test_octave_limit() {
        let config = NoiseConfig {
            octaves: MAX_OCTAVES + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(NoiseConfig::default().validate().is_ok());
    }
}
