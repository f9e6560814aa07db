//! # Import Configuration
//!
//! Post-processing toggles and the index-base policy are fixed for the duration
//! of one OBJ parse. They are passed in as a value instead of being mutated on
//! a loader object, so a parse can never observe a half-applied setting.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::assets::LoaderError;
use crate::config::Config;

bitflags! {
    /// Post-processing steps applied while importing an OBJ stream
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PostProcessFlags: u8 {
        /// Swap the first two components of every texture coordinate
        const FLIP_UV = 1 << 0;
        /// Recognized for compatibility; polygon triangulation is not performed
        const TRIANGULATE = 1 << 1;
        /// Rebase face indices according to the active [`IndexPolicy`]
        const INDEX_CORRECTION = 1 << 2;
        /// Expand indexed faces into flat, position-aligned attribute arrays
        const INDEX_ELIMINATION = 1 << 3;
    }
}

/// How an exporter numbered its face indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexPolicy {
    /// Indices already start at zero
    #[default]
    ZeroBased,
    /// Indices start at one
    OneBased,
    /// Indices are negative offsets from the end of the elements seen so far
    NegativeRelative,
}

impl IndexPolicy {
    /// Legacy numeric selector for [`IndexPolicy::ZeroBased`]
    pub const ZERO_BASED_CODE: i32 = 20001;
    /// Legacy numeric selector for [`IndexPolicy::OneBased`]
    pub const ONE_BASED_CODE: i32 = 20101;
    /// Legacy numeric selector for [`IndexPolicy::NegativeRelative`]
    pub const NEGATIVE_RELATIVE_CODE: i32 = 20201;

    /// Resolve a legacy numeric selector
    pub fn from_code(code: i32) -> Result<Self, LoaderError> {
        match code {
            Self::ZERO_BASED_CODE => Ok(Self::ZeroBased),
            Self::ONE_BASED_CODE => Ok(Self::OneBased),
            Self::NEGATIVE_RELATIVE_CODE => Ok(Self::NegativeRelative),
            other => Err(LoaderError::InvalidIndexPolicy(other.to_string())),
        }
    }

    /// Apply the policy to one parsed index.
    ///
    /// `seen` is the number of elements of the same channel stored so far in
    /// the current mesh. Returns `None` when the corrected index does not fit
    /// in an `i64`.
    pub fn correct(self, raw: i64, seen: usize) -> Option<i64> {
        match self {
            Self::ZeroBased => Some(raw),
            Self::OneBased => raw.checked_sub(1),
            Self::NegativeRelative => i64::try_from(seen).ok().and_then(|seen| raw.checked_add(seen)),
        }
    }
}

impl fmt::Display for IndexPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ZeroBased => "ZERO_BASED",
            Self::OneBased => "ONE_BASED",
            Self::NegativeRelative => "NEGATIVE_RELATIVE",
        };
        f.write_str(name)
    }
}

impl FromStr for IndexPolicy {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZERO_BASED" => Ok(Self::ZeroBased),
            "ONE_BASED" => Ok(Self::OneBased),
            "NEGATIVE_RELATIVE" => Ok(Self::NegativeRelative),
            _ => Err(LoaderError::InvalidIndexPolicy(s.to_string())),
        }
    }
}

/// # Import Configuration
///
/// All toggles default to off and the index policy defaults to
/// [`IndexPolicy::ZeroBased`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Enabled post-processing steps
    pub post_process: PostProcessFlags,
    /// Index-base policy, only consulted when `INDEX_CORRECTION` is enabled
    pub index_policy: IndexPolicy,
}

impl ImportConfig {
    /// Create a configuration with every toggle disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable a set of post-processing steps
    pub fn with_post_process(mut self, flags: PostProcessFlags, enabled: bool) -> Self {
        self.post_process.set(flags, enabled);
        self
    }

    /// Set the index-base policy
    pub fn with_index_policy(mut self, policy: IndexPolicy) -> Self {
        self.index_policy = policy;
        self
    }

    /// Enable index correction with the given policy
    pub fn with_index_correction(self, policy: IndexPolicy) -> Self {
        self.with_post_process(PostProcessFlags::INDEX_CORRECTION, true)
            .with_index_policy(policy)
    }

    /// Whether texture coordinates are flipped at parse time
    pub fn flip_uv(&self) -> bool {
        self.post_process.contains(PostProcessFlags::FLIP_UV)
    }

    /// Whether triangulation was requested
    pub fn triangulate(&self) -> bool {
        self.post_process.contains(PostProcessFlags::TRIANGULATE)
    }

    /// Whether face indices are rebased at parse time
    pub fn index_correction(&self) -> bool {
        self.post_process.contains(PostProcessFlags::INDEX_CORRECTION)
    }

    /// Whether meshes are de-indexed after the parse
    pub fn index_elimination(&self) -> bool {
        self.post_process.contains(PostProcessFlags::INDEX_ELIMINATION)
    }

    /// The policy actually applied to face indices.
    ///
    /// With correction disabled indices are stored as parsed.
    pub fn effective_policy(&self) -> IndexPolicy {
        if self.index_correction() {
            self.index_policy
        } else {
            IndexPolicy::ZeroBased
        }
    }
}

impl Config for ImportConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_are_off() {
        let config = ImportConfig::default();
        assert!(config.post_process.is_empty());
        assert_eq!(config.index_policy, IndexPolicy::ZeroBased);
        assert!(!config.flip_uv());
        assert!(!config.index_elimination());
    }

    #[test]
    fn test_effective_policy_requires_correction() {
        let config = ImportConfig::new().with_index_policy(IndexPolicy::OneBased);
        assert_eq!(config.effective_policy(), IndexPolicy::ZeroBased);

        let config = config.with_post_process(PostProcessFlags::INDEX_CORRECTION, true);
        assert_eq!(config.effective_policy(), IndexPolicy::OneBased);
    }

    #[test]
    fn test_policy_correction() {
        assert_eq!(IndexPolicy::ZeroBased.correct(3, 10), Some(3));
        assert_eq!(IndexPolicy::OneBased.correct(1, 10), Some(0));
        assert_eq!(IndexPolicy::NegativeRelative.correct(-1, 10), Some(9));
        assert_eq!(IndexPolicy::NegativeRelative.correct(-10, 10), Some(0));
    }

    #[test]
    fn test_policy_correction_overflow() {
        assert_eq!(IndexPolicy::OneBased.correct(i64::MIN, 0), None);
        assert_eq!(IndexPolicy::NegativeRelative.correct(i64::MAX, 1), None);
        assert_eq!(IndexPolicy::ZeroBased.correct(i64::MIN, 0), Some(i64::MIN));
    }

    #[test]
    fn test_policy_codes() {
        assert_eq!(IndexPolicy::from_code(20001).unwrap(), IndexPolicy::ZeroBased);
        assert_eq!(IndexPolicy::from_code(20101).unwrap(), IndexPolicy::OneBased);
        assert_eq!(IndexPolicy::from_code(20201).unwrap(), IndexPolicy::NegativeRelative);
        assert!(matches!(
            IndexPolicy::from_code(42),
            Err(LoaderError::InvalidIndexPolicy(_))
        ));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("one_based".parse::<IndexPolicy>().unwrap(), IndexPolicy::OneBased);
        assert_eq!("NEGATIVE_RELATIVE".parse::<IndexPolicy>().unwrap(), IndexPolicy::NegativeRelative);
        assert!("two_based".parse::<IndexPolicy>().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let text = r#"
post_process = "FLIP_UV | INDEX_ELIMINATION"
index_policy = "ONE_BASED"
"#;
        let config = ImportConfig::parse(text, ConfigFormat::Toml).unwrap();
        assert!(config.flip_uv());
        assert!(config.index_elimination());
        assert!(!config.index_correction());
        assert_eq!(config.index_policy, IndexPolicy::OneBased);
    }

    #[test]
    fn test_config_from_ron_uses_defaults() {
        let config = ImportConfig::parse("(index_policy: NEGATIVE_RELATIVE)", ConfigFormat::Ron).unwrap();
        assert!(config.post_process.is_empty());
        assert_eq!(config.index_policy, IndexPolicy::NegativeRelative);
    }
}
