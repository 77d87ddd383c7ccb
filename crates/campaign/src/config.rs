//! Campaign configuration: who commands each army and how the game is paced.

use blitz_core::Side;
use oracle_engine::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Move-selection strategy for one side.
///
/// Only `Gemini` behaves differently: it asks the remote advisor first. The
/// other labels all play the local capture-biased policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Random,
    Minimax,
    Aggressive,
    Gemini,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Random,
        Strategy::Minimax,
        Strategy::Aggressive,
        Strategy::Gemini,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Random => "Random",
            Strategy::Minimax => "Minimax",
            Strategy::Aggressive => "Aggressive",
            Strategy::Gemini => "Gemini (GM)",
        }
    }

    pub fn is_remote(self) -> bool {
        matches!(self, Strategy::Gemini)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("capture bias must lie in [0, 1], got {0}")]
    CaptureBias(f64),
}

/// Configuration for a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Strategy of the French (first mover)
    pub white: Strategy,
    /// Strategy of the British (second mover)
    pub black: Strategy,
    /// Pause between half-moves
    pub move_delay_ms: u64,
    /// How long to wait for remote move advice before playing locally
    pub advice_timeout_ms: u64,
    /// Request commentary every N half-moves (0 disables it)
    pub commentary_every: usize,
    /// Probability of preferring an available capture
    pub capture_bias: f64,
    /// Declare a draw once this many half-moves have been played
    pub max_half_moves: Option<usize>,
    /// Seed for the local policy; entropy when absent
    pub seed: Option<u64>,
    /// Swap strategies between sides on every other game of a series
    pub alternate_sides: bool,
    /// Remote advisor connection
    pub advisor: GeminiConfig,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            white: Strategy::Random,
            black: Strategy::Gemini,
            move_delay_ms: 600,
            advice_timeout_ms: 8_000,
            commentary_every: 4,
            capture_bias: random_engine::DEFAULT_CAPTURE_BIAS,
            max_half_moves: None,
            seed: None,
            alternate_sides: false,
            advisor: GeminiConfig::default(),
        }
    }
}

impl CampaignConfig {
    /// Load a TOML config file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: CampaignConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.capture_bias) {
            return Err(ConfigError::CaptureBias(self.capture_bias));
        }
        Ok(())
    }

    pub fn strategy(&self, side: Side) -> Strategy {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    pub fn advice_timeout(&self) -> Duration {
        Duration::from_millis(self.advice_timeout_ms)
    }

    pub fn uses_remote(&self) -> bool {
        self.white.is_remote() || self.black.is_remote()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_matchup() {
        let config = CampaignConfig::default();
        assert_eq!(config.strategy(Side::White), Strategy::Random);
        assert_eq!(config.strategy(Side::Black), Strategy::Gemini);
        assert_eq!(config.move_delay(), Duration::from_millis(600));
        assert_eq!(config.commentary_every, 4);
        assert!(config.uses_remote());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = CampaignConfig::from_toml(
            r#"
            white = "aggressive"
            black = "minimax"
            seed = 9

            [advisor]
            model = "gemini-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.white, Strategy::Aggressive);
        assert_eq!(config.black, Strategy::Minimax);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.advisor.model, "gemini-test");
        assert_eq!(config.advisor.endpoint, oracle_engine::DEFAULT_ENDPOINT);
        assert_eq!(config.move_delay_ms, 600);
        assert!(!config.uses_remote());
    }

    #[test]
    fn bad_capture_bias_is_rejected() {
        let err = CampaignConfig::from_toml("capture_bias = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::CaptureBias(b) if b == 1.5));
    }

    #[test]
    fn unknown_strategy_is_a_parse_error() {
        let err = CampaignConfig::from_toml(r#"white = "stockfish""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(Strategy::Gemini.to_string(), "Gemini (GM)");
        assert!(Strategy::ALL.iter().filter(|s| s.is_remote()).count() == 1);
    }
}
