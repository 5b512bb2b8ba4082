use serde::{Deserialize, Serialize};

use crate::*;

/// Everything needed to start one game session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub game: GameConfig,
    #[serde(default)]
    pub safe_start: SafeStart,
    /// Fixed seed for reproducible boards, a random one is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub const fn new(game: GameConfig) -> Self {
        Self {
            game,
            safe_start: SafeStart::SimpleSafe,
            seed: None,
        }
    }

    pub const fn with_safe_start(mut self, safe_start: SafeStart) -> Self {
        self.safe_start = safe_start;
        self
    }

    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses and validates settings such as
    /// `{"game": {"width": 9, "height": 9, "mines": 10}, "safe_start": "AlwaysZero"}`.
    pub fn from_json(json: &str) -> core::result::Result<Self, SettingsError> {
        let config: Self = serde_json::from_str(json)?;
        config.game.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> core::result::Result<alloc::string::String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub(crate) fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_settings_with_defaults() {
        let config =
            SessionConfig::from_json(r#"{"game": {"width": 9, "height": 9, "mines": 10}}"#)
                .unwrap();

        assert_eq!(config.game, GameConfig::beginner());
        assert_eq!(config.safe_start, SafeStart::SimpleSafe);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn parses_full_settings() {
        let config = SessionConfig::from_json(
            r#"{"game": {"width": 30, "height": 16, "mines": 99}, "safe_start": "AlwaysZero", "seed": 42}"#,
        )
        .unwrap();

        assert_eq!(
            config,
            SessionConfig::new(GameConfig::expert())
                .with_safe_start(SafeStart::AlwaysZero)
                .with_seed(42)
        );
        assert_eq!(config.resolve_seed(), 42);
    }

    #[test]
    fn rejects_invalid_board() {
        let err =
            SessionConfig::from_json(r#"{"game": {"width": 2, "height": 2, "mines": 4}}"#)
                .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::TooManyMines { mines: 4, cells: 4 })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = SessionConfig::from_json(r#"{"game": {"width": 9}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn json_round_trip_keeps_seed() {
        let config = SessionConfig::new(GameConfig::intermediate()).with_seed(5);
        let parsed = SessionConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
