//! Tunables for both games.
//!
//! Defaults reproduce the shipped game. With the `serde_json` feature a page can
//! override any subset of fields by passing a JSON object to the game's
//! `newWithOptions` constructor; omitted fields keep their defaults.

use crate::error::{Error, Result};

pub const GRID_SIZE: usize = 64;
pub const INITIAL_LIVES: u32 = 3;
pub const INITIAL_TIME: u32 = 45;
pub const TICK_INTERVAL_MS: u32 = 1_000;
pub const SPAWN_INTERVAL_MS: u32 = 700;
pub const WIN_SCORE: u32 = 300;
pub const REPAIR_POINTS: u32 = 10;

/// Longest timer period accepted; browsers take `setInterval` timeouts as i32.
pub const MAX_TIMER_PERIOD_MS: u32 = i32::MAX as u32;

/// Upper bound of the placement energy pool.
pub const MAX_ENERGY: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ReflexConfig {
    pub grid_size: usize,
    pub initial_lives: u32,
    /// Session length in whole seconds (one tick each).
    pub initial_time: u32,
    pub tick_ms: u32,
    pub spawn_ms: u32,
    pub win_score: u32,
    pub repair_points: u32,
}

impl Default for ReflexConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            initial_lives: INITIAL_LIVES,
            initial_time: INITIAL_TIME,
            tick_ms: TICK_INTERVAL_MS,
            spawn_ms: SPAWN_INTERVAL_MS,
            win_score: WIN_SCORE,
            repair_points: REPAIR_POINTS,
        }
    }
}

impl ReflexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::InvalidConfig("grid_size must be at least 1".into()));
        }
        if self.initial_lives == 0 {
            return Err(Error::InvalidConfig("initial_lives must be at least 1".into()));
        }
        if self.initial_time == 0 {
            return Err(Error::InvalidConfig("initial_time must be at least 1".into()));
        }
        if self.tick_ms == 0 || self.spawn_ms == 0 {
            return Err(Error::InvalidConfig("timer periods must be non-zero".into()));
        }
        if self.tick_ms > MAX_TIMER_PERIOD_MS || self.spawn_ms > MAX_TIMER_PERIOD_MS {
            return Err(Error::InvalidConfig(format!(
                "timer periods must be at most {MAX_TIMER_PERIOD_MS}ms"
            )));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Starting values of the placement world. Action costs and deltas are fixed
/// rules of the game and live with the catalog instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PlacementConfig {
    pub energy: u32,
    pub gravity: u32,
    pub climate: u32,
    pub biosphere: u32,
    pub population: u32,
    pub hope: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            energy: 70,
            gravity: 32,
            climate: 28,
            biosphere: 24,
            population: 18,
            hope: 10,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> Result<()> {
        if self.energy > MAX_ENERGY {
            return Err(Error::InvalidConfig(format!(
                "energy must be within 0..={MAX_ENERGY}, got {}",
                self.energy
            )));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
