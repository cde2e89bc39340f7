use serde::Deserialize;

use crate::error::{SimError, SimResult};

/// Configuration for a simulation run.
///
/// Every field has a default, so a JSON config file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Side length of the square area covered by the spatial index.
    pub world_size: f32,
    /// Entries a quadtree node holds before it splits.
    pub quadtree_capacity: usize,
    /// Deepest quadtree level; nodes at this depth never split.
    pub quadtree_max_depth: usize,
    /// Margin around a creature's tile searched for food.
    pub forage_radius: f32,
    /// Margin around a creature's tile searched for a wander destination.
    pub wander_radius: f32,
    /// Distance under which a creature has reached its movement target.
    pub arrival_epsilon: f32,
    /// Mean of the idle wander roll.
    pub wander_mean: f32,
    /// Standard deviation of the idle wander roll.
    pub wander_std_dev: f32,
    /// Rolls above this start a wander.
    pub wander_threshold: f32,
    /// Publish debug shapes for spatial queries and targets.
    pub debug_overlay: bool,
    /// Virtual seconds a debug shape stays visible.
    pub debug_ttl_secs: f32,
    /// Hour at which a sunrise event fires.
    pub sunrise_hour: u8,
    /// Hour at which a sunset event fires.
    pub sunset_hour: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_events: 10_000,
            world_size: 32.0 * 256.0,
            quadtree_capacity: 16,
            quadtree_max_depth: 8,
            forage_radius: 2.0,
            wander_radius: 5.0,
            arrival_epsilon: 0.1,
            wander_mean: 0.9,
            wander_std_dev: 0.3,
            wander_threshold: 0.5,
            debug_overlay: false,
            debug_ttl_secs: 3.0,
            sunrise_hour: 6,
            sunset_hour: 20,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set the side length of the indexed area.
    pub fn with_world_size(mut self, size: f32) -> Self {
        self.world_size = size;
        self
    }

    /// Set the food search margin.
    pub fn with_forage_radius(mut self, radius: f32) -> Self {
        self.forage_radius = radius;
        self
    }

    /// Set the wander search margin.
    pub fn with_wander_radius(mut self, radius: f32) -> Self {
        self.wander_radius = radius;
        self
    }

    /// Set the idle wander roll distribution.
    pub fn with_wander_roll(mut self, mean: f32, std_dev: f32) -> Self {
        self.wander_mean = mean;
        self.wander_std_dev = std_dev;
        self
    }

    /// Enable or disable the debug overlay.
    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    /// Parse a config from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        if self.world_size <= 0.0 {
            return Err(SimError::InvalidConfig("world_size must be positive".into()));
        }
        if self.quadtree_capacity == 0 {
            return Err(SimError::InvalidConfig(
                "quadtree_capacity must be at least 1".into(),
            ));
        }
        if self.wander_std_dev < 0.0 {
            return Err(SimError::InvalidConfig(
                "wander_std_dev must not be negative".into(),
            ));
        }
        if self.arrival_epsilon < 0.0 || self.forage_radius < 0.0 || self.wander_radius < 0.0 {
            return Err(SimError::InvalidConfig(
                "radii and arrival_epsilon must not be negative".into(),
            ));
        }
        if self.sunrise_hour >= 24 || self.sunset_hour >= 24 {
            return Err(SimError::InvalidConfig("hours must be below 24".into()));
        }
        Ok(())
    }
}
