//! Planner configuration.

/// Default lateral search distance around the route, in miles.
pub const DEFAULT_CORRIDOR_MILES: f64 = 10.0;

/// Default vehicle range on a full tank, in miles.
pub const DEFAULT_MAX_RANGE_MILES: f64 = 500.0;

/// Default fuel economy, in miles per gallon.
pub const DEFAULT_MPG: f64 = 10.0;

/// Configuration parameters for corridor search and start selection.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Distance between corridor samples along the route (miles).
    pub sample_interval_miles: f64,

    /// Maximum number of stations taken from each corridor sample.
    /// The cheapest stations in the sample box are kept.
    pub max_per_sample: usize,

    /// Radius around the origin searched for the first fill-up (miles).
    pub start_radius_miles: f64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(sample_interval_miles: f64, max_per_sample: usize, start_radius_miles: f64) -> Self {
        Self {
            sample_interval_miles,
            max_per_sample,
            start_radius_miles,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sample_interval_miles: 20.0,
            max_per_sample: 25,
            start_radius_miles: 25.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.sample_interval_miles, 20.0);
        assert_eq!(config.max_per_sample, 25);
        assert_eq!(config.start_radius_miles, 25.0);
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig::new(5.0, 10, 15.0);

        assert_eq!(config.sample_interval_miles, 5.0);
        assert_eq!(config.max_per_sample, 10);
        assert_eq!(config.start_radius_miles, 15.0);
    }
}
