/// Configuration file support for FIELDBOT
///
/// Grid dimensions, perception thresholds and static field elements are read
/// from a TOML or YAML file instead of being hardcoded.
use crate::algorithms::geometry::Point2;
use crate::algorithms::occupancy_grid::divides_evenly;
use crate::algorithms::polygon::Polygon;
use crate::error::{FieldbotError, FieldbotResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Occupancy grid dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid width in meters
    pub width: f64,

    /// Grid height in meters
    pub height: f64,

    /// Cell edge length in meters
    pub cell_resolution: f64,

    /// World position of the grid center
    pub origin: Point2,

    /// Obstacle growth in cells applied every cycle
    pub dilation_kernel_size: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 8.0,
            cell_resolution: 0.1,
            origin: (0.0, 0.0),
            dilation_kernel_size: 2,
        }
    }
}

/// Object detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Spatial hash bucket edge in meters
    pub bucket_size: f64,

    /// Fraction of cluster points that must agree with a circle
    pub consensus: f64,

    /// Inlier distance from the circle outline in meters
    pub tolerance: f64,

    /// RANSAC hypotheses per cluster
    pub max_iterations: usize,

    /// RANSAC seed
    pub seed: u64,

    /// Smallest accepted circle radius in meters
    pub min_radius: f64,

    /// Largest accepted circle radius in meters
    pub max_radius: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            bucket_size: 0.1,
            consensus: 0.7,
            tolerance: 0.02,
            max_iterations: 50,
            seed: crate::algorithms::circle_fit::DEFAULT_SEED,
            min_radius: 0.0,
            max_radius: 0.5,
        }
    }
}

/// Static field layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Field elements as counter-clockwise vertex lists
    pub static_obstacles: Vec<Polygon>,

    /// Margin added around every static obstacle, in meters
    pub obstacle_buffer: f64,
}

/// Full FIELDBOT configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldbotConfig {
    pub grid: GridConfig,
    pub perception: PerceptionConfig,
    pub planning: PlanningConfig,
}

impl FieldbotConfig {
    /// Load config from a file (auto-detect format)
    pub fn from_file<P: AsRef<Path>>(path: P) -> FieldbotResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FieldbotError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        // Auto-detect format based on extension
        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("toml") => Self::from_toml(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => {
                // Try both formats
                Self::from_toml(&contents).or_else(|_| Self::from_yaml(&contents))
            }
        }
    }

    /// Parse and validate config from a TOML string
    pub fn from_toml(contents: &str) -> FieldbotResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| FieldbotError::config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a YAML string
    pub fn from_yaml(contents: &str) -> FieldbotResult<Self> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| FieldbotError::config(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and cross-field constraints
    pub fn validate(&self) -> FieldbotResult<()> {
        let grid = &self.grid;
        if !(grid.cell_resolution.is_finite() && grid.cell_resolution > 0.0) {
            return Err(FieldbotError::config(format!(
                "grid.cell_resolution must be positive, got {}",
                grid.cell_resolution
            )));
        }
        for (name, extent) in [("width", grid.width), ("height", grid.height)] {
            if !(extent.is_finite() && extent >= grid.cell_resolution) {
                return Err(FieldbotError::config(format!(
                    "grid.{} must hold at least one cell, got {}",
                    name, extent
                )));
            }
            if !divides_evenly(extent, grid.cell_resolution) {
                return Err(FieldbotError::config(format!(
                    "grid.cell_resolution {} does not divide grid.{} {}",
                    grid.cell_resolution, name, extent
                )));
            }
        }

        let perception = &self.perception;
        if !(perception.consensus > 0.0 && perception.consensus <= 1.0) {
            return Err(FieldbotError::config(format!(
                "perception.consensus must be in (0, 1], got {}",
                perception.consensus
            )));
        }
        if !(perception.tolerance >= 0.0) {
            return Err(FieldbotError::config(format!(
                "perception.tolerance must not be negative, got {}",
                perception.tolerance
            )));
        }
        if !(perception.bucket_size.is_finite() && perception.bucket_size > 0.0) {
            return Err(FieldbotError::config(format!(
                "perception.bucket_size must be positive, got {}",
                perception.bucket_size
            )));
        }
        if perception.min_radius > perception.max_radius {
            return Err(FieldbotError::config(format!(
                "perception.min_radius {} exceeds max_radius {}",
                perception.min_radius, perception.max_radius
            )));
        }

        let planning = &self.planning;
        if !(planning.obstacle_buffer >= 0.0) {
            return Err(FieldbotError::config(format!(
                "planning.obstacle_buffer must not be negative, got {}",
                planning.obstacle_buffer
            )));
        }
        for (i, polygon) in planning.static_obstacles.iter().enumerate() {
            if polygon.vertices().len() < 3 {
                return Err(FieldbotError::config(format!(
                    "planning.static_obstacles[{}] needs at least 3 vertices",
                    i
                )));
            }
            if !polygon.is_convex() {
                return Err(FieldbotError::config(format!(
                    "planning.static_obstacles[{}] is not convex in counter-clockwise order",
                    i
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIELD_TOML: &str = r#"
[grid]
width = 8.0
height = 4.0
cell_resolution = 0.25
origin = [1.0, -0.5]
dilation_kernel_size = 1

[perception]
consensus = 0.6
seed = 3

[planning]
obstacle_buffer = 0.1
static_obstacles = [
    [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
]
"#;

    #[test]
    fn test_defaults_are_valid() {
        let config = FieldbotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.width, 16.0);
        assert_eq!(config.perception.seed, 10);
        assert!(config.planning.static_obstacles.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = FieldbotConfig::from_toml(FIELD_TOML).unwrap();

        assert_eq!(config.grid.width, 8.0);
        assert_eq!(config.grid.origin, (1.0, -0.5));
        assert_eq!(config.grid.dilation_kernel_size, 1);
        assert_eq!(config.perception.consensus, 0.6);
        assert_eq!(config.perception.seed, 3);
        // Unset fields keep their defaults
        assert_eq!(config.perception.max_iterations, 50);
        assert_eq!(config.planning.static_obstacles.len(), 1);
        assert!(config.planning.static_obstacles[0].is_convex());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
grid:
  width: 4.0
  height: 2.0
  cell_resolution: 0.5
planning:
  static_obstacles:
    - [[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]]
"#;
        let config = FieldbotConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.grid.cell_resolution, 0.5);
        assert_eq!(config.planning.static_obstacles[0].vertices().len(), 3);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = FieldbotConfig::from_toml("").unwrap();
        assert_eq!(config, FieldbotConfig::default());
    }

    #[test]
    fn test_rejects_indivisible_resolution() {
        let err = FieldbotConfig::from_toml("[grid]\nwidth = 1.0\nheight = 1.0\ncell_resolution = 0.3")
            .unwrap_err();
        assert!(matches!(err, FieldbotError::Config(_)));
        assert!(err.to_string().contains("does not divide"));
    }

    #[test]
    fn test_accepts_extent_with_float_noise() {
        let config =
            FieldbotConfig::from_toml("[grid]\nwidth = 4.6\nheight = 2.2\ncell_resolution = 0.2")
                .unwrap();
        assert_eq!(config.grid.width, 4.6);
    }

    #[test]
    fn test_rejects_bad_consensus() {
        let mut config = FieldbotConfig::default();
        config.perception.consensus = 0.0;
        assert!(config.validate().is_err());

        config.perception.consensus = 1.5;
        assert!(config.validate().is_err());

        config.perception.consensus = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_concave_obstacle() {
        let mut config = FieldbotConfig::default();
        config.planning.static_obstacles.push(Polygon::new(vec![
            (0.0, 1.0),
            (1.0, 1.0),
            (1.0, 0.0),
            (0.0, 0.0),
        ]));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("static_obstacles[0]"));
    }

    #[test]
    fn test_rejects_radius_range() {
        let mut config = FieldbotConfig::default();
        config.perception.min_radius = 0.4;
        config.perception.max_radius = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_detects_format() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("field.toml");
        std::fs::write(&toml_path, FIELD_TOML).unwrap();
        let config = FieldbotConfig::from_file(&toml_path).unwrap();
        assert_eq!(config.grid.height, 4.0);

        let yaml_path = dir.path().join("field.yml");
        std::fs::write(&yaml_path, "grid:\n  width: 2.0\n  height: 2.0\n  cell_resolution: 1.0\n")
            .unwrap();
        let config = FieldbotConfig::from_file(&yaml_path).unwrap();
        assert_eq!(config.grid.width, 2.0);
    }

    #[test]
    fn test_from_file_without_extension() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "perception:\n  seed: 77").unwrap();

        let config = FieldbotConfig::from_file(file.path()).unwrap();
        assert_eq!(config.perception.seed, 77);
    }

    #[test]
    fn test_missing_file() {
        let err = FieldbotConfig::from_file("/nonexistent/fieldbot.toml").unwrap_err();
        assert!(matches!(err, FieldbotError::Config(_)));
    }
}
