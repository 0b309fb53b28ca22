//! Analysis configuration
//!
//! Loaded from YAML. Every section falls back to defaults, so a file only needs
//! the keys it wants to change.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data: DataConfig,
    pub analysis: AnalysisSection,
    pub visualization: VisualizationConfig,
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("data/Email-Enron.txt"),
            output_dir: PathBuf::from("outputs"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Base seed; each stochastic step derives its own from it
    pub seed: u64,
    pub centrality: CentralityConfig,
    pub power_structure: PowerStructureConfig,
    pub community: CommunityConfig,
    pub properties: PropertiesConfig,
    pub robustness: RobustnessConfig,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            seed: 42,
            centrality: CentralityConfig::default(),
            power_structure: PowerStructureConfig::default(),
            community: CommunityConfig::default(),
            properties: PropertiesConfig::default(),
            robustness: RobustnessConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    pub pagerank_alpha: f64,
    pub pagerank_max_iterations: usize,
    pub pagerank_tolerance: f64,
    pub betweenness_k_samples: usize,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            pagerank_alpha: 0.85,
            pagerank_max_iterations: 100,
            pagerank_tolerance: 1.0e-6,
            betweenness_k_samples: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerStructureConfig {
    /// Quantile of betweenness a broker must reach
    pub betweenness_threshold: f64,
    /// How many top-PageRank nodes are screened for hidden influence
    pub top_pagerank_pool: usize,
    /// Minimum degree-rank minus PageRank-rank for a hidden influencer
    pub rank_gap: f64,
    /// Records kept per list (hubs are not truncated)
    pub max_records: usize,
    /// Normalised score every hub measure must reach
    pub hub_threshold: f64,
}

impl Default for PowerStructureConfig {
    fn default() -> Self {
        Self {
            betweenness_threshold: 0.9,
            top_pagerank_pool: 100,
            rank_gap: 50.0,
            max_records: 20,
            hub_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    pub sampling_rate: f64,
    pub resolution: f64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 0.8,
            resolution: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertiesConfig {
    /// BFS sources for mean path length; all-pairs when the LCC is no larger
    pub path_length_samples: usize,
}

impl Default for PropertiesConfig {
    fn default() -> Self {
        Self { path_length_samples: 1000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobustnessConfig {
    /// Percentages of nodes removed
    pub percentages: Vec<u32>,
    pub random_trials: usize,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            percentages: vec![1, 5, 10, 20],
            random_trials: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub figure_dpi: u32,
    pub community_sample_nodes: usize,
    pub layout_iterations: usize,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            figure_dpi: 150,
            community_sample_nodes: 500,
            layout_iterations: 50,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(raw: &str) -> ConfigResult<Self> {
        // An empty document means "all defaults".
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Directory for JSON/CSV results
    pub fn metrics_dir(&self) -> PathBuf {
        self.data.output_dir.join("metrics")
    }

    /// Directory for rendered plots
    pub fn plots_dir(&self) -> PathBuf {
        self.data.output_dir.join("plots")
    }

    /// Reject values the analyses cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        let c = &self.analysis.centrality;
        if !(c.pagerank_alpha > 0.0 && c.pagerank_alpha < 1.0) {
            return Err(invalid("analysis.centrality.pagerank_alpha", "must be in (0, 1)"));
        }
        if c.pagerank_max_iterations == 0 {
            return Err(invalid("analysis.centrality.pagerank_max_iterations", "must be positive"));
        }
        if !(c.pagerank_tolerance > 0.0) {
            return Err(invalid("analysis.centrality.pagerank_tolerance", "must be positive"));
        }

        let p = &self.analysis.power_structure;
        if !(0.0..=1.0).contains(&p.betweenness_threshold) {
            return Err(invalid("analysis.power_structure.betweenness_threshold", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&p.hub_threshold) {
            return Err(invalid("analysis.power_structure.hub_threshold", "must be in [0, 1]"));
        }

        let rate = self.analysis.community.sampling_rate;
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(invalid("analysis.community.sampling_rate", "must be in (0, 1]"));
        }
        if !(self.analysis.community.resolution > 0.0) {
            return Err(invalid("analysis.community.resolution", "must be positive"));
        }

        let r = &self.analysis.robustness;
        if r.percentages.is_empty() {
            return Err(invalid("analysis.robustness.percentages", "must not be empty"));
        }
        if let Some(bad) = r.percentages.iter().find(|&&p| p == 0 || p >= 100) {
            return Err(invalid(
                "analysis.robustness.percentages",
                &format!("{} is outside (0, 100)", bad),
            ));
        }
        if r.random_trials == 0 {
            return Err(invalid("analysis.robustness.random_trials", "must be positive"));
        }

        if self.visualization.figure_dpi == 0 {
            return Err(invalid("visualization.figure_dpi", "must be positive"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
