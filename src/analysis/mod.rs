//! Analysis steps over a loaded contact graph

pub mod basic;
pub mod centrality;
pub mod community;
pub mod power;
pub mod powerlaw;
pub mod properties;
pub mod robustness;

pub use basic::{compute_basic_metrics, BasicMetrics};
pub use centrality::{compute_centralities, CentralityRow, CentralityTable};
pub use community::{detect_communities, CommunityDetection, CommunityReport};
pub use power::{identify_power_structure, PowerRecord, PowerStructure};
pub use properties::{calculate_small_world, test_scale_free, NetworkProperties, ScaleFreeReport, SmallWorldReport};
pub use robustness::{
    simulate_random_failure, simulate_targeted_attack, RandomFailure, RobustnessReport, TargetedAttack,
};

/// Independent random streams, one per stochastic step
#[derive(Debug, Clone, Copy)]
pub enum SeedStream {
    Diameter = 1,
    Betweenness = 2,
    Sampling = 3,
    Louvain = 4,
    PathLength = 5,
    RandomFailure = 6,
    Layout = 7,
}

/// Seed for one step, derived from the configured base seed
pub fn derive_seed(base: u64, stream: SeedStream) -> u64 {
    base.wrapping_add((stream as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
