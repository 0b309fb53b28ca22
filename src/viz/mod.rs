//! SVG figures for the analysis results

pub mod layout;
pub mod plots;
pub mod svg;

pub use layout::{force_layout, Point};
pub use plots::{
    plot_centrality_correlation, plot_communities, plot_degree_distribution, plot_power_structure,
    plot_robustness,
};
