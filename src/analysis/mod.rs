//! Home/away comparison of pitching splits.
//!
//! - `stats`: metric extraction, home/away pairing and the paired t-test
//! - `chart`: SVG bar chart of the per-metric differences

pub mod chart;
pub mod stats;

pub use chart::render_bar_chart;
pub use stats::{
    compare_metric, innings_pitched, metric_value, pair_home_away, paired_t_test,
    MetricComparison, PairedTest, DEFAULT_METRICS,
};
