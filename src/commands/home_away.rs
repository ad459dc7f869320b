//! Home vs away comparison over the keyed pitching split table.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::{common::resolve_path, split_history};
use crate::{
    analysis::{compare_metric, pair_home_away, render_bar_chart, MetricComparison},
    storage::StatsDatabase,
    Result, ScrapeError, TeamCode,
};

pub const DEFAULT_CHART_NAME: &str = "home_away.svg";

/// Significance level used for the printed verdicts.
pub const ALPHA: f64 = 0.05;

/// Compare each metric across all seasons that have both a home and an
/// away row. Metrics without enough paired data are logged and skipped.
pub fn analyze_home_away(db: &StatsDatabase, metrics: &[String]) -> Result<Vec<MetricComparison>> {
    let rows = db.pitching_split_rows()?;
    let pairs = pair_home_away(&rows);

    let mut comparisons = Vec::new();
    for metric in metrics {
        match compare_metric(&pairs, metric) {
            Ok(comparison) => comparisons.push(comparison),
            Err(e) => warn!(metric = %metric, "Skipping metric: {}", e),
        }
    }

    if comparisons.is_empty() {
        return Err(ScrapeError::InsufficientData {
            metric: metrics.join(", "),
            count: pairs.len(),
        });
    }
    Ok(comparisons)
}

/// One line per metric, in the order compared.
pub fn format_comparison(team: &TeamCode, comparison: &MetricComparison) -> String {
    let verdict = if comparison.is_significant(ALPHA) {
        "is statistically significant"
    } else {
        "is not statistically significant"
    };
    format!(
        "{}: {} home field effect {} (home {:.3}, away {:.3}, diff {:+.3}, t={:.3}, p={:.3}, n={})",
        comparison.metric,
        team,
        verdict,
        comparison.mean_home,
        comparison.mean_away,
        comparison.test.mean_diff,
        comparison.test.t,
        comparison.test.p,
        comparison.test.n
    )
}

/// Handle `analyze home-away`
pub fn handle_home_away(
    team: &TeamCode,
    db_path: Option<PathBuf>,
    chart_path: Option<PathBuf>,
    metrics: Vec<String>,
    data_dir: &Path,
) -> Result<()> {
    let db_path = db_path.unwrap_or_else(|| split_history::default_db_path(data_dir, team));
    let chart_path = resolve_path(chart_path, data_dir, DEFAULT_CHART_NAME);

    let db = StatsDatabase::open(&db_path)?;
    let comparisons = analyze_home_away(&db, &metrics)?;

    for comparison in &comparisons {
        println!("{}", format_comparison(team, comparison));
    }

    let bars: Vec<(String, f64)> = comparisons
        .iter()
        .map(|c| (c.metric.clone(), c.test.mean_diff))
        .collect();
    let svg = render_bar_chart(&format!("{} Home Field Effect", team), "Home - Away", &bars);
    if let Some(parent) = chart_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&chart_path, svg)?;
    println!("✓ Chart written to {}", chart_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PairedTest;

    #[test]
    fn test_format_comparison() {
        let comparison = MetricComparison {
            metric: "ERA".to_string(),
            mean_home: 6.1,
            mean_away: 4.9,
            test: PairedTest {
                n: 5,
                mean_diff: 1.2,
                t: 4.5,
                p: 0.011,
            },
        };
        let line = format_comparison(&TeamCode::default(), &comparison);
        assert!(line.starts_with("ERA: COL home field effect is statistically significant"));
        assert!(line.contains("diff +1.200"));
        assert!(line.contains("p=0.011"));
    }

    #[test]
    fn test_analyze_home_away_empty_db() {
        let db = StatsDatabase::new_in_memory().unwrap();
        let result = analyze_home_away(&db, &["ERA".to_string()]);
        assert!(matches!(
            result,
            Err(ScrapeError::InsufficientData { count: 0, .. })
        ));
    }
}
