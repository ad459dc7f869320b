//! Paired home-vs-away statistics.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{storage::PitchingSplitRow, Result, ScrapeError};

/// Metrics compared when none are requested.
pub const DEFAULT_METRICS: &[&str] = &["ERA", "WHIP", "HR9", "SO9", "SO_W"];

/// Result of a two-sided paired t-test on `home - away`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairedTest {
    pub n: usize,
    pub mean_diff: f64,
    pub t: f64,
    pub p: f64,
}

/// One metric compared across every season with both a home and an away row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: String,
    pub mean_home: f64,
    pub mean_away: f64,
    pub test: PairedTest,
}

impl MetricComparison {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.test.p < alpha
    }
}

/// Innings in box-score notation: `.1` and `.2` are thirds of an inning.
pub fn innings_pitched(ip: &str) -> Option<f64> {
    let ip = ip.trim();
    let (whole, outs) = match ip.split_once('.') {
        Some((whole, outs)) => (whole, outs),
        None => (ip, "0"),
    };
    let whole: u32 = whole.parse().ok()?;
    let outs: u32 = match outs {
        "" | "0" => 0,
        "1" => 1,
        "2" => 2,
        _ => return None,
    };
    Some(whole as f64 + outs as f64 / 3.0)
}

fn parse_stat(text: &str) -> Option<f64> {
    text.trim().trim_end_matches('%').parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric value of `metric` for one split row.
///
/// `HR9` is derived from `HR` and `IP` when the table did not carry it.
pub fn metric_value(row: &PitchingSplitRow, metric: &str) -> Option<f64> {
    if let Some(value) = row.stat(metric).and_then(parse_stat) {
        return Some(value);
    }

    match metric {
        "HR9" => {
            let hr = row.stat("HR").and_then(parse_stat)?;
            let ip = row.stat("IP").and_then(innings_pitched)?;
            if ip > 0.0 {
                Some(9.0 * hr / ip)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Home and away rows of the same season, ordered by season.
pub fn pair_home_away(rows: &[PitchingSplitRow]) -> Vec<(u16, &PitchingSplitRow, &PitchingSplitRow)> {
    let find = |year: u16, split: &str| {
        rows.iter()
            .find(|r| r.year == year && r.split_type.eq_ignore_ascii_case(split))
    };

    let mut years: Vec<u16> = rows.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();

    years
        .into_iter()
        .filter_map(|year| Some((year, find(year, "Home")?, find(year, "Away")?)))
        .collect()
}

/// Two-sided paired t-test of `home[i] - away[i]`.
pub fn paired_t_test(metric: &str, home: &[f64], away: &[f64]) -> Result<PairedTest> {
    let n = home.len().min(away.len());
    if n < 2 {
        return Err(ScrapeError::InsufficientData {
            metric: metric.to_string(),
            count: n,
        });
    }

    let diffs: Vec<f64> = home.iter().zip(away).map(|(h, a)| h - a).collect();
    let mean = diffs.iter().sum::<f64>() / n as f64;
    let variance = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_err = (variance / n as f64).sqrt();

    if std_err == 0.0 {
        // Every season moved by exactly the same amount.
        let (t, p) = if mean == 0.0 {
            (0.0, 1.0)
        } else {
            (mean.signum() * f64::INFINITY, 0.0)
        };
        return Ok(PairedTest {
            n,
            mean_diff: mean,
            t,
            p,
        });
    }

    let t = mean / std_err;
    let dist = StudentsT::new(0.0, 1.0, (n - 1) as f64).map_err(|e| ScrapeError::Analysis {
        message: e.to_string(),
    })?;
    let p = (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0);

    Ok(PairedTest {
        n,
        mean_diff: mean,
        t,
        p,
    })
}

/// Compare one metric across all paired seasons. Seasons where either side
/// lacks the metric are left out.
pub fn compare_metric(
    pairs: &[(u16, &PitchingSplitRow, &PitchingSplitRow)],
    metric: &str,
) -> Result<MetricComparison> {
    let (home, away): (Vec<f64>, Vec<f64>) = pairs
        .iter()
        .filter_map(|(_, h, a)| Some((metric_value(h, metric)?, metric_value(a, metric)?)))
        .unzip();

    let test = paired_t_test(metric, &home, &away)?;
    let mean = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;

    Ok(MetricComparison {
        metric: metric.to_string(),
        mean_home: mean(&home),
        mean_away: mean(&away),
        test,
    })
}
