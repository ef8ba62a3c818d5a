use crate::state::SeriesResult;

/// Chart inputs derived from a series response.
///
/// `win_probability` is the backend's `home_win_pct` verbatim; the client
/// never re-derives it from the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub margin_samples: Vec<f64>,
    pub win_probability: f64,
    /// Set when the home/away sample arrays disagree in length. The margins
    /// are still computed best-effort (missing away samples count as zero);
    /// callers surface this as a data-quality warning, not a failure.
    pub length_mismatch: bool,
}

/// Returns `None` when the backend ran without sample retention
/// (`samples_detail` absent); the caller must show a "no chart data" note
/// instead of an empty chart.
pub fn summarize(result: &SeriesResult) -> Option<SeriesSummary> {
    let detail = result.samples_detail.as_ref()?;

    let margin_samples = detail
        .home
        .iter()
        .enumerate()
        .map(|(i, h)| h - detail.away.get(i).copied().unwrap_or(0.0))
        .collect();

    Some(SeriesSummary {
        margin_samples,
        win_probability: result.home_win_pct,
        length_mismatch: detail.home.len() != detail.away.len(),
    })
}

/// Gauge label percentage, rounded to the nearest integer.
pub fn win_pct_display(win_probability: f64) -> u32 {
    (win_probability * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Text lines for the series summary pane. Fields an older backend omits
/// render as `-` rather than a fabricated value.
pub fn summary_lines(result: &SeriesResult) -> Vec<String> {
    let mut lines = Vec::new();

    let runs = result
        .samples
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut head = String::new();
    if let (Some(home), Some(away)) = (&result.home, &result.away) {
        head.push_str(&format!("{home} vs {away}  "));
    }
    head.push_str(&format!("runs: {runs}"));
    if let Some(ot) = result.ot_rate {
        head.push_str(&format!("  OT {:.1}%", ot * 100.0));
    }
    lines.push(head);

    if let (Some(mh), Some(ma)) = (result.mean_score_home, result.mean_score_away) {
        lines.push(format!(
            "mean {mh:.1}-{ma:.1}  stdev {:.1}/{:.1}",
            result.stdev_score_home.unwrap_or(0.0),
            result.stdev_score_away.unwrap_or(0.0)
        ));
    }
    if let Some(q) = &result.quantiles {
        lines.push(format!(
            "home p05/p50/p95 {}/{}/{}  away {}/{}/{}",
            fmt_quantile(q.home.p05),
            fmt_quantile(q.home.p50),
            fmt_quantile(q.home.p95),
            fmt_quantile(q.away.p05),
            fmt_quantile(q.away.p50),
            fmt_quantile(q.away.p95)
        ));
    }
    lines
}

fn fmt_quantile(q: Option<f64>) -> String {
    q.map(|v| format!("{v:.0}"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SamplesDetail;

    fn series_with(home: Vec<f64>, away: Vec<f64>, win_pct: f64) -> SeriesResult {
        SeriesResult {
            home_win_pct: win_pct,
            samples_detail: Some(SamplesDetail { home, away }),
            ..SeriesResult::default()
        }
    }

    #[test]
    fn margins_are_home_minus_away_per_run() {
        let result = series_with(vec![10.0, 20.0, 30.0], vec![7.0, 25.0, 30.0], 0.5);
        let summary = summarize(&result).expect("samples present");
        assert_eq!(summary.margin_samples, vec![3.0, -5.0, 0.0]);
        assert!(!summary.length_mismatch);
    }

    #[test]
    fn win_probability_passes_through_verbatim() {
        let result = series_with(vec![1.0], vec![0.0], 0.623);
        let summary = summarize(&result).expect("samples present");
        assert!((summary.win_probability - 0.623).abs() < f64::EPSILON);
        assert_eq!(win_pct_display(summary.win_probability), 62);
    }

    #[test]
    fn missing_away_samples_are_zero_filled_and_flagged() {
        let result = series_with(vec![14.0, 21.0], vec![10.0], 0.5);
        let summary = summarize(&result).expect("samples present");
        assert_eq!(summary.margin_samples, vec![4.0, 21.0]);
        assert!(summary.length_mismatch);
    }

    #[test]
    fn mismatched_samples_still_bin_into_a_full_histogram() {
        let result = series_with(vec![14.0, 21.0, 35.0], vec![10.0], 0.5);
        let summary = summarize(&result).expect("samples present");
        assert!(summary.length_mismatch);

        // The flagged margins remain chartable; every one lands in a bin.
        let bins = crate::histogram::bin(&summary.margin_samples, 20);
        let total: u64 = bins.iter().map(|b| b.count).sum();
        assert_eq!(total as usize, summary.margin_samples.len());
    }

    #[test]
    fn summary_head_shows_names_runs_and_ot_rate() {
        let result = SeriesResult {
            samples: Some(500),
            home_win_pct: 0.6,
            ot_rate: Some(0.062),
            home: Some("Home U".to_string()),
            away: Some("Away Tech".to_string()),
            ..SeriesResult::default()
        };
        let lines = summary_lines(&result);
        assert_eq!(lines[0], "Home U vs Away Tech  runs: 500  OT 6.2%");
    }

    #[test]
    fn summary_head_dashes_out_a_missing_run_count() {
        let result = SeriesResult {
            home_win_pct: 0.5,
            ..SeriesResult::default()
        };
        let lines = summary_lines(&result);
        assert_eq!(lines[0], "runs: -");
    }

    #[test]
    fn absent_detail_yields_no_summary() {
        let result = SeriesResult {
            home_win_pct: 0.9,
            ..SeriesResult::default()
        };
        assert!(summarize(&result).is_none());
    }
}
