//! Terminal rendering of `prices` batches.
//!
//! Each batch becomes a timestamped block with one row per symbol: price, signed change
//! with a direction arrow, and a sparkline of the rolling history.
use chrono::{DateTime, Local};
use quote_common::QuoteResult;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Draw the last `width` points of `history` as a block sparkline.
pub fn sparkline(history: &[f64], width: usize) -> String {
    let start = history.len().saturating_sub(width);
    let points = &history[start..];
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
    let span = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    points
        .iter()
        .map(|p| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                SPARK_LEVELS[(((p - min) / span) * top).round() as usize]
            }
        })
        .collect()
}

/// One table row.
pub fn format_row(quote: &QuoteResult, spark_width: usize) -> String {
    let arrow = if quote.change > 0.0 {
        '▲'
    } else if quote.change < 0.0 {
        '▼'
    } else {
        '•'
    };
    format!(
        "{:<8} {:>10.2} {} {:>+8.2}  {}",
        quote.symbol,
        quote.price,
        arrow,
        quote.change,
        sparkline(&quote.history, spark_width)
    )
}

/// A whole batch, headed by its receive time.
pub fn render_batch(batch: &[QuoteResult], at: DateTime<Local>, spark_width: usize) -> String {
    let mut out = format!("── {} ──", at.format("%H:%M:%S"));
    for quote in batch {
        out.push('\n');
        out.push_str(&format_row(quote, spark_width));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quote(change: f64, history: Vec<f64>) -> QuoteResult {
        QuoteResult {
            symbol: "AAPL".to_string(),
            price: *history.last().unwrap_or(&100.0),
            change,
            history,
        }
    }

    #[test]
    fn sparkline_spans_lowest_to_highest() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], 8), "▁▂▃▄▅▆▇█");
        assert_eq!(sparkline(&[10.0, 5.0, 10.0], 8), "█▁█");
    }

    #[test]
    fn sparkline_keeps_most_recent_points() {
        assert_eq!(sparkline(&[100.0, 1.0, 2.0], 2), "▁█");
    }

    #[test]
    fn flat_or_empty_history() {
        assert_eq!(sparkline(&[3.0, 3.0], 10), "▅▅");
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn row_shows_direction_and_signed_change() {
        let up = format_row(&quote(0.2, vec![100.0, 100.2]), 10);
        assert!(up.starts_with("AAPL"));
        assert!(up.contains("100.20 ▲"));
        assert!(up.contains("+0.20"));

        let down = format_row(&quote(-1.5, vec![101.5, 100.0]), 10);
        assert!(down.contains('▼'));
        assert!(down.contains("-1.50"));
    }

    #[test]
    fn batch_has_header_and_one_row_per_quote() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        let text = render_batch(&[quote(0.0, vec![1.0]), quote(0.0, vec![2.0])], at, 5);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "── 09:30:05 ──");
    }
}
