// Report rendering

use indexmap::IndexMap;

/// Render the sentiment report.
///
/// Percentages guard the empty-feed case: a zero total reports `0.0%` instead
/// of dividing.
pub fn render_report(distribution: &IndexMap<String, u64>, total_count: u64) -> String {
  let mut report = String::new();
  report.push_str("Sentiment Analysis Report\n");
  report.push_str("=========================\n");
  report.push_str(&format!("Total posts: {total_count}\n\n"));
  report.push_str("Distribution:\n");

  for (label, count) in distribution {
    let percentage = if total_count > 0 {
      *count as f64 / total_count as f64 * 100.0
    } else {
      0.0
    };
    report.push_str(&format!("  {label}: {count} 条 ({percentage:.1}%)\n"));
  }

  if let Some(dominant) = dominant_sentiment(distribution) {
    report.push_str(&format!("\nDominant sentiment: {dominant}\n"));
  }

  report
}

/// Category with the highest count; ties keep the first one encountered.
pub fn dominant_sentiment(distribution: &IndexMap<String, u64>) -> Option<&str> {
  let mut best: Option<(&str, u64)> = None;
  for (label, count) in distribution {
    match best {
      Some((_, best_count)) if *count <= best_count => {}
      _ => best = Some((label.as_str(), *count)),
    }
  }
  best.map(|(label, _)| label)
}
