//! Human-readable and JSON rendering of epoch summaries.

use crate::error::Result;
use crate::eval::EpochSummary;

pub fn format_f64_6(v: f64) -> String {
    format!("{v:.6}")
}

/// Plain-text epoch report.
pub fn render_text(summary: &EpochSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Total Epoch Testing Loss = {}\n",
        format_f64_6(summary.total_loss)
    ));
    out.push_str(&format!(
        "Batches: {}  Samples: {}\n",
        summary.batches, summary.samples
    ));

    let width = summary
        .targets
        .iter()
        .map(|t| t.name.len())
        .max()
        .unwrap_or(0)
        .max("target".len());

    out.push_str(&format!(
        "{:<width$}  {:>12}  {:>10}  {:>12}\n",
        "target", "loss", "accuracy", "MAPE (%)"
    ));
    for t in &summary.targets {
        out.push_str(&format!(
            "{:<width$}  {:>12}  {:>10}  {:>12}\n",
            t.name,
            format_f64_6(t.loss),
            format_f64_6(t.accuracy),
            format_f64_6(t.mape)
        ));
    }

    out
}

/// Pretty JSON with the same numbers as [`render_text`].
pub fn to_json(summary: &EpochSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}
