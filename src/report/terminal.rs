//! Terminal output rendering for a coverage analysis.
//!
//! A compact, colored recap printed after the report is written.

use crate::aggregator::CoverageAnalysis;
use crate::classifier::Layer;
use colored::*;

/// Render a short colored summary for the terminal
pub fn render_terminal_summary(analysis: &CoverageAnalysis) -> String {
    let mut out = String::new();

    out.push_str(&render_header(analysis));
    out.push_str(&render_layers(analysis));
    out.push_str(&render_status(analysis));

    out
}

fn render_header(analysis: &CoverageAnalysis) -> String {
    let global = &analysis.totals.global.counters;
    let mut out = String::new();
    out.push_str("\n📊 ");
    out.push_str(&"Coverage Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!("Files:  {}\n", analysis.files_analyzed()));
    out.push_str(&format!(
        "Lines:  {:.1}% ({}/{})\n",
        global.line_coverage(),
        global.lines_hit,
        global.lines_found
    ));
    out.push_str("---------------------------------------------------\n");
    out
}

fn render_layers(analysis: &CoverageAnalysis) -> String {
    let mut out = String::new();
    for breakdown in &analysis.totals.layers {
        let coverage = breakdown.totals.line_coverage();
        let goal = target_for(analysis, breakdown.layer);
        let value = format!("{:>6.1}%", coverage);
        let value = if coverage >= goal {
            value.green()
        } else if breakdown.totals.counters.lines_hit == 0 {
            value.red()
        } else {
            value.yellow()
        };
        out.push_str(&format!(
            "  {:<14} {}  ({} files)\n",
            breakdown.layer.title(),
            value,
            breakdown.totals.file_count
        ));
    }
    out
}

fn target_for(analysis: &CoverageAnalysis, layer: Layer) -> f64 {
    analysis
        .targets
        .iter()
        .find(|t| t.layer == layer)
        .map(|t| t.target)
        .unwrap_or(analysis.threshold)
}

fn render_status(analysis: &CoverageAnalysis) -> String {
    let mut out = String::new();
    out.push_str("---------------------------------------------------\n");
    let status = if analysis.meets_threshold() {
        format!(
            "✅ STATUS: {:.1}% meets the {:.1}% threshold",
            analysis.line_coverage(),
            analysis.threshold
        )
        .green()
        .bold()
    } else {
        format!(
            "⚠️  STATUS: {:.1}% is below the {:.1}% threshold ({} files below, {} with zero coverage)",
            analysis.line_coverage(),
            analysis.threshold,
            analysis.below_threshold.len(),
            analysis.zero_coverage_count()
        )
        .yellow()
        .bold()
    };
    out.push_str(&status.to_string());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::analyze;
    use crate::parser::{CoverageCounters, FileRecord, ParseStats};
    use crate::utils::config::ReportConfig;

    #[test]
    fn test_terminal_summary_mentions_layers_and_status() {
        colored::control::set_override(false);

        let records = vec![
            FileRecord::new("lib/domain/a.dart", CoverageCounters::lines(10, 10)),
            FileRecord::new("lib/data/b.dart", CoverageCounters::lines(10, 0)),
        ];
        let analysis = analyze(&records, ParseStats::default(), &ReportConfig::default());
        let summary = render_terminal_summary(&analysis);

        assert!(summary.contains("Files:  2"));
        assert!(summary.contains("Lines:  50.0% (10/20)"));
        assert!(summary.contains("Domain"));
        assert!(summary.contains("Data"));
        assert!(summary.contains("STATUS: 50.0% is below the 90.0% threshold"));
    }
}
