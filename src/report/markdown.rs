//! Markdown rendering of a coverage analysis.
//!
//! Sections always appear in the same order:
//! 1. Header and overall summary
//! 2. Coverage by layer (with feature rows)
//! 3. Critical domain deep dive (domain layer only)
//! 4. Lowest-coverage tables for priority layers
//! 5. Recommendations
//! 6. Zero-coverage files by layer
//! 7. Excluded-pattern footnote
//!
//! Capped lists end with an explicit "...and N more" line.

use crate::aggregator::{
    AggregateGroup, CoverageAnalysis, CriticalDomainSummary, LayerFiles, LayerTarget, Priority,
};
use crate::classifier::Layer;
use crate::parser::FileRecord;
use crate::utils::config::DisplayLimits;

/// Render the full markdown report
///
/// **Public** - main entry point for report generation
///
/// `limits` caps the below-threshold and zero-coverage lists. Output
/// depends only on `analysis` and `limits`, so the same input always
/// renders byte-identical text.
pub fn render_report(analysis: &CoverageAnalysis, limits: &DisplayLimits) -> String {
    let mut out = String::new();

    out.push_str(&render_header(analysis));
    out.push_str(&render_layer_table(analysis));
    if let Some(critical) = &analysis.critical_domain {
        out.push_str(&render_critical_domain(critical));
    }
    out.push_str(&render_lowest_tables(analysis));
    out.push_str(&render_recommendations(analysis, limits.below_threshold));
    out.push_str(&render_zero_coverage(analysis, limits.zero_coverage));
    out.push_str(&render_footer(analysis));

    out
}

fn render_header(analysis: &CoverageAnalysis) -> String {
    let global = &analysis.totals.global.counters;
    let mut out = String::new();

    out.push_str("# Test Coverage Analysis by Architectural Layer\n\n");
    out.push_str(&format!("**Analysis Date**: {}\n", analysis.generated_at));
    if !analysis.source.is_empty() {
        out.push_str(&format!("**Tracefile**: {}\n", code_span(&analysis.source)));
    }
    out.push_str(&format!(
        "**Total Files Analyzed**: {}\n",
        analysis.files_analyzed()
    ));
    out.push_str(&format!(
        "**Overall Line Coverage**: {:.1}% ({}/{})\n",
        global.line_coverage(),
        global.lines_hit,
        global.lines_found
    ));
    out.push_str(&format!(
        "**Function Coverage**: {:.1}% ({}/{})\n",
        global.function_coverage(),
        global.functions_hit,
        global.functions_found
    ));
    out.push_str(&format!(
        "**Branch Coverage**: {:.1}% ({}/{})\n",
        global.branch_coverage(),
        global.branches_hit,
        global.branches_found
    ));

    let stats = &analysis.parse_stats;
    if stats.excluded + stats.duplicates_merged + stats.malformed_lines + stats.dropped_records > 0
    {
        out.push_str(&format!(
            "**Trace Notes**: {} records, {} excluded, {} duplicates merged, {} malformed lines, {} unterminated records dropped\n",
            stats.records,
            stats.excluded,
            stats.duplicates_merged,
            stats.malformed_lines,
            stats.dropped_records
        ));
    }
    if !analysis.incoherent.is_empty() {
        out.push_str(&format!(
            "**Warning**: {} files report more hits than instrumented items\n",
            analysis.incoherent.len()
        ));
    }

    out.push('\n');
    out
}

fn render_layer_table(analysis: &CoverageAnalysis) -> String {
    let mut out = String::new();

    out.push_str("## 📊 Coverage Summary by Layer\n\n");
    out.push_str("| Layer | Files | Line Coverage | Function Coverage | Branch Coverage |\n");
    out.push_str("|-------|-------|---------------|-------------------|-----------------|\n");

    for breakdown in &analysis.totals.layers {
        out.push_str(&group_row(breakdown.layer.title(), &breakdown.totals));
        for feature in &breakdown.features {
            out.push_str(&group_row(
                &format!("└── {}", feature.feature),
                &feature.totals,
            ));
        }
    }
    out.push_str(&group_row("**Total**", &analysis.totals.global));

    out.push('\n');
    out
}

fn group_row(label: &str, group: &AggregateGroup) -> String {
    let c = &group.counters;
    format!(
        "| {} | {} | {:.1}% ({}/{}) | {:.1}% ({}/{}) | {:.1}% ({}/{}) |\n",
        label,
        group.file_count,
        c.line_coverage(),
        c.lines_hit,
        c.lines_found,
        c.function_coverage(),
        c.functions_hit,
        c.functions_found,
        c.branch_coverage(),
        c.branches_hit,
        c.branches_found
    )
}

fn render_critical_domain(critical: &CriticalDomainSummary) -> String {
    let mut out = String::new();

    out.push_str("## 🎯 Critical Priority: Domain Layer Analysis\n\n");
    out.push_str(&format!(
        "- **Total Domain Files**: {}\n",
        critical.total_domain_files
    ));
    out.push_str(&format!(
        "- **Critical Business Logic Files**: {}\n",
        critical.critical_files
    ));
    out.push_str(&format!(
        "- **Critical Files <{:.0}% Coverage**: {}\n\n",
        critical.target,
        critical.below_target.len()
    ));

    if !critical.below_target.is_empty() {
        out.push_str("### 🚨 Critical Domain Files Needing Coverage\n\n");
        out.push_str("| File | Line Coverage | Lines Missing | Priority |\n");
        out.push_str("|------|---------------|---------------|----------|\n");
        for file in &critical.below_target {
            let priority = match file.priority {
                Priority::Critical => "🔴 CRITICAL",
                Priority::High => "🟡 HIGH",
            };
            out.push_str(&format!(
                "| {} | {:.1}% | {} | {} |\n",
                table_code(&file.record.path),
                file.record.line_coverage(),
                file.record.counters.lines_missing(),
                priority
            ));
        }
        out.push('\n');
    }

    out
}

/// Lists were already cut to `analysis.lowest_limit` when analyzed
fn render_lowest_tables(analysis: &CoverageAnalysis) -> String {
    let mut out = String::new();

    for LayerFiles { layer, files } in &analysis.lowest_by_layer {
        out.push_str(&format!(
            "## 📉 Top {} Lowest Coverage: {} Layer\n\n",
            analysis.lowest_limit,
            layer.title()
        ));

        if files.is_empty() {
            out.push_str("_No files with instrumented lines._\n\n");
            continue;
        }

        out.push_str("| Rank | File | Line Coverage | Function Coverage | Lines Missing |\n");
        out.push_str("|------|------|---------------|-------------------|---------------|\n");
        for (rank, file) in files.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {:.1}% | {:.1}% | {} |\n",
                rank + 1,
                table_code(&file.path),
                file.line_coverage(),
                file.counters.function_coverage(),
                file.counters.lines_missing()
            ));
        }
        out.push('\n');
    }

    out
}

fn render_recommendations(analysis: &CoverageAnalysis, limit: usize) -> String {
    let mut out = String::new();

    out.push_str("## 🎯 Actionable Recommendations\n\n");

    if analysis.meets_threshold() {
        out.push_str(&format!(
            "✅ Overall coverage {:.1}% meets the {:.1}% target\n\n",
            analysis.line_coverage(),
            analysis.threshold
        ));
    } else {
        out.push_str(&format!(
            "❌ Overall coverage {:.1}% is below the {:.1}% target\n",
            analysis.line_coverage(),
            analysis.threshold
        ));
        out.push_str("   → Focus on increasing test coverage for low-coverage files\n\n");
    }

    let missed: Vec<&LayerTarget> = analysis.targets.iter().filter(|t| !t.is_met()).collect();
    if !missed.is_empty() {
        out.push_str("### Immediate Actions\n\n");
        for target in missed {
            let goal = if target.configured { "target" } else { "threshold" };
            out.push_str(&format!(
                "- 🚨 **{} Layer ({:.1}%)**: below the {:.1}% {}\n",
                target.layer.title(),
                target.current,
                target.target,
                goal
            ));
            for advice in layer_advice(target.layer) {
                out.push_str(&format!("  - {}\n", advice));
            }
        }
        out.push('\n');
    }

    let configured: Vec<&LayerTarget> =
        analysis.targets.iter().filter(|t| t.configured).collect();
    if !configured.is_empty() {
        out.push_str("### Coverage Targets by Layer\n\n");
        out.push_str("| Layer | Current | Target | Action Required |\n");
        out.push_str("|-------|---------|--------|-----------------|\n");
        for target in configured {
            let action = if target.is_met() {
                "✅ Maintain".to_string()
            } else {
                format!("📈 Improve by {:.1}%", target.gap())
            };
            out.push_str(&format!(
                "| {} | {:.1}% | {:.1}% | {} |\n",
                target.layer.title(),
                target.current,
                target.target,
                action
            ));
        }
        out.push('\n');
    }

    out.push_str(&render_below_threshold(
        &analysis.below_threshold,
        analysis.threshold,
        limit,
    ));

    out
}

fn render_below_threshold(files: &[FileRecord], threshold: f64, limit: usize) -> String {
    let mut out = String::new();

    if files.is_empty() {
        out.push_str(&format!(
            "✅ All files have {:.1}%+ coverage!\n\n",
            threshold
        ));
        return out;
    }

    out.push_str(&format!(
        "### ⚠️ Files Below {:.1}% Coverage ({} files)\n\n",
        threshold,
        files.len()
    ));
    for file in files.iter().take(limit) {
        out.push_str(&format!(
            "- {}: {:.1}% ({} lines missing)\n",
            code_span(&file.path),
            file.line_coverage(),
            file.counters.lines_missing()
        ));
    }
    push_overflow(&mut out, files.len(), limit);
    out.push('\n');

    out
}

/// Layer-specific next steps for a layer below target
fn layer_advice(layer: Layer) -> Vec<String> {
    match layer {
        Layer::Domain => vec![
            "Focus on use cases, entities, and repository interfaces".to_string(),
        ],
        Layer::Data => vec![
            "Focus on repository implementations and data sources".to_string(),
            "Test error handling and edge cases".to_string(),
        ],
        Layer::Presentation => vec![
            "Add widget tests and state management tests".to_string(),
            "Test user interaction flows".to_string(),
        ],
        other => vec![format!("Add tests for {} components", other)],
    }
}

fn render_zero_coverage(analysis: &CoverageAnalysis, limit: usize) -> String {
    let mut out = String::new();
    let total = analysis.zero_coverage_count();

    out.push_str("## 🔍 Detailed Coverage Gaps\n\n");

    if total == 0 {
        out.push_str("✅ No files with zero coverage.\n\n");
        return out;
    }

    out.push_str(&format!("### Files with Zero Coverage ({} files)\n", total));

    let mut shown = 0;
    for LayerFiles { layer, files } in &analysis.zero_coverage {
        if shown >= limit {
            break;
        }
        out.push_str(&format!("\n**{} Layer:**\n", layer.title()));
        for file in files.iter().take(limit - shown) {
            out.push_str(&format!(
                "- {} ({} lines)\n",
                code_span(&file.path),
                file.counters.lines_found
            ));
            shown += 1;
        }
    }
    push_overflow(&mut out, total, limit);
    out.push('\n');

    out
}

fn render_footer(analysis: &CoverageAnalysis) -> String {
    let mut out = String::new();

    out.push_str("---\n\n");
    if analysis.excluded_patterns.is_empty() {
        out.push_str("🔍 No exclusion patterns applied.\n");
    } else {
        out.push_str("🔍 Analysis completed excluding:\n");
        for label in &analysis.excluded_patterns {
            out.push_str(&format!("- {}\n", label));
        }
    }
    out.push_str("\n*Analysis generated from LCOV coverage data*\n");

    out
}

/// Inline code; paths containing backticks get a double-backtick fence
fn code_span(text: &str) -> String {
    if text.contains('`') {
        format!("`` {} ``", text)
    } else {
        format!("`{}`", text)
    }
}

/// Inline code safe inside a table cell
fn table_code(text: &str) -> String {
    code_span(&text.replace('|', "\\|"))
}

fn push_overflow(out: &mut String, total: usize, shown: usize) {
    if total > shown {
        out.push_str(&format!("\n...and {} more\n", total - shown));
    }
}
