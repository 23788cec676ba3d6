// Console rendering of validation and comparison results.

use std::fmt::Write as _;

use beatlight_engine::validate::{Comparison, ProgramReport};

const RULE: &str = "==================================================";

/// Stats block under a banner.
pub fn render_stats(label: &str, report: &ProgramReport) -> String {
    format!("\n{RULE}\n  {label}\n{RULE}\n{}\n", report.stats)
}

/// Violation list, truncated after `limit` entries (`None` prints all).
/// Advisories are listed in full with `show_advisories`, otherwise counted.
pub fn render_findings(report: &ProgramReport, limit: Option<usize>, show_advisories: bool) -> String {
    let mut out = String::new();
    let violations: Vec<_> = report.violations().collect();
    if violations.is_empty() {
        out.push_str("\nAll constraints satisfied.\n");
    } else {
        let _ = writeln!(out, "\n{} constraint violations:", violations.len());
        let shown = limit.unwrap_or(violations.len()).min(violations.len());
        for finding in &violations[..shown] {
            let _ = writeln!(out, "  - {finding}");
        }
        if shown < violations.len() {
            let _ = writeln!(out, "  ... and {} more", violations.len() - shown);
        }
    }
    let advisories = report.advisories().count();
    if advisories > 0 && show_advisories {
        let _ = writeln!(out, "{advisories} advisories:");
        for finding in report.advisories() {
            let _ = writeln!(out, "  - {finding}");
        }
    } else if advisories > 0 {
        let _ = writeln!(out, "{advisories} advisories (rerun with -v to list them)");
    }
    out
}

pub fn render_comparison(cmp: &Comparison, show_advisories: bool) -> String {
    let mut out = render_stats("PREDICTED", &cmp.predicted);
    out.push_str(&render_stats("GROUNDTRUTH", &cmp.groundtruth));
    out.push_str(&render_findings(&cmp.predicted, Some(10), show_advisories));
    if cmp.beat_count_mismatch() {
        let _ = writeln!(
            out,
            "\nBeat count differs: predicted={} groundtruth={}",
            cmp.predicted.stats.total_beats, cmp.groundtruth.stats.total_beats
        );
    }
    let _ = writeln!(
        out,
        "\n  Effect coverage: predicted={:.1}% vs groundtruth={:.1}% ({:+.1} points)",
        cmp.predicted.stats.coverage(),
        cmp.groundtruth.stats.coverage(),
        cmp.coverage_delta()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatlight_engine::program::{RawBeatEntry, RawGroupLight, RawProgram};
    use beatlight_engine::validate::{compare, validate_program};
    use beatlight_engine::RawEffectTuple;

    fn program(lights: Vec<Vec<RawGroupLight>>) -> RawProgram {
        RawProgram {
            beats: lights
                .into_iter()
                .enumerate()
                .map(|(i, group_lights)| RawBeatEntry {
                    time: i as f64,
                    duration: 1.0,
                    group_lights,
                })
                .collect(),
        }
    }

    #[test]
    fn findings_are_truncated() {
        let bad: Vec<RawGroupLight> = (0..4)
            .map(|_| RawGroupLight::new(0, RawEffectTuple::new(3, 0, 0, 1)))
            .collect();
        let p = program(vec![bad.clone(), bad.clone(), bad]);
        let text = render_findings(&validate_program(&p), Some(2), false);
        assert!(text.contains("constraint violations:"));
        assert!(text.contains("... and"));
    }

    #[test]
    fn clean_report_says_so() {
        let p = program(vec![vec![RawGroupLight::new(2, RawEffectTuple::new(3, 1, 1, 0))]]);
        let text = render_findings(&validate_program(&p), None, false);
        assert!(text.contains("All constraints satisfied."));
    }

    #[test]
    fn advisories_listed_on_request() {
        let p = program(vec![vec![RawGroupLight::new(2, RawEffectTuple::new(1, 1, 1, 0))]]);
        let report = validate_program(&p);
        assert!(render_findings(&report, None, false).contains("1 advisories (rerun"));
        assert!(render_findings(&report, None, true).contains("beat 0, key 2: MotionEffect=1"));
    }

    #[test]
    fn comparison_shows_both_coverages() {
        let a = program(vec![vec![], vec![]]);
        let b = program(vec![vec![RawGroupLight::new(4, RawEffectTuple::new(1, 1, 1, 0))], vec![]]);
        let text = render_comparison(&compare(&a, &b), false);
        assert!(text.contains("predicted=0.0% vs groundtruth=50.0% (-50.0 points)"));
        assert!(text.contains("PREDICTED"));
        assert!(text.contains("GROUNDTRUTH"));
    }
}
