// Program validation, usage statistics and comparison.
//
// Works on the wire-level `RawProgram` so any file can be checked: engine
// output, hand-edited programs or ground-truth annotations. Findings come in
// two severities:
// - `Violation`: the program breaks the fixture contract (unknown key,
//   missing effect field, value out of range, illegal field for the group
//   type, duplicate key on one beat).
// - `Advisory`: legal but not how a program should look (non-increasing
//   beat time, discouraged motion, VFX entry present but off, all-zero
//   light entry, moving beam with no color or intensity).
//
// `UsageStats` counts per-key and per-value usage over the entries with no
// violations, in `BTreeMap`s so printed output is stable.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::catalog::{GroupLightKey, GroupType};
use crate::effect::{MotionEffect, RawEffectTuple};
use crate::legalizer;
use crate::program::{RawGroupLight, RawProgram};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Violation,
    Advisory,
}

/// One problem found in a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub beat: usize,
    /// The group the finding is about, if any.
    pub key: Option<i64>,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            Some(key) => write!(f, "beat {}, key {}: {}", self.beat, key, self.message),
            None => write!(f, "beat {}: {}", self.beat, self.message),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageStats {
    pub total_beats: usize,
    pub beats_with_effects: usize,
    pub beats_empty: usize,
    pub key_usage: BTreeMap<i64, usize>,
    pub motion_usage: BTreeMap<i64, usize>,
    pub color_usage: BTreeMap<i64, usize>,
    pub intensity_usage: BTreeMap<i64, usize>,
    pub vfx_usage: BTreeMap<i64, usize>,
}

impl UsageStats {
    /// Percentage of beats with at least one group light. 0 for an empty
    /// program.
    pub fn coverage(&self) -> f64 {
        if self.total_beats == 0 {
            0.0
        } else {
            self.beats_with_effects as f64 / self.total_beats as f64 * 100.0
        }
    }

    fn count(&mut self, light: &RawGroupLight) {
        let effects = light.effects();
        *self.key_usage.entry(light.group_light_key).or_default() += 1;
        *self.motion_usage.entry(effects.motion).or_default() += 1;
        *self.color_usage.entry(effects.color).or_default() += 1;
        *self.intensity_usage.entry(effects.intensity).or_default() += 1;
        *self.vfx_usage.entry(effects.vfx).or_default() += 1;
    }
}

fn fmt_usage(map: &BTreeMap<i64, usize>) -> String {
    let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    format!("{{{}}}", parts.join(", "))
}

impl fmt::Display for UsageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Total beats:        {}", self.total_beats)?;
        writeln!(
            f,
            "  With effects:       {} ({:.1}%)",
            self.beats_with_effects,
            self.coverage()
        )?;
        writeln!(f, "  Empty:              {}", self.beats_empty)?;
        writeln!(f, "  GroupKey usage:     {}", fmt_usage(&self.key_usage))?;
        writeln!(f, "  Motion usage:       {}", fmt_usage(&self.motion_usage))?;
        writeln!(f, "  Color usage:        {}", fmt_usage(&self.color_usage))?;
        writeln!(f, "  Intensity usage:    {}", fmt_usage(&self.intensity_usage))?;
        write!(f, "  VFX usage:          {}", fmt_usage(&self.vfx_usage))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgramReport {
    pub findings: Vec<Finding>,
    pub stats: UsageStats,
}

impl ProgramReport {
    pub fn violations(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Violation)
    }

    pub fn advisories(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Advisory)
    }

    /// True when no hard violation was found. Advisories do not count.
    pub fn is_valid(&self) -> bool {
        self.violations().next().is_none()
    }
}

/// Check one group light. Returns true when it has no violations.
fn check_light(beat: usize, light: &RawGroupLight, findings: &mut Vec<Finding>) -> bool {
    let key = light.group_light_key;
    let effects: RawEffectTuple = light.effects();
    let mut push = |severity, message: String| {
        findings.push(Finding {
            beat,
            key: Some(key),
            severity,
            message,
        })
    };

    let group = match GroupLightKey::new(key) {
        Ok(k) => k.group_type(),
        Err(e) => {
            push(Severity::Violation, e.to_string());
            return false;
        }
    };

    let missing = light.missing_fields();
    for field in &missing {
        push(Severity::Violation, format!("{field} missing"));
    }
    if !missing.is_empty() {
        return false;
    }

    let violations = legalizer::violations(group, &effects);
    for v in &violations {
        push(Severity::Violation, v.to_string());
    }

    match group {
        GroupType::Vfx => {
            if effects.vfx == 0 {
                push(
                    Severity::Advisory,
                    "VFX group present with VfxEffect=0; omit inactive groups".to_string(),
                );
            }
        }
        GroupType::SingleLight | GroupType::MultiLight => {
            if let Some(motion) = MotionEffect::from_wire(effects.motion) {
                if !group.preferred_motions().contains(&motion) {
                    push(
                        Severity::Advisory,
                        format!("MotionEffect={} ({motion}) is not typical for {group}", effects.motion),
                    );
                }
            }
            if effects == RawEffectTuple::default() {
                push(
                    Severity::Advisory,
                    "light group present with every field 0; omit inactive groups".to_string(),
                );
            } else if effects.motion != 0 && (effects.color == 0 || effects.intensity == 0) {
                push(
                    Severity::Advisory,
                    "moving beam without both a color and an intensity effect".to_string(),
                );
            }
        }
    }

    violations.is_empty()
}

/// Check every beat of a program and gather usage statistics.
pub fn validate_program(program: &RawProgram) -> ProgramReport {
    let mut report = ProgramReport::default();
    let mut previous_time: Option<f64> = None;

    for (i, beat) in program.beats.iter().enumerate() {
        report.stats.total_beats += 1;
        if beat.group_lights.is_empty() {
            report.stats.beats_empty += 1;
        } else {
            report.stats.beats_with_effects += 1;
        }

        if let Some(prev) = previous_time {
            if beat.time.partial_cmp(&prev) != Some(Ordering::Greater) {
                report.findings.push(Finding {
                    beat: i,
                    key: None,
                    severity: Severity::Advisory,
                    message: format!("time {} does not increase past {prev}", beat.time),
                });
            }
        }
        previous_time = Some(beat.time);

        let mut seen = BTreeSet::new();
        for light in &beat.group_lights {
            let mut ok = check_light(i, light, &mut report.findings);
            if !seen.insert(light.group_light_key) {
                report.findings.push(Finding {
                    beat: i,
                    key: Some(light.group_light_key),
                    severity: Severity::Violation,
                    message: "group listed more than once on this beat".to_string(),
                });
                ok = false;
            }
            if ok {
                report.stats.count(light);
            }
        }
    }
    report
}

/// A predicted program checked side by side with a reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub predicted: ProgramReport,
    pub groundtruth: ProgramReport,
}

impl Comparison {
    /// Predicted coverage minus ground-truth coverage, in percentage points.
    pub fn coverage_delta(&self) -> f64 {
        self.predicted.stats.coverage() - self.groundtruth.stats.coverage()
    }

    /// Beats present in one program but not the other.
    pub fn beat_count_mismatch(&self) -> bool {
        self.predicted.stats.total_beats != self.groundtruth.stats.total_beats
    }
}

pub fn compare(predicted: &RawProgram, groundtruth: &RawProgram) -> Comparison {
    Comparison {
        predicted: validate_program(predicted),
        groundtruth: validate_program(groundtruth),
    }
}
