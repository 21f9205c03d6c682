// src/score.rs
// =============================================================================
// Turns the list of check results into a single 0-100 readiness score.
//
// Steps:
// 1. Percentage of the available weight that was earned
//    (pass = full weight, warn = half, fail/manual = nothing)
// 2. -15 for every failed critical check
// 3. -3 for every failed check beyond the fifth
// 4. Any critical failure caps the score at 65
// 5. Clamp to 0..=100 and pick an interpretation bracket
//
// The scorer is a pure function of its input: same checks, same report.
// =============================================================================

use serde::Serialize;

use crate::checks::{CheckResult, Status};

const CRITICAL_PENALTY: i64 = 15;
const FAILURE_ALLOWANCE: usize = 5;
const EXTRA_FAILURE_PENALTY: i64 = 3;
const CRITICAL_CAP: i64 = 65;

const READY_THRESHOLD: u8 = 80;
const ATTENTION_THRESHOLD: u8 = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub raw_score: f64,
    pub total_possible_weight: u32,
    pub final_score: u8,
    pub penalties: Vec<String>,
    pub interpretation: String,
    pub recommendations: Vec<String>,
}

/// Sum of the weights of all automated checks.
pub fn total_possible_weight(checks: &[CheckResult]) -> u32 {
    checks
        .iter()
        .filter(|check| check.status != Status::Manual)
        .map(|check| check.weight)
        .sum()
}

/// Weight actually earned by the checks.
pub fn raw_score(checks: &[CheckResult]) -> f64 {
    checks.iter().map(CheckResult::earned).sum()
}

/// Rounded percentage before any penalty or cap.
pub fn base_score(checks: &[CheckResult]) -> i64 {
    let total = total_possible_weight(checks);
    if total == 0 {
        return 0;
    }
    (100.0 * raw_score(checks) / f64::from(total)).round() as i64
}

pub fn score(checks: &[CheckResult]) -> ScoreReport {
    let total = total_possible_weight(checks);
    let raw = raw_score(checks);
    let mut value = base_score(checks);
    let mut penalties = Vec::new();

    let critical_failures: Vec<&str> = checks
        .iter()
        .filter(|check| check.critical && check.status == Status::Fail)
        .map(|check| check.name.as_str())
        .collect();
    let mut critical_note = None;
    if !critical_failures.is_empty() {
        let penalty = CRITICAL_PENALTY * critical_failures.len() as i64;
        value = (value - penalty).max(0);
        critical_note = Some(format!(
            "Critical failures ({}): -{} points",
            critical_failures.join(", "),
            penalty
        ));
    }

    let failures = checks
        .iter()
        .filter(|check| check.status == Status::Fail)
        .count();
    if failures > FAILURE_ALLOWANCE {
        let penalty = EXTRA_FAILURE_PENALTY * (failures - FAILURE_ALLOWANCE) as i64;
        value = (value - penalty).max(0);
        penalties.push(format!(
            "Too many failed checks ({}): -{} points",
            failures, penalty
        ));
    }

    // The cap is folded into the critical note
    if let Some(note) = critical_note {
        if value > CRITICAL_CAP {
            value = CRITICAL_CAP;
            penalties.insert(
                0,
                format!("{}; score capped at {} until they are fixed", note, CRITICAL_CAP),
            );
        } else {
            penalties.insert(0, note);
        }
    }

    let final_score = value.clamp(0, 100) as u8;
    let (interpretation, recommendations) = interpret(final_score);

    ScoreReport {
        raw_score: raw,
        total_possible_weight: total,
        final_score,
        penalties,
        interpretation: interpretation.to_string(),
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
    }
}

fn interpret(score: u8) -> (&'static str, &'static [&'static str]) {
    if score >= READY_THRESHOLD {
        (
            "Good technical foundation. Approval still depends on content quality and policy compliance, which need a manual review.",
            &[
                "Review the manual checks: original content, policy compliance and user experience.",
                "Keep publishing original, useful content on a regular schedule.",
                "Make sure the site has been live and indexed for a while before applying.",
                "Fix any remaining warnings to strengthen the application.",
            ],
        )
    } else if score >= ATTENTION_THRESHOLD {
        (
            "Needs attention. Several technical requirements are missing or incomplete.",
            &[
                "Fix every failed check, starting with the critical ones.",
                "Add or complete the privacy policy, about and contact pages.",
                "Grow the amount of original content on key pages.",
                "Re-run the analysis after making changes.",
            ],
        )
    } else {
        (
            "Significant issues. The site is unlikely to be approved in its current state.",
            &[
                "Serve the whole site over HTTPS and redirect HTTP traffic.",
                "Publish a privacy policy and link it from every page.",
                "Add substantially more original content before applying.",
                "Make sure robots.txt does not block ad crawlers.",
                "Re-run the analysis once the critical issues are fixed.",
            ],
        )
    }
}
