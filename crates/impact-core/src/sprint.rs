//! Sprint resolution: pick the canonical sprint window for an item and
//! apply the team-ownership filter.

use crate::types::SprintCandidate;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const UNKNOWN_SPRINT: &str = "Unknown Sprint";

fn iteration_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Iteration (\d{2}\.\d{2}\.\d{2})").expect("valid regex"))
}

/// Parse the start date embedded in a sprint name of the form
/// `"Iteration MM.DD.YY"`. Returns `None` for any other shape.
pub fn parse_sprint_date(name: &str) -> Option<NaiveDate> {
    let caps = iteration_pattern().captures(name)?;
    NaiveDate::parse_from_str(&caps[1], "%m.%d.%y").ok()
}

// ---------------------------------------------------------------------------
// ResolvedSprint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ResolvedSprint {
    pub name: String,
    /// `None` when the winning candidate's name carries no parsable date.
    pub start: Option<NaiveDate>,
    pub goal: String,
}

/// Select the canonical sprint: the candidate with the latest parsed
/// start date. Ties go to the last candidate in input order, and
/// unparsable names rank as the minimum date — they win only when no
/// dated candidate exists. Returns `None` for an empty candidate list.
pub fn resolve(candidates: &[SprintCandidate]) -> Option<ResolvedSprint> {
    let mut best: Option<&SprintCandidate> = None;
    let mut best_date = NaiveDate::MIN;

    for candidate in candidates {
        let date = parse_sprint_date(&candidate.name).unwrap_or(NaiveDate::MIN);
        if date >= best_date {
            best_date = date;
            best = Some(candidate);
        }
    }

    best.map(|candidate| ResolvedSprint {
        name: candidate.name.clone(),
        start: (best_date != NaiveDate::MIN).then_some(best_date),
        goal: candidate.goal.clone().unwrap_or_default(),
    })
}

/// Team-ownership filter: an item whose resolved sprint goal does not
/// mention the team is excluded. Items with no sprint at all pass.
pub fn team_owns(resolved: Option<&ResolvedSprint>, team_filter: &str) -> bool {
    match resolved {
        Some(sprint) => sprint.goal.contains(team_filter),
        None => true,
    }
}
