//! Sprint scoring: sub-scores against team-relative medians, weighted
//! composites, and the final impact index.
//!
//! All scoring is pure. Given the same aggregates, flow table, and
//! config it produces bit-identical scorecards.

use crate::aggregate::SprintAggregate;
use crate::config::ScoringConfig;
use crate::flow::FlowTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SprintScorecard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintScorecard {
    pub sprint_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_start: Option<NaiveDate>,
    pub completed_tickets: u32,
    pub total_story_points: f64,
    pub avg_cycle_per_ticket: f64,
    pub avg_dev_per_ticket: f64,
    pub avg_review_per_ticket: f64,
    pub avg_acceptance_per_ticket: f64,
    pub avg_cycle_per_point: f64,
    pub defects_created: u32,
    pub defect_score: f64,
    pub rejection_ratio_pct: f64,
    pub rejection_score: f64,
    pub flow_survey_score: f64,
    pub flow_imputed: bool,
    pub throughput_score: f64,
    pub efficiency_score: f64,
    pub velocity_score: f64,
    pub quality_score: f64,
    pub flow_score: f64,
    pub impact_index: f64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Sub-score curves
// ---------------------------------------------------------------------------

/// Median of the positive values in `values`; 0 when none are positive.
fn positive_median(values: impl Iterator<Item = f64>) -> f64 {
    let mut positive: Vec<f64> = values.filter(|v| *v > 0.0).collect();
    if positive.is_empty() {
        return 0.0;
    }
    positive.sort_by(|a, b| a.total_cmp(b));
    let mid = positive.len() / 2;
    if positive.len() % 2 == 1 {
        positive[mid]
    } else {
        (positive[mid - 1] + positive[mid]) / 2.0
    }
}

/// Median-relative curve for "more is better" inputs.
fn throughput_curve(actual: f64, median: f64, scoring: &ScoringConfig) -> f64 {
    if actual <= 0.0 || median <= 0.0 {
        return 0.0;
    }
    if actual >= median {
        let score = scoring.median_baseline + (actual / median - 1.0) * scoring.excellence;
        score.min(scoring.excellence)
    } else {
        scoring.median_baseline * (actual / median)
    }
}

/// Median-relative curve for "less is better" inputs (cycle time).
fn efficiency_curve(actual: f64, median: f64, scoring: &ScoringConfig) -> f64 {
    if actual <= 0.0 || median <= 0.0 {
        return 0.0;
    }
    if actual <= median {
        let score = scoring.median_baseline + (1.0 - actual / median) * scoring.excellence;
        score.min(scoring.excellence)
    } else {
        scoring.median_baseline * (median / actual)
    }
}

fn defect_score(defects: u32, scoring: &ScoringConfig) -> f64 {
    let penalized = f64::from(defects.min(scoring.defect_cap)) * scoring.defect_penalty;
    (scoring.excellence - penalized).max(0.0)
}

fn rejection_score(rejection_ratio_pct: f64, scoring: &ScoringConfig) -> f64 {
    (scoring.excellence - rejection_ratio_pct).max(0.0)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score aggregated sprint rows. Row order is preserved (the
/// aggregator emits rows descending by sprint start date).
pub fn score(
    aggregates: &[SprintAggregate],
    flow: &FlowTable,
    scoring: &ScoringConfig,
) -> Vec<SprintScorecard> {
    let median_tickets = positive_median(aggregates.iter().map(|a| f64::from(a.completed_tickets)));
    let median_cycle = positive_median(aggregates.iter().map(|a| a.avg_cycle_per_ticket));

    // Imputation baseline: mean over sprints that have survey data, or
    // the configured default when none do.
    let surveyed: Vec<f64> = aggregates
        .iter()
        .filter_map(|a| flow.get(&a.sprint_name))
        .collect();
    let imputed_flow = if surveyed.is_empty() {
        scoring.default_flow_score
    } else {
        surveyed.iter().sum::<f64>() / surveyed.len() as f64
    };

    aggregates
        .iter()
        .map(|agg| {
            let (flow_survey_score, flow_imputed) = match flow.get(&agg.sprint_name) {
                Some(raw) => (raw, false),
                None => (imputed_flow, true),
            };

            let defect = round1(defect_score(agg.defects_created, scoring));
            let rejection = round1(rejection_score(agg.rejection_ratio_pct, scoring));
            let throughput = round1(throughput_curve(
                f64::from(agg.completed_tickets),
                median_tickets,
                scoring,
            ));
            let efficiency = round1(efficiency_curve(agg.avg_cycle_per_ticket, median_cycle, scoring));
            let velocity = round1(
                throughput * scoring.weight_throughput + efficiency * scoring.weight_efficiency,
            );
            let quality =
                round1(defect * scoring.weight_defects + rejection * scoring.weight_rejections);
            let flow_bounded = round1(flow_survey_score.clamp(0.0, scoring.excellence));
            let index = round1(
                velocity * scoring.weight_velocity
                    + quality * scoring.weight_quality
                    + flow_bounded * scoring.weight_flow,
            );

            SprintScorecard {
                sprint_name: agg.sprint_name.clone(),
                sprint_start: agg.start,
                completed_tickets: agg.completed_tickets,
                total_story_points: agg.total_story_points,
                avg_cycle_per_ticket: agg.avg_cycle_per_ticket,
                avg_dev_per_ticket: agg.avg_dev_per_ticket,
                avg_review_per_ticket: agg.avg_review_per_ticket,
                avg_acceptance_per_ticket: agg.avg_acceptance_per_ticket,
                avg_cycle_per_point: agg.avg_cycle_per_point,
                defects_created: agg.defects_created,
                defect_score: defect,
                rejection_ratio_pct: agg.rejection_ratio_pct,
                rejection_score: rejection,
                flow_survey_score,
                flow_imputed,
                throughput_score: throughput,
                efficiency_score: efficiency,
                velocity_score: velocity,
                quality_score: quality,
                flow_score: flow_bounded,
                impact_index: index,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoring_config() -> ScoringConfig {
        ScoringConfig::default()
    }

    fn agg(name: &str, tickets: u32, cycle: f64) -> SprintAggregate {
        SprintAggregate {
            sprint_name: name.to_string(),
            completed_tickets: tickets,
            avg_cycle_per_ticket: cycle,
            ..Default::default()
        }
    }

    #[test]
    fn median_ignores_zeroes() {
        assert_eq!(positive_median([0.0, 4.0, 2.0, 0.0, 6.0].into_iter()), 4.0);
        assert_eq!(positive_median([0.0, 0.0].into_iter()), 0.0);
        assert_eq!(positive_median([3.0, 5.0].into_iter()), 4.0);
    }

    #[test]
    fn throughput_at_median_is_baseline() {
        let s = scoring_config();
        assert_eq!(throughput_curve(4.0, 4.0, &s), 70.0);
    }

    #[test]
    fn throughput_above_median_caps_at_excellence() {
        let s = scoring_config();
        // 25% above median: 70 + 0.25 * 100 = 95
        assert!((throughput_curve(5.0, 4.0, &s) - 95.0).abs() < 1e-9);
        // Far above median: capped.
        assert_eq!(throughput_curve(40.0, 4.0, &s), 100.0);
    }

    #[test]
    fn throughput_below_median_scales_down() {
        let s = scoring_config();
        assert!((throughput_curve(2.0, 4.0, &s) - 35.0).abs() < 1e-9);
        assert_eq!(throughput_curve(0.0, 4.0, &s), 0.0);
        assert_eq!(throughput_curve(4.0, 0.0, &s), 0.0);
    }

    #[test]
    fn throughput_is_monotonic_and_bounded() {
        let s = scoring_config();
        let mut last = -1.0;
        for tickets in 0..30 {
            let score = throughput_curve(f64::from(tickets), 5.0, &s);
            assert!(score >= last);
            assert!((0.0..=100.0).contains(&score));
            last = score;
        }
    }

    #[test]
    fn efficiency_rewards_lower_cycle_time() {
        let s = scoring_config();
        assert_eq!(efficiency_curve(4.0, 4.0, &s), 70.0);
        // Half the median cycle time: 70 + 0.5 * 100 capped at 100.
        assert_eq!(efficiency_curve(2.0, 4.0, &s), 100.0);
        // Double the median: 70 * 0.5.
        assert!((efficiency_curve(8.0, 4.0, &s) - 35.0).abs() < 1e-9);
        assert_eq!(efficiency_curve(0.0, 4.0, &s), 0.0);
    }

    #[test]
    fn efficiency_monotonic_in_cycle_time() {
        let s = scoring_config();
        let mut last = 101.0;
        for tenth in 1..100 {
            let score = efficiency_curve(f64::from(tenth) / 10.0, 4.0, &s);
            assert!(score <= last);
            assert!((0.0..=100.0).contains(&score));
            last = score;
        }
    }

    #[test]
    fn defect_score_penalizes_and_caps() {
        let s = scoring_config();
        assert_eq!(defect_score(0, &s), 100.0);
        assert_eq!(defect_score(1, &s), 80.0);
        assert_eq!(defect_score(5, &s), 0.0);
        // Beyond the cap stays clamped at the floor.
        assert_eq!(defect_score(12, &s), 0.0);
    }

    #[test]
    fn rejection_score_inverts_ratio() {
        let s = scoring_config();
        assert_eq!(rejection_score(0.0, &s), 100.0);
        assert!((rejection_score(33.3, &s) - 66.7).abs() < 1e-9);
        assert_eq!(rejection_score(150.0, &s), 0.0);
    }

    #[test]
    fn final_index_is_documented_weighted_sum() {
        // velocity 80, quality 90, flow 70 with 0.60/0.25/0.15 => 81.0
        let s = scoring_config();
        let index = round1(80.0 * s.weight_velocity + 90.0 * s.weight_quality + 70.0 * s.weight_flow);
        assert_eq!(index, 81.0);
    }

    #[test]
    fn flow_imputed_with_mean_of_surveyed_sprints() {
        let aggregates = vec![agg("S1", 4, 3.0), agg("S2", 4, 3.0), agg("S3", 4, 3.0)];
        let mut flow = FlowTable::default();
        flow.insert("S1", 80.0);
        flow.insert("S2", 60.0);
        let cards = score(&aggregates, &flow, &scoring_config());
        let s3 = cards.iter().find(|c| c.sprint_name == "S3").unwrap();
        assert!(s3.flow_imputed);
        assert_eq!(s3.flow_survey_score, 70.0);
        assert_eq!(s3.flow_score, 70.0);
        assert!(!cards[0].flow_imputed);
    }

    #[test]
    fn flow_defaults_when_no_survey_data_at_all() {
        let aggregates = vec![agg("S1", 4, 3.0)];
        let cards = score(&aggregates, &FlowTable::default(), &scoring_config());
        assert!(cards[0].flow_imputed);
        assert_eq!(cards[0].flow_score, 70.0);
    }

    #[test]
    fn flow_clamped_to_bounds() {
        let aggregates = vec![agg("S1", 4, 3.0), agg("S2", 4, 3.0)];
        let mut flow = FlowTable::default();
        flow.insert("S1", 130.0);
        flow.insert("S2", -10.0);
        let cards = score(&aggregates, &flow, &scoring_config());
        let s1 = cards.iter().find(|c| c.sprint_name == "S1").unwrap();
        let s2 = cards.iter().find(|c| c.sprint_name == "S2").unwrap();
        assert_eq!(s1.flow_score, 100.0);
        assert_eq!(s2.flow_score, 0.0);
    }

    #[test]
    fn all_scores_bounded() {
        let mut worst = agg("S1", 1, 40.0);
        worst.defects_created = 9;
        worst.rejection_ratio_pct = 250.0;
        let aggregates = vec![worst, agg("S2", 10, 1.0)];
        let cards = score(&aggregates, &FlowTable::default(), &scoring_config());
        for card in &cards {
            for value in [
                card.defect_score,
                card.rejection_score,
                card.throughput_score,
                card.efficiency_score,
                card.velocity_score,
                card.quality_score,
                card.flow_score,
                card.impact_index,
            ] {
                assert!((0.0..=100.0).contains(&value), "out of bounds: {value}");
            }
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let aggregates = vec![agg("S1", 3, 2.5), agg("S2", 6, 4.0)];
        let mut flow = FlowTable::default();
        flow.insert("S1", 75.0);
        let first = score(&aggregates, &flow, &scoring_config());
        let second = score(&aggregates, &flow, &scoring_config());
        assert_eq!(first, second);
    }
}
