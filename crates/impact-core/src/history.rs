//! Status-history replay: accumulates business-day time per lifecycle
//! phase and detects rejection events.

use crate::calendar::business_days;
use crate::types::StatusEvent;
use chrono::{DateTime, FixedOffset};

// ---------------------------------------------------------------------------
// LifecyclePhase
// ---------------------------------------------------------------------------

/// The three tracked-active phases. Statuses outside the tracked set
/// (to do, done, rejected, ...) have no phase and accumulate no time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Dev,
    Review,
    Acceptance,
}

/// Map a normalized status label to its lifecycle phase, if tracked.
pub fn phase_of(status: &str) -> Option<LifecyclePhase> {
    match status {
        "started" => Some(LifecyclePhase::Dev),
        "peer review" | "finished" => Some(LifecyclePhase::Review),
        "delivered" => Some(LifecyclePhase::Acceptance),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// HistorySummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct HistorySummary {
    pub total_days: f64,
    pub dev_days: f64,
    pub review_days: f64,
    pub acceptance_days: f64,
    pub rejection_count: u32,
    pub was_rejected: bool,
    /// Normalized status the item ended the replay in.
    pub final_status: String,
}

impl HistorySummary {
    fn accumulate(&mut self, phase: LifecyclePhase, days: f64) {
        self.total_days += days;
        match phase {
            LifecyclePhase::Dev => self.dev_days += days,
            LifecyclePhase::Review => self.review_days += days,
            LifecyclePhase::Acceptance => self.acceptance_days += days,
        }
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Replay an item's status events in order, starting from its creation
/// instant in the initial "to do" state.
///
/// On each event, the elapsed business days since the previous change
/// are credited to the phase of the *pre-transition* status. An item
/// still tracked-active after the last event keeps accumulating up to
/// `now` — the caller captures `now` once per run so a whole batch sees
/// the same instant.
pub fn replay(
    created: DateTime<FixedOffset>,
    events: &[StatusEvent],
    now: DateTime<FixedOffset>,
) -> HistorySummary {
    let mut summary = HistorySummary {
        final_status: "to do".to_string(),
        ..Default::default()
    };
    let mut current = summary.final_status.clone();
    let mut last_change = created;

    for event in events {
        let days = business_days(&last_change, &event.at);
        if let Some(phase) = phase_of(&current) {
            summary.accumulate(phase, days);
        }

        if event.from == "delivered" && event.to == "rejected" {
            summary.rejection_count += 1;
            summary.was_rejected = true;
        }

        current = event.to.clone();
        last_change = event.at;
    }

    // Open item: carry the final state forward to "now".
    if let Some(phase) = phase_of(&current) {
        let days = business_days(&last_change, &now);
        summary.accumulate(phase, days);
    }

    summary.final_status = current;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        utc().with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn event(at_: DateTime<FixedOffset>, from: &str, to: &str) -> StatusEvent {
        StatusEvent {
            at: at_,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn no_events_no_time() {
        let s = replay(at(2024, 3, 11, 9), &[], at(2024, 3, 13, 9));
        assert_eq!(s.total_days, 0.0);
        assert_eq!(s.final_status, "to do");
    }

    #[test]
    fn phases_partition_total() {
        // Mon 10:00 started, 13:00 peer review, 16:00 delivered,
        // Fri 16:00 accepted.
        let events = vec![
            event(at(2024, 3, 11, 10), "to do", "started"),
            event(at(2024, 3, 11, 13), "started", "peer review"),
            event(at(2024, 3, 11, 16), "peer review", "delivered"),
            event(at(2024, 3, 15, 16), "delivered", "accepted"),
        ];
        let s = replay(at(2024, 3, 11, 9), &events, at(2024, 3, 18, 9));
        let sum = s.dev_days + s.review_days + s.acceptance_days;
        assert!((s.total_days - sum).abs() < 1e-9);
        assert!((s.dev_days - 0.125).abs() < 1e-9);
        assert!((s.review_days - 0.125).abs() < 1e-9);
        assert!((s.acceptance_days - 3.0).abs() < 1e-9);
        assert_eq!(s.final_status, "accepted");
    }

    #[test]
    fn inactive_statuses_accumulate_nothing() {
        // Sits in "to do" all week, then moves straight to done.
        let events = vec![event(at(2024, 3, 15, 10), "to do", "done")];
        let s = replay(at(2024, 3, 11, 9), &events, at(2024, 3, 18, 9));
        assert_eq!(s.total_days, 0.0);
    }

    #[test]
    fn rejection_counted_per_delivered_to_rejected_transition() {
        let events = vec![
            event(at(2024, 3, 11, 10), "to do", "started"),
            event(at(2024, 3, 11, 12), "started", "delivered"),
            event(at(2024, 3, 11, 14), "delivered", "rejected"),
            event(at(2024, 3, 12, 10), "rejected", "started"),
            event(at(2024, 3, 12, 12), "started", "delivered"),
            event(at(2024, 3, 12, 14), "delivered", "rejected"),
            event(at(2024, 3, 13, 10), "rejected", "delivered"),
        ];
        let s = replay(at(2024, 3, 11, 9), &events, at(2024, 3, 13, 12));
        assert_eq!(s.rejection_count, 2);
        assert!(s.was_rejected);
    }

    #[test]
    fn open_item_accumulates_until_now() {
        let events = vec![event(at(2024, 3, 11, 10), "to do", "started")];
        let s = replay(at(2024, 3, 11, 9), &events, at(2024, 3, 11, 16));
        let expected = 6.0 / 24.0;
        assert!((s.dev_days - expected).abs() < 1e-9);
        assert_eq!(s.final_status, "started");
    }

    #[test]
    fn weekend_excluded_from_dev_and_acceptance() {
        // Created Mon 09:00, started Mon 10:00,
        // delivered the following Mon 10:00, still delivered at a
        // processing instant two weekdays later.
        let events = vec![
            event(at(2024, 3, 11, 10), "to do", "started"),
            event(at(2024, 3, 18, 10), "started", "delivered"),
        ];
        let s = replay(at(2024, 3, 11, 9), &events, at(2024, 3, 20, 10));
        // Dev: Mon 10:00 -> Mon+7 10:00, weekend excluded.
        let dev_expected = 3.0 + 14.0 / 24.0 + 10.0 / 24.0;
        assert!((s.dev_days - dev_expected).abs() < 1e-9, "dev {}", s.dev_days);
        // Acceptance: Mon 10:00 -> Wed 10:00, all weekdays.
        let acc_expected = 14.0 / 24.0 + 10.0 / 24.0;
        assert!(
            (s.acceptance_days - acc_expected).abs() < 1e-9,
            "acceptance {}",
            s.acceptance_days
        );
        assert_eq!(s.review_days, 0.0);
    }
}
