//! Pairwise urgency relation between two processes.
//!
//! Aging and round robin read mutable runtime state, so the relation is only
//! guaranteed to be a strict order within one selection call's snapshot.

use std::cmp::Ordering;

use super::{AGING_FACTOR, Criterion};
use crate::core::{Process, Ticks};

/// `Less` means `a` is more urgent than `b`. Ties on the criterion key fall
/// back to ascending id, so distinct processes never compare `Equal`.
pub fn urgency(a: &Process, b: &Process, criterion: Criterion, now: Ticks) -> Ordering {
    let by_key = match criterion {
        Criterion::Fcfs => a.arrival_time.cmp(&b.arrival_time),
        Criterion::Sjf => a
            .burst_left()
            .cmp(&b.burst_left())
            .then_with(|| a.priority().cmp(&b.priority())),
        Criterion::Priority | Criterion::DynamicPriority => a.priority().cmp(&b.priority()),
        Criterion::Aging => aging_score(a, now).total_cmp(&aging_score(b, now)),
        // Unused slice (false) sorts first
        Criterion::RoundRobin => a
            .cycle_used()
            .cmp(&b.cycle_used())
            .then_with(|| a.arrival_time.cmp(&b.arrival_time)),
    };
    by_key.then_with(|| a.id.cmp(&b.id))
}

pub fn is_more_urgent(a: &Process, b: &Process, criterion: Criterion, now: Ticks) -> bool {
    urgency(a, b, criterion, now) == Ordering::Less
}

/// `AGING_FACTOR^(now - arrival) / (1 + burst_left)`; smaller is more urgent.
pub fn aging_score(process: &Process, now: Ticks) -> f64 {
    let waited = now.saturating_sub(process.arrival_time) as f64;
    AGING_FACTOR.powf(waited) / (1.0 + process.burst_left() as f64)
}
