use super::Criterion;
use super::policy::is_more_urgent;
use crate::core::{Process, Ticks};

/// Index of the most urgent process in `window`, or `None` if it is empty.
///
/// Linear scan against the running best; the urgency relation is not a total
/// order across time, so this is never handed to a general-purpose sort.
pub fn pick_best(window: &[Process], criterion: Criterion, now: Ticks) -> Option<usize> {
    let mut candidates = window.iter().enumerate();
    let (mut best, mut best_process) = candidates.next()?;
    for (index, process) in candidates {
        if is_more_urgent(process, best_process, criterion, now) {
            best = index;
            best_process = process;
        }
    }
    Some(best)
}

/// Repeatedly swap the best of the remaining suffix to its front.
pub fn selection_sort(window: &mut [Process], criterion: Criterion, now: Ticks) {
    for i in 0..window.len() {
        if let Some(best) = pick_best(&window[i..], criterion, now) {
            window.swap(i, i + best);
        }
    }
}
