//! Result computation
//!
//! Counts are a linear scan over the poll's ballots. Each percentage is
//! rounded independently, so the shares of all options may not add up to
//! exactly 100.

use crate::types::{Ballot, OptionTally, Poll, PollResults};

/// Round to one decimal place, exact ties to even
///
/// Float formatting rounds the exact binary value, so 6.25 becomes 6.2 and
/// 18.75 becomes 18.8. Scaling by ten first would round 6.25 up.
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Share of `count` in `total` as a percentage, 0.0 when there are no ballots
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(count as f64 / total as f64 * 100.0)
}

/// Compute the per-option breakdown of `poll` from its stored ballots
///
/// Ballots belonging to other polls or pointing outside the option list are
/// ignored for per-option counts but still count toward the total.
pub fn tally(poll: &Poll, ballots: &[Ballot]) -> PollResults {
    let mut counts = vec![0u64; poll.options.len()];
    let mut total = 0u64;

    for ballot in ballots.iter().filter(|b| b.poll_id == poll.id) {
        total += 1;
        if let Some(slot) = usize::try_from(ballot.option_index)
            .ok()
            .and_then(|i| counts.get_mut(i))
        {
            *slot += 1;
        }
    }

    let options = poll
        .options
        .iter()
        .zip(counts)
        .map(|(label, count)| OptionTally {
            label: label.clone(),
            count,
            percentage: percentage(count, total),
        })
        .collect();

    PollResults {
        poll_id: poll.id,
        total_ballots: total,
        options,
    }
}
