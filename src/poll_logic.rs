//! Derived poll state as pure functions of `(Poll, now)`. Nothing here
//! touches storage, and "Ended" is never written anywhere: expiry is
//! recomputed from the creation instant and duration on every call.

use crate::models::Poll;
use time::{Duration, OffsetDateTime};

pub const TRENDING_VOTE_THRESHOLD: u64 = 500;
pub const TRENDING_WINDOW_DAYS: i64 = 3;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRemaining {
    pub label: String,
    pub expired: bool,
}

/// Whether the poll's voting window has closed. Unbounded polls never
/// expire.
pub fn is_expired(poll: &Poll, now: OffsetDateTime) -> bool {
    poll.ends_at().is_some_and(|ends_at| ends_at <= now)
}

/// Human-readable time-left label plus the expiry flag. Remaining time is
/// rounded up to whole days, so a poll with two hours left still reads
/// "1 day left".
pub fn time_remaining(poll: &Poll, now: OffsetDateTime) -> TimeRemaining {
    let Some(ends_at) = poll.ends_at() else {
        return TimeRemaining {
            label: "No end date".to_string(),
            expired: false,
        };
    };
    if ends_at <= now {
        return TimeRemaining {
            label: "Ended".to_string(),
            expired: true,
        };
    }

    let days_left = ((ends_at - now).whole_seconds() as u64).div_ceil(SECONDS_PER_DAY as u64);
    let label = if days_left == 1 {
        "1 day left".to_string()
    } else {
        format!("{days_left} days left")
    };
    TimeRemaining {
        label,
        expired: false,
    }
}

/// Share of the total vote an option holds, in [0, 100]. Not rounded; the
/// caller formats for display. 0 for a poll nobody has voted on.
pub fn result_percentage(poll: &Poll, option_index: usize) -> f64 {
    if poll.total_votes == 0 {
        return 0.0;
    }
    poll.votes_for(option_index) as f64 * 100.0 / poll.total_votes as f64
}

/// Display-only heuristic: high-volume or recently created.
pub fn is_trending(poll: &Poll, now: OffsetDateTime) -> bool {
    poll.total_votes > TRENDING_VOTE_THRESHOLD
        || now - poll.created_at < Duration::days(TRENDING_WINDOW_DAYS)
}

/// Applies one click to an in-progress selection. Multiple-choice polls
/// toggle the candidate in and out; single-choice polls replace the whole
/// selection. Returns the prior selection unchanged once the voter has
/// voted or the poll has expired.
pub fn select_options(
    poll: &Poll,
    prior: &[usize],
    candidate: usize,
    has_voted: bool,
    now: OffsetDateTime,
) -> Vec<usize> {
    if has_voted || is_expired(poll, now) {
        return prior.to_vec();
    }

    if poll.multiple_choice {
        let mut next = prior.to_vec();
        match next.iter().position(|&index| index == candidate) {
            Some(position) => {
                next.remove(position);
            }
            None => next.push(candidate),
        }
        next
    } else {
        vec![candidate]
    }
}
