//! Property-based tests for the poll lifecycle engine.
//!
//! These use proptest to check the tally bookkeeping and validation rules
//! across many randomly generated ballots and drafts.

use pollcraft::{
    poll_logic, validate_draft, Identity, MemoryStore, PollCategory, PollDraft, PollDuration,
    PollService,
};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::subsequence;

fn base_draft(options: Vec<String>, multiple_choice: bool) -> PollDraft {
    PollDraft {
        title: "Which one do you prefer?".to_string(),
        options,
        category: Some(PollCategory::Other),
        duration: Some(PollDuration::NoEnd),
        multiple_choice,
        ..PollDraft::default()
    }
}

fn distinct_options(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("option {i}")).collect()
}

proptest! {
    // total_votes counts ballots; the tally sums every selected option.
    #[test]
    fn tally_bookkeeping_holds_for_single_choice(
        choices in vec(0..4usize, 1..25),
    ) {
        let service = PollService::new(MemoryStore::new());
        let author = Identity::user("author", "Author");
        let poll = service
            .create_poll(base_draft(distinct_options(4), false), &author)
            .unwrap();

        for (i, &choice) in choices.iter().enumerate() {
            let voter = Identity::user(format!("v{i}"), format!("v{i}"));
            service.submit_vote(&poll.id, &voter, &[choice]).unwrap();
        }

        let after = service.poll(&poll.id).unwrap();
        prop_assert_eq!(after.total_votes, choices.len() as u64);
        prop_assert_eq!(after.votes.values().sum::<u64>(), after.total_votes);
        for index in 0..4 {
            let expected = choices.iter().filter(|&&c| c == index).count() as u64;
            prop_assert_eq!(after.votes_for(index), expected);
        }
    }

    #[test]
    fn tally_bookkeeping_holds_for_multi_choice(
        ballots in vec(subsequence(vec![0usize, 1, 2, 3, 4], 1..=5), 1..15),
    ) {
        let service = PollService::new(MemoryStore::new());
        let author = Identity::user("author", "Author");
        let poll = service
            .create_poll(base_draft(distinct_options(5), true), &author)
            .unwrap();

        for (i, ballot) in ballots.iter().enumerate() {
            let voter = Identity::user(format!("v{i}"), format!("v{i}"));
            service.submit_vote(&poll.id, &voter, ballot).unwrap();
        }

        let after = service.poll(&poll.id).unwrap();
        let selections: u64 = ballots.iter().map(|b| b.len() as u64).sum();
        prop_assert_eq!(after.total_votes, ballots.len() as u64);
        prop_assert_eq!(after.votes.values().sum::<u64>(), selections);
    }

    // For single-choice polls with any votes, option shares sum to 100.
    #[test]
    fn single_choice_percentages_sum_to_one_hundred(
        choices in vec(0..3usize, 1..20),
    ) {
        let service = PollService::new(MemoryStore::new());
        let author = Identity::user("author", "Author");
        let poll = service
            .create_poll(base_draft(distinct_options(3), false), &author)
            .unwrap();
        for (i, &choice) in choices.iter().enumerate() {
            let voter = Identity::user(format!("v{i}"), format!("v{i}"));
            service.submit_vote(&poll.id, &voter, &[choice]).unwrap();
        }

        let after = service.poll(&poll.id).unwrap();
        let sum: f64 = (0..3).map(|i| poll_logic::result_percentage(&after, i)).sum();
        prop_assert!((sum - 100.0).abs() < 1e-9);
    }

    // A draft passes validation exactly when the title is long enough and
    // at least two distinct non-empty options remain after trimming.
    #[test]
    fn validation_accepts_iff_the_rules_hold(
        title in ".{0,12}",
        options in vec("[ a-c]{0,3}", 0..6),
    ) {
        let draft = PollDraft {
            title: title.clone(),
            options: options.clone(),
            category: Some(PollCategory::Food),
            duration: Some(PollDuration::OneDay),
            ..PollDraft::default()
        };

        let title_ok = title.trim().chars().count() >= 5;
        let trimmed: Vec<&str> = options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();
        let distinct = trimmed
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len();
        let options_ok = trimmed.len() >= 2 && distinct == trimmed.len();

        prop_assert_eq!(validate_draft(&draft).is_ok(), title_ok && options_ok);
    }

    // Selection editing never produces duplicates or out-of-order toggles
    // breaking set semantics.
    #[test]
    fn selection_editing_keeps_set_semantics(
        clicks in vec(0..4usize, 0..20),
        multiple_choice in any::<bool>(),
    ) {
        let service = PollService::new(MemoryStore::new());
        let author = Identity::user("author", "Author");
        let poll = service
            .create_poll(base_draft(distinct_options(4), multiple_choice), &author)
            .unwrap();
        let now = time::OffsetDateTime::now_utc();

        let mut selection = Vec::new();
        for &click in &clicks {
            selection = poll_logic::select_options(&poll, &selection, click, false, now);
            let distinct = selection.iter().collect::<std::collections::HashSet<_>>();
            prop_assert_eq!(distinct.len(), selection.len());
            if !multiple_choice {
                prop_assert_eq!(selection.len(), 1);
            }
        }
    }
}
