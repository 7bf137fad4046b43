use crate::models::{Poll, PollCategory, PollDuration};
use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

/// The fixed demonstration set shown alongside locally created polls. Seed
/// ids use the `demo-` prefix so they can never collide with the UUID ids
/// the repository assigns. Creation instants are relative to `now`; once a
/// seed poll is mutated, the repository persists it and the timestamp
/// freezes.
pub fn demo_polls(now: OffsetDateTime) -> Vec<Poll> {
    vec![
        Poll {
            id: "demo-1".to_string(),
            title: "What's your favorite programming language in 2024?".to_string(),
            description: "Help us understand the current trends in software development"
                .to_string(),
            options: vec![
                "JavaScript".to_string(),
                "Python".to_string(),
                "TypeScript".to_string(),
                "Go".to_string(),
            ],
            category: PollCategory::Technology,
            duration: PollDuration::OneWeek,
            multiple_choice: false,
            anonymous_voting: true,
            public_results: true,
            author: "TechCommunity".to_string(),
            created_at: now - Duration::days(2),
            votes: BTreeMap::from([(0, 412), (1, 389), (2, 298), (3, 148)]),
            total_votes: 1247,
        },
        Poll {
            id: "demo-2".to_string(),
            title: "Best vacation destination for 2024?".to_string(),
            description: "Share your travel preferences and discover new places".to_string(),
            options: vec![
                "Japan".to_string(),
                "Italy".to_string(),
                "Iceland".to_string(),
                "New Zealand".to_string(),
            ],
            category: PollCategory::Travel,
            duration: PollDuration::TwoWeeks,
            multiple_choice: false,
            anonymous_voting: true,
            public_results: true,
            author: "WanderlustGuide".to_string(),
            created_at: now - Duration::days(5),
            votes: BTreeMap::from([(0, 234), (1, 298), (2, 167), (3, 157)]),
            total_votes: 856,
        },
        Poll {
            id: "demo-3".to_string(),
            title: "Which streaming service offers the best value?".to_string(),
            description: "Compare popular streaming platforms".to_string(),
            options: vec![
                "Netflix".to_string(),
                "Disney+".to_string(),
                "Amazon Prime".to_string(),
                "Hulu".to_string(),
            ],
            category: PollCategory::Entertainment,
            duration: PollDuration::OneWeek,
            multiple_choice: false,
            anonymous_voting: true,
            public_results: true,
            author: "MediaReviewer".to_string(),
            created_at: now - Duration::days(1),
            votes: BTreeMap::from([(0, 201), (1, 156), (2, 178), (3, 99)]),
            total_votes: 634,
        },
    ]
}
