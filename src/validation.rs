use crate::error::{Field, ValidationErrors};
use crate::models::{PollCategory, PollDraft, PollDuration};
use std::collections::HashSet;

pub const MIN_TITLE_LENGTH: usize = 5;
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 10;

/// A draft that passed validation, with options already normalized:
/// trimmed, empties dropped, capped at [`MAX_OPTIONS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub category: PollCategory,
    pub duration: PollDuration,
    pub multiple_choice: bool,
    pub anonymous_voting: bool,
    pub public_results: bool,
}

/// Trims every option, drops the empty ones, and truncates at
/// [`MAX_OPTIONS`]. Supplying more than the cap is not an error; the
/// overflow is simply cut.
pub fn normalized_options(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|option| option.trim())
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .take(MAX_OPTIONS)
        .collect()
}

/// Checks every field independently and aggregates all violations, so a
/// caller can display the full set of errors in one pass.
pub fn validate_draft(draft: &PollDraft) -> Result<ValidDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.push(Field::Title, "poll question is required");
    } else if title.chars().count() < MIN_TITLE_LENGTH {
        errors.push(
            Field::Title,
            format!("poll question must be at least {MIN_TITLE_LENGTH} characters"),
        );
    }

    let options = normalized_options(&draft.options);
    if options.len() < MIN_OPTIONS {
        errors.push(
            Field::Options,
            format!("at least {MIN_OPTIONS} options are required"),
        );
    } else {
        // Case-sensitive comparison after trimming.
        let distinct: HashSet<&str> = options.iter().map(String::as_str).collect();
        if distinct.len() != options.len() {
            errors.push(Field::Options, "options must be unique");
        }
    }

    if draft.category.is_none() {
        errors.push(Field::Category, "select a category");
    }
    if draft.duration.is_none() {
        errors.push(Field::Duration, "select a duration");
    }

    match (draft.category, draft.duration) {
        (Some(category), Some(duration)) if errors.is_empty() => Ok(ValidDraft {
            title: title.to_string(),
            description: draft.description.trim().to_string(),
            options,
            category,
            duration,
            multiple_choice: draft.multiple_choice,
            anonymous_voting: draft.anonymous_voting,
            public_results: draft.public_results,
        }),
        _ => Err(errors),
    }
}
