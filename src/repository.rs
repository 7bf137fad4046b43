use crate::error::{Error, Result};
use crate::models::{Poll, PollDraft};
use crate::storage::{self, KeyValueStore, POLLS_KEY};
use crate::{seed, validation};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::rc::Rc;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

/// Poll collection over the key-value store. Locally created polls live
/// under the `polls` key; reads merge them with the fixed demonstration set,
/// preferring the stored copy when a demonstration poll has been mutated.
pub struct PollRepository<S: KeyValueStore> {
    store: Rc<RefCell<S>>,
}

impl<S: KeyValueStore> PollRepository<S> {
    pub fn new(store: Rc<RefCell<S>>) -> Self {
        Self { store }
    }

    /// Validates the draft, then persists a fresh poll: new UUID id,
    /// creation timestamp, all-zero tally. Validation runs before anything
    /// touches the store.
    pub fn create(&self, draft: PollDraft, author: &str) -> Result<Poll> {
        let valid = validation::validate_draft(&draft).map_err(Error::Validation)?;

        let tally: BTreeMap<usize, u64> = (0..valid.options.len()).map(|i| (i, 0)).collect();
        let poll = Poll {
            id: Uuid::new_v4().to_string(),
            title: valid.title,
            description: valid.description,
            options: valid.options,
            category: valid.category,
            duration: valid.duration,
            multiple_choice: valid.multiple_choice,
            anonymous_voting: valid.anonymous_voting,
            public_results: valid.public_results,
            author: author.to_string(),
            created_at: OffsetDateTime::now_utc(),
            votes: tally,
            total_votes: 0,
        };

        let mut store = self.store.borrow_mut();
        let mut stored: Vec<Poll> = storage::read_json(&mut *store, POLLS_KEY)?;
        stored.push(poll.clone());
        storage::write_json(&mut *store, POLLS_KEY, &stored)?;
        debug!(poll_id = %poll.id, author, "created poll");
        Ok(poll)
    }

    /// Stored and demonstration polls merged, newest-first by creation
    /// timestamp. A mutated demonstration poll appears once, from storage.
    pub fn list(&self) -> Result<Vec<Poll>> {
        let mut polls = self.stored()?;
        let stored_ids: HashSet<String> = polls.iter().map(|p| p.id.clone()).collect();
        polls.extend(
            seed::demo_polls(OffsetDateTime::now_utc())
                .into_iter()
                .filter(|p| !stored_ids.contains(&p.id)),
        );
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(polls)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Poll> {
        if let Some(poll) = self.stored()?.into_iter().find(|p| p.id == id) {
            return Ok(poll);
        }
        seed::demo_polls(OffsetDateTime::now_utc())
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::PollNotFound(id.to_string()))
    }

    /// Applies one ballot: bumps the tally for each selected index and the
    /// total by 1, then writes the poll back. A demonstration poll gets
    /// persisted as if locally created on its first mutation.
    pub fn apply_vote(&self, id: &str, option_indices: &[usize]) -> Result<Poll> {
        let mut store = self.store.borrow_mut();
        let mut stored: Vec<Poll> = storage::read_json(&mut *store, POLLS_KEY)?;
        for poll in &mut stored {
            poll.repair_tally();
        }

        let index = match stored.iter().position(|p| p.id == id) {
            Some(index) => index,
            None => {
                let seeded = seed::demo_polls(OffsetDateTime::now_utc())
                    .into_iter()
                    .find(|p| p.id == id)
                    .ok_or_else(|| Error::PollNotFound(id.to_string()))?;
                stored.push(seeded);
                stored.len() - 1
            }
        };

        let poll = &mut stored[index];
        for &option in option_indices {
            *poll.votes.entry(option).or_insert(0) += 1;
        }
        poll.total_votes += 1;
        let updated = poll.clone();

        storage::write_json(&mut *store, POLLS_KEY, &stored)?;
        debug!(poll_id = id, total_votes = updated.total_votes, "applied vote");
        Ok(updated)
    }

    fn stored(&self) -> Result<Vec<Poll>> {
        let mut store = self.store.borrow_mut();
        let mut polls: Vec<Poll> = storage::read_json(&mut *store, POLLS_KEY)?;
        for poll in &mut polls {
            poll.repair_tally();
        }
        Ok(polls)
    }
}
