use crate::error::{Error, Result};
use crate::models::VoteRecord;
use crate::storage::{self, votes_key, KeyValueStore};
use std::cell::RefCell;
use std::rc::Rc;
use time::OffsetDateTime;
use tracing::debug;

/// Per-voter record of which polls have been voted on and with which
/// selections. Append-only: a record is written once and never edited or
/// retracted, and a second record for the same (voter, poll) pair is
/// rejected outright.
pub struct VoteLedger<S: KeyValueStore> {
    store: Rc<RefCell<S>>,
}

impl<S: KeyValueStore> VoteLedger<S> {
    pub fn new(store: Rc<RefCell<S>>) -> Self {
        Self { store }
    }

    pub fn has_voted(&self, voter_id: &str, poll_id: &str) -> Result<bool> {
        Ok(self
            .records(voter_id)?
            .iter()
            .any(|record| record.poll_id == poll_id))
    }

    pub fn get_vote(&self, voter_id: &str, poll_id: &str) -> Result<VoteRecord> {
        self.records(voter_id)?
            .into_iter()
            .find(|record| record.poll_id == poll_id)
            .ok_or(Error::VoteNotFound)
    }

    /// Appends a record stamped with the current instant to the voter's
    /// list. Fails with [`Error::DuplicateVote`] — leaving the ledger
    /// untouched — if the voter already has a record for this poll.
    pub fn record_vote(
        &self,
        voter_id: &str,
        poll_id: &str,
        option_indices: &[usize],
    ) -> Result<VoteRecord> {
        let mut store = self.store.borrow_mut();
        let key = votes_key(voter_id);
        let mut records: Vec<VoteRecord> = storage::read_json(&mut *store, &key)?;
        if records.iter().any(|record| record.poll_id == poll_id) {
            return Err(Error::DuplicateVote(poll_id.to_string()));
        }

        let record = VoteRecord {
            poll_id: poll_id.to_string(),
            voter_id: voter_id.to_string(),
            selected_options: option_indices.to_vec(),
            voted_at: OffsetDateTime::now_utc(),
        };
        records.push(record.clone());
        storage::write_json(&mut *store, &key, &records)?;
        debug!(voter = voter_id, poll_id, "recorded vote");
        Ok(record)
    }

    fn records(&self, voter_id: &str) -> Result<Vec<VoteRecord>> {
        let mut store = self.store.borrow_mut();
        Ok(storage::read_json(&mut *store, &votes_key(voter_id))?)
    }
}
