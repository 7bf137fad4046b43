use crate::error::{Error, Result};
use crate::ledger::VoteLedger;
use crate::models::{Identity, Poll, PollDraft, StoredUser, VoteRecord};
use crate::poll_logic;
use crate::repository::PollRepository;
use crate::storage::{self, KeyValueStore, SESSION_KEY};
use std::cell::RefCell;
use std::rc::Rc;
use time::OffsetDateTime;
use tracing::error;

/// Capability supplying the current user identity and login state.
pub trait IdentityProvider {
    fn current_identity(&self) -> Identity;
}

/// Identity read from the persisted `user` session record. Absent or
/// corrupt session data means anonymous; sign-in itself happens outside
/// this crate.
pub struct StoredIdentityProvider<S: KeyValueStore> {
    store: Rc<RefCell<S>>,
}

impl<S: KeyValueStore> StoredIdentityProvider<S> {
    pub fn new(store: Rc<RefCell<S>>) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> IdentityProvider for StoredIdentityProvider<S> {
    fn current_identity(&self) -> Identity {
        let mut store = self.store.borrow_mut();
        match storage::read_json::<_, Option<StoredUser>>(&mut *store, SESSION_KEY) {
            Ok(Some(user)) => Identity::User {
                id: user.id,
                name: user.name,
            },
            _ => Identity::Anonymous,
        }
    }
}

/// The crate's public surface: poll repository and vote ledger over one
/// shared store, with session gating and the composed vote path.
pub struct PollService<S: KeyValueStore> {
    store: Rc<RefCell<S>>,
    repository: PollRepository<S>,
    ledger: VoteLedger<S>,
}

impl<S: KeyValueStore> PollService<S> {
    pub fn new(store: S) -> Self {
        Self::with_shared_store(Rc::new(RefCell::new(store)))
    }

    pub fn with_shared_store(store: Rc<RefCell<S>>) -> Self {
        Self {
            repository: PollRepository::new(Rc::clone(&store)),
            ledger: VoteLedger::new(Rc::clone(&store)),
            store,
        }
    }

    /// Handle to the underlying store, for wiring collaborators like
    /// [`StoredIdentityProvider`] onto the same state.
    pub fn store(&self) -> Rc<RefCell<S>> {
        Rc::clone(&self.store)
    }

    pub fn create_poll(&self, draft: PollDraft, identity: &Identity) -> Result<Poll> {
        let Identity::User { name, .. } = identity else {
            return Err(Error::NotSignedIn);
        };
        self.repository.create(draft, name)
    }

    /// All polls, newest-first.
    pub fn polls(&self) -> Result<Vec<Poll>> {
        self.repository.list()
    }

    pub fn poll(&self, id: &str) -> Result<Poll> {
        self.repository.find_by_id(id)
    }

    /// Display ordering for the index page: trending polls first, then the
    /// rest, each group newest-first.
    pub fn polls_by_trending(&self) -> Result<Vec<Poll>> {
        let now = OffsetDateTime::now_utc();
        let mut polls = self.repository.list()?;
        polls.sort_by_key(|poll| !poll_logic::is_trending(poll, now));
        Ok(polls)
    }

    pub fn has_voted(&self, identity: &Identity, poll_id: &str) -> Result<bool> {
        match identity.voter_id() {
            Some(voter_id) => self.ledger.has_voted(voter_id, poll_id),
            None => Ok(false),
        }
    }

    /// The voter's recorded selections for a poll, for pre-highlighting a
    /// ballot they already cast.
    pub fn voter_record(&self, identity: &Identity, poll_id: &str) -> Result<VoteRecord> {
        let voter_id = identity.voter_id().ok_or(Error::NotSignedIn)?;
        self.ledger.get_vote(voter_id, poll_id)
    }

    /// The composed vote path. Every check runs before any write: poll
    /// existence first, then expiry, selection shape, and the duplicate
    /// guard; only then the ledger record followed by the tally update.
    ///
    /// There is no transaction across the two keys. If the tally write
    /// fails after the ledger write succeeded, the vote is recorded but not
    /// reflected in the tally — that degraded state is logged and the error
    /// returned, never hidden.
    pub fn submit_vote(
        &self,
        poll_id: &str,
        identity: &Identity,
        selection: &[usize],
    ) -> Result<Poll> {
        let Identity::User { id: voter_id, .. } = identity else {
            return Err(Error::NotSignedIn);
        };

        let poll = self.repository.find_by_id(poll_id)?;
        if poll_logic::is_expired(&poll, OffsetDateTime::now_utc()) {
            return Err(Error::PollEnded);
        }

        // Selections are a set; collapse repeats before shape checks.
        let mut deduped: Vec<usize> = Vec::with_capacity(selection.len());
        for &index in selection {
            if !deduped.contains(&index) {
                deduped.push(index);
            }
        }
        let selection = deduped;

        if selection.is_empty() {
            return Err(Error::EmptySelection);
        }
        if let Some(&out_of_range) = selection.iter().find(|&&i| i >= poll.option_count()) {
            return Err(Error::OptionOutOfRange(out_of_range));
        }
        if !poll.multiple_choice && selection.len() > 1 {
            return Err(Error::TooManySelections);
        }
        if self.ledger.has_voted(voter_id, poll_id)? {
            return Err(Error::DuplicateVote(poll_id.to_string()));
        }

        self.ledger.record_vote(voter_id, poll_id, &selection)?;
        self.repository.apply_vote(poll_id, &selection).map_err(|err| {
            error!(poll_id, voter = %voter_id, %err, "vote recorded but tally update failed");
            err
        })
    }
}
