pub mod error;
pub mod ledger;
pub mod models;
pub mod poll_logic;
pub mod repository;
pub mod seed;
pub mod service;
pub mod storage;
pub mod validation;

pub use error::{Error, Field, FieldError, Result, ValidationErrors};
pub use ledger::VoteLedger;
pub use models::*;
pub use poll_logic::{
    is_expired, is_trending, result_percentage, select_options, time_remaining, TimeRemaining,
};
pub use repository::PollRepository;
pub use service::{IdentityProvider, PollService, StoredIdentityProvider};
pub use storage::{KeyValueStore, MemoryStore, StoreError};
pub use validation::{normalized_options, validate_draft, ValidDraft};
