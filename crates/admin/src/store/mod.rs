//! Record store for user records.
//!
//! # Storage
//!
//! Records live in process memory and are lost on restart. The store is an
//! explicit object injected into handlers through [`AppState`], so each test
//! can build an isolated instance.
//!
//! # Concurrency
//!
//! Each operation holds the store's lock for its own duration only. There is
//! no transaction spanning requests: concurrent replaces of the same id are
//! last-write-wins and neither caller is told about the other.
//!
//! [`AppState`]: crate::state::AppState

pub mod memory;
pub mod seed;

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use roster_core::{NewUser, User, UserId};
use thiserror::Error;

pub use memory::InMemoryUserStore;
pub use seed::seed_users;

/// Operations exposed by a user record store.
pub trait UserStore: Send + Sync {
    /// Every record currently held, in insertion order.
    fn list(&self) -> Vec<User>;

    /// Assign a fresh id, append the record and return it.
    fn create(&self, new_user: NewUser) -> User;

    /// Overwrite the record with the same id wholesale.
    ///
    /// Returns the stored record, or `None` if no record has that id, in which
    /// case nothing changes.
    fn replace(&self, user: User) -> Option<User>;

    /// Remove the record with this id.
    ///
    /// Returns the removed record, or `None` if nothing matched, in which case
    /// nothing changes.
    fn delete(&self, id: &UserId) -> Option<User>;

    /// Number of records held.
    fn len(&self) -> usize;

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How new user ids are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Monotonically increasing decimal counter; ids are never reused.
    #[default]
    Sequential,
    /// Random v4 UUIDs.
    Uuid,
}

/// Error parsing an [`IdStrategy`] name.
#[derive(Debug, Error)]
#[error("unknown id strategy {0:?} (expected \"sequential\" or \"uuid\")")]
pub struct UnknownIdStrategy(String);

impl FromStr for IdStrategy {
    type Err = UnknownIdStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "uuid" => Ok(Self::Uuid),
            other => Err(UnknownIdStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Uuid => f.write_str("uuid"),
        }
    }
}

/// Id source backing an [`IdStrategy`].
#[derive(Debug)]
pub(crate) enum IdGenerator {
    Sequential(AtomicU64),
    Uuid,
}

impl IdGenerator {
    /// Build a generator that will not hand out any id already in `existing`.
    pub(crate) fn new(strategy: IdStrategy, existing: &[User]) -> Self {
        match strategy {
            IdStrategy::Sequential => {
                let highest = existing
                    .iter()
                    .filter_map(|user| user.id.as_str().parse::<u64>().ok())
                    .max()
                    .unwrap_or(0);
                Self::Sequential(AtomicU64::new(highest.saturating_add(1)))
            }
            IdStrategy::Uuid => Self::Uuid,
        }
    }

    pub(crate) fn next_id(&self) -> UserId {
        match self {
            Self::Sequential(counter) => {
                UserId::new(counter.fetch_add(1, Ordering::Relaxed).to_string())
            }
            Self::Uuid => UserId::new(uuid::Uuid::new_v4().to_string()),
        }
    }
}
