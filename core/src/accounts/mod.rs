//! Console user accounts (the "usuarios" slot): nickname + password pairs
//! with duplicate-nickname rejection. The login screen checks this store and
//! nothing else.

use crate::backend::error::BackendError;
use crate::backend::{self, FileSlot, MemorySlot, Slot};
use crate::types::{Account, Config, MIN_PASSWORD_LEN, Nickname};
use error::AccountError;
use tracing::{debug, warn};

pub mod error {
    use crate::backend::error::BackendError;
    use crate::types::{Nickname, NicknameError};
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum AccountError {
        #[error("nickname already exists: {0}")]
        DuplicateNickname(Nickname),

        #[error("password must be at least {0} characters")]
        PasswordTooShort(usize),

        #[error(transparent)]
        InvalidNickname(#[from] NicknameError),

        #[error("backend error: {0}")]
        Backend(#[from] BackendError),
    }
}

pub struct AccountStore<S: Slot> {
    slot: S,
    accounts: Vec<Account>,
}

/// Lifecycle.
impl<S: Slot> AccountStore<S> {
    /// Opens a store over the given slot; same load-or-empty contract as the
    /// record store.
    pub fn open(slot: S) -> Self {
        let accounts = match slot.read() {
            Ok(Some(blob)) => backend::decode(&blob).unwrap_or_else(|| {
                warn!("undecodable account collection, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "failed to read account slot, starting empty");
                Vec::new()
            }
        };

        Self { slot, accounts }
    }

    pub fn into_slot(self) -> S {
        self.slot
    }
}

impl AccountStore<FileSlot> {
    /// Opens the store over the accounts file in the configured data
    /// directory.
    pub fn open_in(config: &Config) -> Self {
        Self::open(FileSlot::new(config.accounts_path()))
    }
}

impl AccountStore<MemorySlot> {
    /// A fresh, empty, in-memory store.
    pub fn in_memory() -> Self {
        Self::open(MemorySlot::new())
    }
}

/// Read operations.
impl<S: Slot> AccountStore<S> {
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn exists(&self, nickname: &str) -> bool {
        let nickname = nickname.trim();
        self.accounts.iter().any(|a| a.nickname.as_str() == nickname)
    }

    /// Login check: exact nickname (trimmed) and password match.
    pub fn verify(&self, nickname: &str, password: &str) -> bool {
        let nickname = nickname.trim();
        self.accounts
            .iter()
            .any(|a| a.nickname.as_str() == nickname && a.password == password)
    }
}

/// Create operations.
impl<S: Slot> AccountStore<S> {
    /// Creates an account and persists the collection.
    ///
    /// The nickname is trimmed and must be non-empty; the password must be
    /// at least `MIN_PASSWORD_LEN` characters; the nickname must not already
    /// exist.
    pub fn add(&mut self, nickname: &str, password: &str) -> Result<Account, AccountError> {
        let nickname = Nickname::try_new(nickname.to_string())?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        if self.accounts.iter().any(|a| a.nickname == nickname) {
            return Err(AccountError::DuplicateNickname(nickname));
        }

        let account = Account {
            nickname,
            password: password.to_string(),
        };
        self.accounts.push(account.clone());
        self.persist()?;

        debug!(nickname = %account.nickname, "account created");
        Ok(account)
    }
}

/// Persistence.
impl<S: Slot> AccountStore<S> {
    fn persist(&mut self) -> Result<(), BackendError> {
        let blob = backend::encode(&self.accounts)?;
        self.slot.write(&blob)
    }
}
