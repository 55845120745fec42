use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::{Account, AccountError, Purchase, Session, SessionError};

/// Possible errors to occur while loading, saving or modifying user data
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error("The file \"{0}\" does not exist")]
    FileNotFound(PathBuf),
    #[error("Permission denied to access the file \"{0}\"")]
    PermissionDenied(PathBuf),
    #[error("Could not decode JSON from \"{path}\", the file might be corrupted: {source}")]
    CorruptData {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("An I/O error occurred while accessing \"{path}\": {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Username \"{0}\" already exists")]
    DuplicateUsername(String),
    #[error("There is no user called \"{0}\"")]
    UnknownUser(String),
}

impl StoreError {
    fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Self::FileNotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// All user accounts together with their purchases
///
/// The store is loaded from and written back to a single JSON document that
/// maps usernames to accounts. Accounts are kept sorted by username, so
/// writing an unchanged store twice produces the same document.
///
/// Nothing is written to disk automatically, callers have to
/// [`persist`](UserStore::persist) after every change they want to keep.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserStore {
    accounts: BTreeMap<String, Account>,
}

impl UserStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
        }
    }

    /// Reads the store from the JSON document at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| StoreError::from_io(path, e))?;
        let store: Self =
            serde_json::from_slice(&content).map_err(|source| StoreError::CorruptData {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), users = store.len(), "loaded user data");

        Ok(store)
    }

    /// Writes the whole store to `path`, replacing the previous document
    ///
    /// The document is first written to a temporary file next to `path`, which
    /// then replaces the target. If anything fails, the previous document stays
    /// untouched.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let result = self.write_document(&tmp_path).and_then(|()| {
            std::fs::rename(&tmp_path, path).map_err(|e| StoreError::from_io(path, e))
        });
        if result.is_err() {
            // the temporary file might not even exist
            let _ = std::fs::remove_file(&tmp_path);
        }
        result?;

        tracing::debug!(path = %path.display(), users = self.len(), "saved user data");
        Ok(())
    }

    fn write_document(&self, path: &Path) -> Result<(), StoreError> {
        let io_error = |e: std::io::Error| StoreError::from_io(path, e);
        let file = std::fs::File::create(path).map_err(io_error)?;
        let mut writer = std::io::BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        writer.write_all(b"\n").map_err(io_error)?;

        let file = writer.into_inner().map_err(|e| io_error(e.into_error()))?;
        file.sync_all().map_err(io_error)
    }

    /// The number of accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All usernames in alphabetical order
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    /// The account of `username`
    pub fn account(&self, username: &str) -> Option<&Account> {
        self.accounts.get(username)
    }

    /// Whether any account already uses `email`
    pub fn email_in_use(&self, email: &str) -> bool {
        self.accounts.values().any(|account| account.email() == email)
    }

    /// Adds a new account under `username`
    pub fn add_user(&mut self, username: impl Into<String>, account: Account) -> Result<(), StoreError> {
        match self.accounts.entry(username.into()) {
            Entry::Vacant(v) => {
                tracing::info!(username = v.key().as_str(), "registered new user");
                v.insert(account);
                Ok(())
            }
            Entry::Occupied(o) => Err(StoreError::DuplicateUsername(o.key().clone())),
        }
    }

    /// Whether `username` exists and `password` is exactly their password
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.account(username)
            .map(|account| account.check_password(password))
            .unwrap_or(false)
    }

    /// The purchases of the logged in user
    pub fn purchases(&self, session: &Session) -> Result<&[Purchase], StoreError> {
        Ok(self.current_account(session)?.purchases())
    }

    /// Whether the logged in user already recorded an identical purchase
    pub fn contains_purchase(&self, session: &Session, purchase: &Purchase) -> Result<bool, StoreError> {
        Ok(self.current_account(session)?.purchases().contains(purchase))
    }

    /// Appends `purchase` to the purchases of the logged in user
    pub fn add_purchase(&mut self, session: &Session, purchase: Purchase) -> Result<(), StoreError> {
        let account = self.current_account_mut(session)?;
        tracing::info!(
            username = session.current_user().unwrap_or_default(),
            seller = purchase.seller(),
            item = purchase.item_name(),
            total_cost = purchase.total_cost(),
            "added purchase"
        );
        account.push_purchase(purchase);

        Ok(())
    }

    /// Replaces the spending limit of the logged in user
    pub fn set_spending_limit(&mut self, session: &Session, limit: f64) -> Result<(), StoreError> {
        self.current_account_mut(session)?.set_spending_limit(limit)?;
        tracing::info!(username = session.current_user().unwrap_or_default(), limit, "set spending limit");

        Ok(())
    }

    /// The account of the logged in user
    pub fn current_account(&self, session: &Session) -> Result<&Account, StoreError> {
        let username = session.require()?;
        self.accounts
            .get(username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))
    }

    fn current_account_mut(&mut self, session: &Session) -> Result<&mut Account, StoreError> {
        let username = session.require()?;
        self.accounts
            .get_mut(username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))
    }
}
