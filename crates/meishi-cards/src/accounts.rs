//! Account identity
//!
//! Every visitor starts with an anonymous account that can later be
//! upgraded by linking a federated provider. The provider handshake
//! itself is outside this crate; only the resulting state is kept.

use chrono::{DateTime, Utc};
use meishi_core::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An account that owns cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub uid: String,
    pub is_anonymous: bool,
    pub linked_account_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// SQLite-based account store
pub struct AccountStore {
    conn: Connection,
}

impl AccountStore {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory account store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS accounts (
                uid TEXT PRIMARY KEY,
                is_anonymous INTEGER NOT NULL,
                linked_account_type TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Issue a new anonymous account
    pub fn sign_in_anonymously(&self) -> Result<Account> {
        let account = Account {
            uid: uuid::Uuid::new_v4().to_string(),
            is_anonymous: true,
            linked_account_type: None,
            created_at: Utc::now(),
        };

        self.conn.execute(
            "INSERT INTO accounts (uid, is_anonymous, linked_account_type, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                account.uid,
                account.is_anonymous,
                account.linked_account_type,
                account.created_at.to_rfc3339(),
            ],
        )?;

        info!("Signed in anonymously as {}", account.uid);
        Ok(account)
    }

    /// Resume the most recently issued account, signing in anonymously
    /// when none exists yet
    pub fn restore_or_sign_in(&self) -> Result<Account> {
        let uid: Option<String> = self
            .conn
            .query_row(
                "SELECT uid FROM accounts ORDER BY created_at DESC, rowid DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match uid {
            Some(uid) => {
                debug!("Restored account {}", uid);
                self.get(&uid)
            }
            None => self.sign_in_anonymously(),
        }
    }

    pub fn get(&self, uid: &str) -> Result<Account> {
        let account = self
            .conn
            .query_row(
                "SELECT uid, is_anonymous, linked_account_type, created_at FROM accounts WHERE uid = ?1",
                params![uid],
                |row| {
                    let created_at_str: String = row.get(3)?;
                    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());
                    Ok(Account {
                        uid: row.get(0)?,
                        is_anonymous: row.get(1)?,
                        linked_account_type: row.get(2)?,
                        created_at,
                    })
                },
            )
            .optional()?;

        account.ok_or_else(|| Error::NotFound(format!("account {}", uid)))
    }

    /// Upgrade an anonymous account by linking `provider` (e.g. `google`).
    ///
    /// The uid is kept, so cards created anonymously stay with the account.
    pub fn link_account(&self, uid: &str, provider: &str) -> Result<Account> {
        let provider = provider.trim();
        if provider.is_empty() {
            return Err(Error::ValidationFailed("provider is required".to_string()));
        }

        let account = self.get(uid)?;
        if let Some(existing) = &account.linked_account_type {
            return Err(Error::ValidationFailed(format!(
                "account {} is already linked to {}",
                uid, existing
            )));
        }

        self.conn.execute(
            "UPDATE accounts SET is_anonymous = 0, linked_account_type = ?2 WHERE uid = ?1",
            params![uid, provider],
        )?;

        debug!("Linked account {} with {}", uid, provider);
        Ok(Account {
            is_anonymous: false,
            linked_account_type: Some(provider.to_string()),
            ..account
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_sign_in() -> Result<()> {
        let store = AccountStore::in_memory()?;
        let account = store.sign_in_anonymously()?;
        assert!(account.is_anonymous);
        assert_eq!(store.get(&account.uid)?, account);
        Ok(())
    }

    #[test]
    fn test_link_upgrades_in_place() -> Result<()> {
        let store = AccountStore::in_memory()?;
        let account = store.sign_in_anonymously()?;

        let linked = store.link_account(&account.uid, "google")?;
        assert_eq!(linked.uid, account.uid);
        assert!(!linked.is_anonymous);
        assert_eq!(linked.linked_account_type.as_deref(), Some("google"));
        assert_eq!(store.get(&account.uid)?, linked);
        Ok(())
    }

    #[test]
    fn test_link_twice_rejected() -> Result<()> {
        let store = AccountStore::in_memory()?;
        let account = store.sign_in_anonymously()?;
        store.link_account(&account.uid, "google")?;

        assert!(matches!(
            store.link_account(&account.uid, "apple"),
            Err(Error::ValidationFailed(_))
        ));
        Ok(())
    }

    #[test]
    fn test_restore_reuses_existing_account() -> Result<()> {
        let store = AccountStore::in_memory()?;
        let first = store.restore_or_sign_in()?;
        let again = store.restore_or_sign_in()?;
        assert_eq!(first.uid, again.uid);
        Ok(())
    }

    #[test]
    fn test_unknown_account() -> Result<()> {
        let store = AccountStore::in_memory()?;
        assert!(matches!(store.get("ghost"), Err(Error::NotFound(_))));
        assert!(matches!(store.link_account("ghost", "google"), Err(Error::NotFound(_))));
        Ok(())
    }
}
