//! Card lifecycle management

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use meishi_core::{Error, Result};

use crate::accounts::{Account, AccountStore};
use crate::models::{BusinessCard, Privacy};
use crate::store::CardStore;

/// Async front for the card and account stores
pub struct CardManager {
    /// Card storage (wrapped in Mutex for thread safety)
    store: Arc<Mutex<CardStore>>,
    accounts: Arc<Mutex<AccountStore>>,
}

impl CardManager {
    /// Create a new card manager with a database path
    pub fn new(db_path: &str) -> Result<Self> {
        let store = CardStore::new(db_path)?;
        let accounts = AccountStore::new(db_path)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            accounts: Arc::new(Mutex::new(accounts)),
        })
    }

    /// Create an in-memory card manager (for testing)
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            store: Arc::new(Mutex::new(CardStore::in_memory()?)),
            accounts: Arc::new(Mutex::new(AccountStore::in_memory()?)),
        })
    }

    fn store(&self) -> Result<MutexGuard<'_, CardStore>> {
        self.store
            .lock()
            .map_err(|_| Error::BackendUnavailable("card store lock poisoned".to_string()))
    }

    fn accounts(&self) -> Result<MutexGuard<'_, AccountStore>> {
        self.accounts
            .lock()
            .map_err(|_| Error::BackendUnavailable("account store lock poisoned".to_string()))
    }

    /// Resume the signed-in account or start an anonymous one
    pub async fn current_account(&self) -> Result<Account> {
        self.accounts()?.restore_or_sign_in()
    }

    pub async fn sign_in_anonymously(&self) -> Result<Account> {
        self.accounts()?.sign_in_anonymously()
    }

    pub async fn link_account(&self, uid: &str, provider: &str) -> Result<Account> {
        let account = self.accounts()?.link_account(uid, provider)?;
        info!("Account {} upgraded via {}", uid, provider);
        Ok(account)
    }

    /// Empty card for `account`, carrying its provenance
    pub fn create_draft(&self, account: &Account) -> BusinessCard {
        BusinessCard::draft(&account.uid)
            .with_provenance(account.is_anonymous, account.linked_account_type.clone())
    }

    /// Validate and persist `card` on behalf of `owner`.
    ///
    /// The owner and provenance are stamped onto the card before writing.
    /// Returns the stored card, including its id after a first save.
    pub async fn save(&self, card: BusinessCard, owner: &Account) -> Result<BusinessCard> {
        if let Err(e) = card.validate() {
            warn!("Rejected card save for {}: {}", owner.uid, e);
            return Err(e);
        }

        if let Some(existing) = card.user_id() {
            if existing != owner.uid {
                return Err(Error::ValidationFailed(format!(
                    "card belongs to another account ({})",
                    existing
                )));
            }
        }

        let card = card
            .with_user_id(&owner.uid)
            .with_provenance(owner.is_anonymous, owner.linked_account_type.clone());

        let store = self.store()?;
        if let Some(id) = card.id().filter(|id| !id.trim().is_empty()) {
            match store.get_card(id) {
                Ok(stored) if stored.user_id() != Some(owner.uid.as_str()) => {
                    warn!("Account {} tried to overwrite card {}", owner.uid, id);
                    return Err(Error::ValidationFailed(format!(
                        "card {} belongs to another account",
                        id
                    )));
                }
                Ok(_) | Err(Error::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let saved = store.save_card(&card)?;
        info!("Saved card {} for {}", saved.id().unwrap_or_default(), owner.uid);
        Ok(saved)
    }

    pub async fn load(&self, card_id: &str) -> Result<BusinessCard> {
        self.store()?.get_card(card_id)
    }

    /// Cards owned by `user_id`, most recently updated first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<BusinessCard>> {
        self.store()?.get_user_cards(user_id)
    }

    /// Delete a card owned by `owner`
    pub async fn delete(&self, card_id: &str, owner: &Account) -> Result<()> {
        let store = self.store()?;
        let card = store.get_card(card_id)?;
        if card.user_id() != Some(owner.uid.as_str()) {
            return Err(Error::NotFound(format!("card {}", card_id)));
        }
        store.delete_card(card_id)?;
        info!("Deleted card {}", card_id);
        Ok(())
    }

    /// Save someone else's card into `viewer`'s collection
    pub async fn collect(&self, viewer: &Account, card_id: &str) -> Result<String> {
        // goes through the privacy check so private cards cannot be collected
        self.view_shared(card_id, Some(viewer.uid.as_str())).await?;
        self.store()?.save_to_collection(&viewer.uid, card_id)
    }

    /// Cards in `user_id`'s collection, most recently saved first
    pub async fn collection(&self, user_id: &str) -> Result<Vec<BusinessCard>> {
        self.store()?.get_card_collection(user_id)
    }

    /// Load a card through a share link.
    ///
    /// Private cards are only visible to their owner; everyone else gets
    /// `NotFound`, the same as for a card that does not exist.
    pub async fn view_shared(&self, card_id: &str, viewer: Option<&str>) -> Result<BusinessCard> {
        let card = self.store()?.get_card(card_id)?;
        let is_owner = viewer.is_some() && card.user_id() == viewer;

        if card.privacy() == Privacy::Private && !is_owner {
            debug!("Hid private card {} from {:?}", card_id, viewer);
            return Err(Error::NotFound(format!("card {}", card_id)));
        }
        Ok(card)
    }
}
