//! crates/blog_core/src/identity.rs
//!
//! The identity store: owns user accounts, their sealed secrets, and the
//! single active session. The session is written through to durable storage
//! on every change, so in-memory and persisted state never disagree.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Credential, User};
use crate::error::{StoreError, StoreResult};
use crate::ports::{BackendLink, PortError, SecretVerifier, SessionStorage};
use crate::sync::{lock, BusyFlag};

/// The durable record key holding the serialized active user.
pub const SESSION_KEY: &str = "user";

#[derive(Default)]
struct Accounts {
    users: Vec<User>,
    // keyed by email, case-sensitive
    credentials: HashMap<String, Credential>,
}

/// Owner of user identity and the session lifecycle.
///
/// Construct once with [`IdentityStore::open`] and share by reference.
/// `register` and `authenticate` raise the busy flag while they wait on the
/// backend; see [`BusyFlag`] for why that does not serialize callers.
pub struct IdentityStore {
    storage: Arc<dyn SessionStorage>,
    link: Arc<dyn BackendLink>,
    secrets: Arc<dyn SecretVerifier>,
    accounts: Mutex<Accounts>,
    session: Mutex<Option<User>>,
    busy: BusyFlag,
}

impl IdentityStore {
    /// Creates the store and restores any session left in `storage`.
    ///
    /// A record that does not parse as a user is ignored with a warning and
    /// the store starts unauthenticated.
    pub async fn open(
        storage: Arc<dyn SessionStorage>,
        link: Arc<dyn BackendLink>,
        secrets: Arc<dyn SecretVerifier>,
    ) -> StoreResult<Self> {
        let restored = match storage.read(SESSION_KEY).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!(user_id = %user.id, "Restored persisted session");
                    Some(user)
                }
                Err(e) => {
                    warn!("Ignoring malformed session record: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            storage,
            link,
            secrets,
            accounts: Mutex::new(Accounts::default()),
            session: Mutex::new(restored),
            busy: BusyFlag::default(),
        })
    }

    /// Creates an account and signs it in.
    pub async fn register(&self, name: &str, email: &str, secret: &str) -> StoreResult<User> {
        let _busy = self.busy.raise();
        self.link.round_trip().await?;

        let user = self.enroll(name, email, secret)?;
        if let Err(e) = self.establish(&user).await {
            // No session was recorded, so the account must not be left behind.
            self.withdraw(&user);
            return Err(e);
        }
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Signs in an existing account.
    ///
    /// Unknown email and wrong secret are deliberately indistinguishable.
    pub async fn authenticate(&self, email: &str, secret: &str) -> StoreResult<User> {
        let _busy = self.busy.raise();
        self.link.round_trip().await?;

        let credential = lock(&self.accounts).credentials.get(email).cloned();
        // Verification can be slow, so it runs without holding the accounts lock.
        let matched = credential
            .filter(|credential| self.secrets.verify(secret, &credential.sealed_secret))
            .and_then(|credential| {
                lock(&self.accounts)
                    .users
                    .iter()
                    .find(|user| user.id == credential.user_id)
                    .cloned()
            });

        let Some(user) = matched else {
            warn!("Rejected sign-in attempt");
            return Err(StoreError::InvalidCredentials);
        };

        self.establish(&user).await?;
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// The signed-in user, if any.
    pub fn current_session(&self) -> Option<User> {
        lock(&self.session).clone()
    }

    /// Signs out, deleting the persisted record first.
    pub async fn end_session(&self) -> StoreResult<()> {
        self.storage.remove(SESSION_KEY).await?;
        if let Some(user) = lock(&self.session).take() {
            info!(user_id = %user.id, "Signed out");
        }
        Ok(())
    }

    /// Adds an account without signing it in.
    pub fn enroll(&self, name: &str, email: &str, secret: &str) -> StoreResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
        };
        self.import(user.clone(), secret)?;
        Ok(user)
    }

    /// Adds an account whose id was assigned elsewhere, such as seeded data
    /// that must keep matching a session persisted by an earlier run.
    pub fn import(&self, user: User, secret: &str) -> StoreResult<()> {
        let sealed_secret = self.secrets.seal(secret)?;

        let mut accounts = lock(&self.accounts);
        if accounts.credentials.contains_key(&user.email) {
            warn!("Registration refused for an email already in use");
            return Err(StoreError::DuplicateEmail(user.email));
        }
        if accounts.users.iter().any(|existing| existing.id == user.id) {
            return Err(PortError::Unexpected(format!("user id {} already exists", user.id)).into());
        }

        accounts.credentials.insert(
            user.email.clone(),
            Credential {
                user_id: user.id,
                sealed_secret,
            },
        );
        accounts.users.push(user);
        Ok(())
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        lock(&self.accounts)
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned()
    }

    /// Whether a `register` or `authenticate` call is waiting on the backend.
    pub fn is_busy(&self) -> bool {
        self.busy.is_raised()
    }

    fn withdraw(&self, user: &User) {
        let mut accounts = lock(&self.accounts);
        accounts.credentials.remove(&user.email);
        accounts.users.retain(|existing| existing.id != user.id);
    }

    async fn establish(&self, user: &User) -> StoreResult<()> {
        let record =
            serde_json::to_string(user).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.storage.write(SESSION_KEY, &record).await?;
        *lock(&self.session) = Some(user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::test_support::{BrokenStorage, FailsFirstWrite, GatedLink};
    use crate::memory::{ImmediateLink, InMemorySessionStorage, PlaintextSecrets};
    use std::sync::{OnceLock, Weak};

    async fn open_over(storage: Arc<dyn SessionStorage>) -> IdentityStore {
        IdentityStore::open(storage, Arc::new(ImmediateLink), Arc::new(PlaintextSecrets))
            .await
            .unwrap()
    }

    async fn fresh() -> (IdentityStore, Arc<InMemorySessionStorage>) {
        let storage = Arc::new(InMemorySessionStorage::new());
        (open_over(storage.clone()).await, storage)
    }

    #[tokio::test]
    async fn register_signs_in_and_persists_the_session() {
        let (store, storage) = fresh().await;

        let ann = store.register("Ann", "ann@x.com", "pw1").await.unwrap();

        assert_eq!(ann.name, "Ann");
        assert_eq!(store.current_session(), Some(ann.clone()));
        let record = storage.read(SESSION_KEY).await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<User>(&record).unwrap(), ann);
    }

    #[tokio::test]
    async fn duplicate_email_is_refused_and_session_untouched() {
        let (store, storage) = fresh().await;
        let ann = store.register("Ann", "ann@x.com", "pw1").await.unwrap();

        let err = store.register("Impostor", "ann@x.com", "pw2").await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateEmail(ref email) if email == "ann@x.com"));
        assert_eq!(store.current_session(), Some(ann.clone()));
        let record = storage.read(SESSION_KEY).await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<User>(&record).unwrap(), ann);
    }

    #[tokio::test]
    async fn email_keys_are_case_sensitive() {
        let (store, _) = fresh().await;
        store.register("Ann", "ann@x.com", "pw1").await.unwrap();

        let other = store.register("Ann", "Ann@x.com", "pw1").await.unwrap();
        assert_eq!(other.email, "Ann@x.com");
    }

    #[tokio::test]
    async fn failed_authentication_keeps_the_prior_session() {
        let (store, _) = fresh().await;
        let ann = store.register("Ann", "ann@x.com", "pw1").await.unwrap();
        store.enroll("Bob", "bob@x.com", "pw2").unwrap();

        let wrong_secret = store.authenticate("bob@x.com", "wrong").await.unwrap_err();
        let unknown = store.authenticate("nobody@x.com", "pw2").await.unwrap_err();

        assert!(matches!(wrong_secret, StoreError::InvalidCredentials));
        assert!(matches!(unknown, StoreError::InvalidCredentials));
        assert_eq!(store.current_session(), Some(ann));
    }

    #[tokio::test]
    async fn failed_authentication_without_session_stays_signed_out() {
        let (store, storage) = fresh().await;
        store.enroll("Ann", "ann@x.com", "pw1").unwrap();

        assert!(store.authenticate("ann@x.com", "wrong").await.is_err());
        assert_eq!(store.current_session(), None);
        assert_eq!(storage.read(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn authenticate_switches_the_session() {
        let (store, _) = fresh().await;
        store.register("Ann", "ann@x.com", "pw1").await.unwrap();
        let bob = store.enroll("Bob", "bob@x.com", "pw2").unwrap();

        let signed_in = store.authenticate("bob@x.com", "pw2").await.unwrap();

        assert_eq!(signed_in, bob);
        assert_eq!(store.current_session(), Some(bob));
    }

    #[tokio::test]
    async fn end_session_clears_memory_and_record() {
        let (store, storage) = fresh().await;
        store.register("Ann", "ann@x.com", "pw1").await.unwrap();

        store.end_session().await.unwrap();

        assert_eq!(store.current_session(), None);
        assert_eq!(storage.read(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn session_survives_reopening_over_the_same_storage() {
        let storage = Arc::new(InMemorySessionStorage::new());
        let ann = open_over(storage.clone())
            .await
            .register("Ann", "ann@x.com", "pw1")
            .await
            .unwrap();

        let reopened = open_over(storage).await;
        assert_eq!(reopened.current_session(), Some(ann));
    }

    #[tokio::test]
    async fn malformed_record_opens_unauthenticated() {
        let storage = Arc::new(InMemorySessionStorage::with_record(SESSION_KEY, "not json"));
        let store = open_over(storage).await;
        assert_eq!(store.current_session(), None);
    }

    #[tokio::test]
    async fn storage_failure_leaves_memory_unchanged() {
        let store = open_over(Arc::new(BrokenStorage)).await;

        let err = store.register("Ann", "ann@x.com", "pw1").await.unwrap_err();

        assert!(matches!(err, StoreError::Port(_)));
        assert_eq!(store.current_session(), None);
        assert_eq!(store.find_by_email("ann@x.com"), None);
    }

    #[tokio::test]
    async fn register_can_be_retried_after_a_failed_session_write() {
        let storage = Arc::new(FailsFirstWrite::default());
        let store = open_over(storage.clone()).await;

        let first = store.register("Ann", "ann@x.com", "pw1").await;
        assert!(matches!(first, Err(StoreError::Port(_))));
        assert_eq!(store.find_by_email("ann@x.com"), None);

        let ann = store.register("Ann", "ann@x.com", "pw1").await.unwrap();
        assert_eq!(store.find_by_email("ann@x.com"), Some(ann.clone()));
        assert_eq!(store.current_session(), Some(ann.clone()));
        let record = storage.read(SESSION_KEY).await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<User>(&record).unwrap(), ann);
    }

    #[tokio::test]
    async fn import_keeps_the_given_id_and_rejects_reuse() {
        let (store, _) = fresh().await;
        let demo = User {
            id: Uuid::from_u128(1),
            email: "demo@example.com".to_string(),
            name: "Demo User".to_string(),
        };
        store.import(demo.clone(), "password123").unwrap();

        let signed_in = store.authenticate("demo@example.com", "password123").await.unwrap();
        assert_eq!(signed_in, demo);

        let same_id = User {
            email: "other@example.com".to_string(),
            ..demo
        };
        assert!(matches!(store.import(same_id, "pw"), Err(StoreError::Port(_))));
    }

    #[tokio::test]
    async fn busy_flag_is_lowered_after_each_call() {
        let (store, _) = fresh().await;
        store.register("Ann", "ann@x.com", "pw1").await.unwrap();
        let _ = store.authenticate("ann@x.com", "nope").await;
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn busy_while_waiting_on_the_backend_without_blocking_others() {
        let link = Arc::new(GatedLink::closed());
        let store = Arc::new(
            IdentityStore::open(
                Arc::new(InMemorySessionStorage::new()),
                link.clone(),
                Arc::new(PlaintextSecrets),
            )
            .await
            .unwrap(),
        );
        store.enroll("Bob", "bob@x.com", "pw2").unwrap();

        let registering = tokio::spawn({
            let store = store.clone();
            async move { store.register("Ann", "ann@x.com", "pw1").await }
        });
        let signing_in = tokio::spawn({
            let store = store.clone();
            async move { store.authenticate("bob@x.com", "pw2").await }
        });

        link.wait_for(2).await;
        assert!(store.is_busy());
        assert_eq!(store.current_session(), None);

        link.release(2);
        let ann = registering.await.unwrap().unwrap();
        let bob = signing_in.await.unwrap().unwrap();

        assert!(!store.is_busy());
        assert_eq!(store.find_by_email("ann@x.com"), Some(ann));
        assert_eq!(bob.email, "bob@x.com");
        assert!(store.current_session().is_some());
    }

    /// Looks the account up again while verifying, which needs the accounts
    /// lock to be free.
    #[derive(Default)]
    struct LookupDuringVerify {
        store: OnceLock<Weak<IdentityStore>>,
    }

    impl SecretVerifier for LookupDuringVerify {
        fn seal(&self, secret: &str) -> crate::ports::PortResult<String> {
            Ok(secret.to_string())
        }

        fn verify(&self, secret: &str, sealed: &str) -> bool {
            let store = self.store.get().and_then(Weak::upgrade);
            store.is_some_and(|store| store.find_by_email("ann@x.com").is_some()) && secret == sealed
        }
    }

    #[tokio::test]
    async fn secrets_are_verified_outside_the_accounts_lock() {
        let secrets = Arc::new(LookupDuringVerify::default());
        let store = Arc::new(
            IdentityStore::open(
                Arc::new(InMemorySessionStorage::new()),
                Arc::new(ImmediateLink),
                secrets.clone(),
            )
            .await
            .unwrap(),
        );
        let _ = secrets.store.set(Arc::downgrade(&store));
        let ann = store.enroll("Ann", "ann@x.com", "pw1").unwrap();

        assert_eq!(store.authenticate("ann@x.com", "pw1").await.unwrap(), ann);
        assert!(matches!(
            store.authenticate("ann@x.com", "nope").await,
            Err(StoreError::InvalidCredentials)
        ));
    }
}
