//! In-memory stand-ins for the identity provider and the record store.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use taskboard::config::Config;
use taskboard::models::{Board, IdentitySession, IdentityUser, NewUserRecord, UserBoard, UserRecord};
use taskboard::provider::{IdentityProvider, ProviderError, SignIn, SignUp};
use taskboard::store::{RecordStore, StoreError};
use taskboard::AppState;

pub const BACKEND_URL: &str = "https://project.supabase.co";

pub fn test_config() -> Config {
    Config::from_vars(|key| match key {
        "SUPABASE_URL" => Some(BACKEND_URL.to_string()),
        "SUPABASE_KEY" => Some("anon-key".to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn test_state(identity: &Arc<FakeIdentity>, store: &Arc<MemoryStore>) -> AppState {
    state_with_config(test_config(), identity, store)
}

pub fn state_with_config(
    config: Config,
    identity: &Arc<FakeIdentity>,
    store: &Arc<MemoryStore>,
) -> AppState {
    AppState::new(
        config,
        identity.clone() as Arc<dyn IdentityProvider>,
        store.clone() as Arc<dyn RecordStore>,
    )
}

struct Account {
    password: String,
    user: IdentityUser,
}

/// Identity provider holding accounts and issued tokens in memory.
#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    tokens: Mutex<HashMap<String, IdentityUser>>,
    failure: Mutex<Option<ProviderError>>,
    next_id: Mutex<Option<Uuid>>,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_account(self: Arc<Self>, email: &str, password: &str) -> Arc<Self> {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: IdentityUser::new(Uuid::new_v4(), email),
            },
        );
        self
    }

    /// Every subsequent call fails with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(ProviderError::new(Some(400), message));
    }

    /// The id the next signup will be given.
    pub fn assign_next_id(&self, id: Uuid) {
        *self.next_id.lock().unwrap() = Some(id);
    }

    /// Issues a token that resolves to a fresh user.
    pub fn issue_token(&self, token: &str) -> IdentityUser {
        let user = IdentityUser::new(Uuid::new_v4(), "holder@x.com");
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), user.clone());
        user
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn session_for(&self, user: &IdentityUser) -> IdentitySession {
        let token = format!("token-{}", user.id);
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), user.clone());
        IdentitySession(json!({
            "access_token": token,
            "token_type": "bearer",
            "expires_in": 3600,
            "user": user,
        }))
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignIn, ProviderError> {
        self.enter()?;
        let user = {
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => {
                    return Err(ProviderError::new(Some(400), "Invalid login credentials"));
                }
            }
        };
        let session = self.session_for(&user);
        Ok(SignIn { user, session })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, ProviderError> {
        self.enter()?;
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(ProviderError::new(Some(422), "User already registered"));
        }
        let id = self.next_id.lock().unwrap().take().unwrap_or_else(Uuid::new_v4);
        let user = IdentityUser::new(id, email);
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        let session = self.session_for(&user);
        Ok(SignUp {
            user,
            session: Some(session),
        })
    }

    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), ProviderError> {
        self.enter()?;
        if let Some(token) = access_token {
            self.tokens.lock().unwrap().remove(token);
        }
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<IdentityUser>, ProviderError> {
        self.enter()?;
        Ok(self.tokens.lock().unwrap().get(access_token).cloned())
    }
}

/// Record store over vectors, enforcing unique emails on insert like the real table.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserRecord>>,
    boards: Mutex<Vec<Board>>,
    memberships: Mutex<Vec<UserBoard>>,
    failure: Mutex<Option<StoreError>>,
    concurrent_writer: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Inserts a row without the uniqueness check, to model pre-existing bad data.
    pub fn seed_user(&self, email: &str) -> UserRecord {
        let record = NewUserRecord::new(email).into_record();
        self.users.lock().unwrap().push(record.clone());
        record
    }

    pub fn seed_board(&self, name: &str, members: &[Uuid]) -> Board {
        let board = Board {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            extra: Default::default(),
        };
        self.boards.lock().unwrap().push(board.clone());
        let mut memberships = self.memberships.lock().unwrap();
        for user_id in members {
            memberships.push(UserBoard {
                user_id: *user_id,
                board_id: board.id,
            });
        }
        board
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(StoreError::Backend(message.to_string()));
    }

    /// Another writer inserts `email` between our read and our insert.
    pub fn race_insert_of(&self, email: &str) {
        *self.concurrent_writer.lock().unwrap() = Some(email.to_string());
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.users.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<UserRecord>, StoreError> {
        self.enter()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.email == email)
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        self.enter()?;
        let mut users = self.users.lock().unwrap();
        if let Some(email) = self.concurrent_writer.lock().unwrap().take() {
            users.push(NewUserRecord::new(email).into_record());
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(
                "duplicate key value violates unique constraint \"users_email_key\"".into(),
            ));
        }
        let record = user.into_record();
        users.push(record.clone());
        Ok(record)
    }

    async fn board_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        self.enter()?;
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.board_id)
            .collect())
    }

    async fn boards_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Board>, StoreError> {
        self.enter()?;
        Ok(self
            .boards
            .lock()
            .unwrap()
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }
}
