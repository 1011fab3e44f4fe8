//! Short-lived authorization code cache.
//!
//! Codes bind an approved {user, organization, client} scope, plus an
//! optional PKCE challenge, for the ten minutes between consent and
//! token exchange. Entries live in memory only: a restart invalidates
//! in-flight authorizations and the client retries the flow from
//! scratch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;

use super::pkce::{self, CodeChallengeMethod};
use super::tokens::generate_token;

/// Lifetime of an authorization code in seconds (10 minutes).
pub const CODE_TTL_SECS: i64 = 600;

/// Scope bound to an authorization code between approval and exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationCodeEntry {
    pub user_id: uuid::Uuid,
    pub organization_id: uuid::Uuid,
    pub client_name: String,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<CodeChallengeMethod>,
    pub expires_at: DateTime<Utc>,
}

/// Exchange failures. All map to `invalid_grant` on the wire; the client
/// recovers by restarting the flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeExchangeError {
    #[error("Authorization code not found")]
    CodeNotFound,

    #[error("Authorization code expired")]
    CodeExpired,

    #[error("PKCE verification failed")]
    PkceMismatch,
}

/// Backing store for pending authorization codes.
///
/// The in-process default is a concurrent map; a multi-node deployment
/// can substitute a shared TTL store. Whatever the backend, `take` must
/// remove and return the entry as one atomic step — that removal is what
/// makes codes single-use under concurrent exchange attempts.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Store an entry under its code.
    async fn insert(&self, code: String, entry: AuthorizationCodeEntry);

    /// Atomically remove and return the entry for `code`.
    async fn take(&self, code: &str) -> Option<AuthorizationCodeEntry>;

    /// Evict entries past their expiry.
    async fn purge_expired(&self);
}

/// In-memory `CodeStore` on a concurrent map.
#[derive(Default)]
pub struct MemoryCodeStore {
    entries: DashMap<String, AuthorizationCodeEntry>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn insert(&self, code: String, entry: AuthorizationCodeEntry) {
        self.entries.insert(code, entry);
    }

    async fn take(&self, code: &str) -> Option<AuthorizationCodeEntry> {
        self.entries.remove(code).map(|(_, entry)| entry)
    }

    async fn purge_expired(&self) {
        let now = Utc::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }
}

/// Parameters for minting an authorization code.
#[derive(Debug, Clone)]
pub struct CreateCodeParams {
    pub user_id: uuid::Uuid,
    pub organization_id: uuid::Uuid,
    pub client_name: String,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<CodeChallengeMethod>,
}

/// Authorization code cache over an injectable store.
pub struct AuthCodeCache {
    store: Arc<dyn CodeStore>,
}

impl AuthCodeCache {
    pub fn new(store: Arc<dyn CodeStore>) -> Self {
        Self { store }
    }

    /// Cache backed by the default in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCodeStore::new()))
    }

    /// Mint a fresh code bound to the given scope. Returns the raw code.
    pub async fn create_authorization_code(&self, params: CreateCodeParams) -> String {
        let code = generate_token();
        let entry = AuthorizationCodeEntry {
            user_id: params.user_id,
            organization_id: params.organization_id,
            client_name: params.client_name,
            code_challenge: params.code_challenge,
            code_challenge_method: params.code_challenge_method,
            expires_at: Utc::now() + chrono::Duration::seconds(CODE_TTL_SECS),
        };
        self.store.insert(code.clone(), entry).await;
        code
    }

    /// Consume a code, enforcing single use, expiry, and PKCE.
    ///
    /// The removal is the claim: of two concurrent exchanges for the same
    /// code, exactly one gets the entry and the other sees `CodeNotFound`.
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        verifier: Option<&str>,
    ) -> Result<AuthorizationCodeEntry, CodeExchangeError> {
        let entry = self
            .store
            .take(code)
            .await
            .ok_or(CodeExchangeError::CodeNotFound)?;

        if entry.expires_at <= Utc::now() {
            return Err(CodeExchangeError::CodeExpired);
        }

        if let Some(challenge) = &entry.code_challenge {
            // Absent method defaults to plain per RFC 7636 §4.3
            let method = entry
                .code_challenge_method
                .unwrap_or(CodeChallengeMethod::Plain);
            match verifier {
                Some(v) if pkce::verify_code_challenge(v, challenge, method) => {}
                _ => return Err(CodeExchangeError::PkceMismatch),
            }
        }

        Ok(entry)
    }

    /// Evict expired entries.
    pub async fn purge_expired(&self) {
        self.store.purge_expired().await;
    }

    /// Spawn a periodic eviction task.
    pub fn spawn_cleanup_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                cache.purge_expired().await;
            }
        })
    }
}
