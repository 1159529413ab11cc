//! Session lifecycle service.
//!
//! Owns the current login identity: restoring it from storage at startup,
//! exchanging an email for a fresh identity at login, and clearing both the
//! in-memory and the persisted copy at logout.

use std::sync::Arc;
use tokio::sync::RwLock;
use zyppy_core::api::StorefrontApi;
use zyppy_core::error::{Result, ZyppyError};
use zyppy_core::session::{Session, SessionRepository};

/// Use case service for the login identity.
///
/// The current session lives behind an `RwLock` so screen code and the
/// background payment poller can both read it. Persistence failures are
/// never surfaced to the user: a session that cannot be written still works
/// for the rest of the process, and a record that cannot be read is treated
/// as being logged out.
pub struct SessionService {
    /// Repository for the persisted identity
    repository: Arc<dyn SessionRepository>,
    /// Backend API for the login exchange
    api: Arc<dyn StorefrontApi>,
    /// The identity all screens share
    current: RwLock<Option<Session>>,
}

impl SessionService {
    /// Creates a new `SessionService` instance.
    pub fn new(repository: Arc<dyn SessionRepository>, api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            repository,
            api,
            current: RwLock::new(None),
        }
    }

    /// Restores the persisted identity, if a well-formed one exists.
    ///
    /// A missing record leaves the user logged out; a malformed or
    /// unreadable record does the same, with a warning, instead of failing
    /// startup.
    pub async fn restore(&self) -> Option<Session> {
        match self.repository.load().await {
            Ok(Some(session)) => {
                tracing::info!("[SessionService] Restored session for {}", session.email);
                *self.current.write().await = Some(session.clone());
                Some(session)
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(
                    "[SessionService] Ignoring unreadable persisted session: {err:#}"
                );
                None
            }
        }
    }

    /// Logs in with an email address.
    ///
    /// The backend creates the account on first login. On success the
    /// session becomes current and is persisted; on failure the session
    /// state is left exactly as it was so the caller can retry.
    pub async fn login(&self, email: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ZyppyError::validation("Email must not be empty"));
        }

        let session = self.api.login(email).await?;

        if let Err(err) = self.repository.save(&session).await {
            tracing::warn!("[SessionService] Failed to persist session: {err:#}");
        }
        *self.current.write().await = Some(session.clone());
        tracing::info!("[SessionService] Logged in as {}", session.email);
        Ok(session)
    }

    /// Logs out: clears the in-memory session and removes the persisted
    /// copy. No server round-trip is involved.
    pub async fn logout(&self) {
        *self.current.write().await = None;
        if let Err(err) = self.repository.clear().await {
            tracing::warn!("[SessionService] Failed to remove persisted session: {err:#}");
        }
        tracing::info!("[SessionService] Logged out");
    }

    /// The current session, if logged in.
    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// The current session, or a validation error for screens that require
    /// a login.
    pub async fn require_current(&self) -> Result<Session> {
        self.current()
            .await
            .ok_or_else(|| ZyppyError::validation("Login required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use zyppy_core::catalog::{MenuItem, Restaurant};
    use zyppy_core::order::{Order, OrderRequest, Review, ReviewRequest};
    use zyppy_core::payment::{PaymentSession, PaymentStatus};

    // Mock SessionRepository for testing
    struct MockSessionRepository {
        stored: Mutex<Option<Session>>,
        fail_load: bool,
    }

    impl MockSessionRepository {
        fn new() -> Self {
            Self {
                stored: Mutex::new(None),
                fail_load: false,
            }
        }

        fn with_session(session: Session) -> Self {
            Self {
                stored: Mutex::new(Some(session)),
                fail_load: false,
            }
        }

        fn failing_load() -> Self {
            Self {
                stored: Mutex::new(None),
                fail_load: true,
            }
        }
    }

    #[async_trait]
    impl SessionRepository for MockSessionRepository {
        async fn load(&self) -> anyhow::Result<Option<Session>> {
            if self.fail_load {
                anyhow::bail!("corrupt record");
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn save(&self, session: &Session) -> anyhow::Result<()> {
            *self.stored.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        async fn clear(&self) -> anyhow::Result<()> {
            *self.stored.lock().unwrap() = None;
            Ok(())
        }
    }

    // Mock StorefrontApi for testing; only login is exercised here
    struct MockApi {
        login_calls: AtomicUsize,
        fail_login: bool,
    }

    impl MockApi {
        fn new() -> Self {
            Self {
                login_calls: AtomicUsize::new(0),
                fail_login: false,
            }
        }

        fn failing() -> Self {
            Self {
                login_calls: AtomicUsize::new(0),
                fail_login: true,
            }
        }
    }

    #[async_trait]
    impl StorefrontApi for MockApi {
        async fn login(&self, email: &str) -> Result<Session> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_login {
                return Err(ZyppyError::transport("connection refused"));
            }
            Ok(Session {
                id: "user-1".to_string(),
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                phone: None,
                address: None,
                created_at: None,
            })
        }

        async fn restaurants(
            &self,
            _search: Option<&str>,
            _cuisine: Option<&str>,
        ) -> Result<Vec<Restaurant>> {
            unimplemented!("not used in these tests")
        }

        async fn restaurant(&self, _restaurant_id: &str) -> Result<Restaurant> {
            unimplemented!("not used in these tests")
        }

        async fn menu(
            &self,
            _restaurant_id: &str,
            _category: Option<&str>,
        ) -> Result<Vec<MenuItem>> {
            unimplemented!("not used in these tests")
        }

        async fn search_food(&self, _query: &str) -> Result<Vec<MenuItem>> {
            unimplemented!("not used in these tests")
        }

        async fn create_order(&self, _request: &OrderRequest) -> Result<Order> {
            unimplemented!("not used in these tests")
        }

        async fn order(&self, _order_id: &str) -> Result<Order> {
            unimplemented!("not used in these tests")
        }

        async fn user_orders(&self, _user_id: &str) -> Result<Vec<Order>> {
            unimplemented!("not used in these tests")
        }

        async fn create_checkout(
            &self,
            _order_id: &str,
            _origin_url: &str,
        ) -> Result<PaymentSession> {
            unimplemented!("not used in these tests")
        }

        async fn payment_status(&self, _session_id: &str) -> Result<PaymentStatus> {
            unimplemented!("not used in these tests")
        }

        async fn create_review(&self, _request: &ReviewRequest) -> Result<Review> {
            unimplemented!("not used in these tests")
        }

        async fn restaurant_reviews(&self, _restaurant_id: &str) -> Result<Vec<Review>> {
            unimplemented!("not used in these tests")
        }
    }

    fn persisted_session() -> Session {
        Session {
            id: "user-9".to_string(),
            name: "carol".to_string(),
            email: "carol@example.com".to_string(),
            phone: None,
            address: Some("9 Bar Ave".to_string()),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_restore_with_persisted_session() {
        let repository = Arc::new(MockSessionRepository::with_session(persisted_session()));
        let service = SessionService::new(repository, Arc::new(MockApi::new()));

        let restored = service.restore().await;

        assert_eq!(restored, Some(persisted_session()));
        assert_eq!(service.current().await, Some(persisted_session()));
    }

    #[tokio::test]
    async fn test_restore_without_record_stays_logged_out() {
        let service = SessionService::new(
            Arc::new(MockSessionRepository::new()),
            Arc::new(MockApi::new()),
        );

        assert_eq!(service.restore().await, None);
        assert_eq!(service.current().await, None);
    }

    #[tokio::test]
    async fn test_restore_treats_malformed_record_as_logged_out() {
        let service = SessionService::new(
            Arc::new(MockSessionRepository::failing_load()),
            Arc::new(MockApi::new()),
        );

        assert_eq!(service.restore().await, None);
        assert_eq!(service.current().await, None);
    }

    #[tokio::test]
    async fn test_login_sets_current_and_persists() {
        let repository = Arc::new(MockSessionRepository::new());
        let service = SessionService::new(repository.clone(), Arc::new(MockApi::new()));

        let session = service.login("dave@example.com").await.unwrap();

        assert_eq!(session.name, "dave");
        assert_eq!(service.current().await, Some(session.clone()));
        assert_eq!(*repository.stored.lock().unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_unset() {
        let repository = Arc::new(MockSessionRepository::new());
        let service = SessionService::new(repository.clone(), Arc::new(MockApi::failing()));

        let err = service.login("dave@example.com").await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(service.current().await, None);
        assert_eq!(*repository.stored.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_rejects_blank_email_before_any_call() {
        let api = Arc::new(MockApi::new());
        let service = SessionService::new(Arc::new(MockSessionRepository::new()), api.clone());

        let err = service.login("   ").await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(api.login_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_storage() {
        let repository = Arc::new(MockSessionRepository::new());
        let service = SessionService::new(repository.clone(), Arc::new(MockApi::new()));
        service.login("dave@example.com").await.unwrap();

        service.logout().await;

        assert_eq!(service.current().await, None);
        assert_eq!(*repository.stored.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn test_require_current_without_login() {
        let service = SessionService::new(
            Arc::new(MockSessionRepository::new()),
            Arc::new(MockApi::new()),
        );

        assert!(service.require_current().await.unwrap_err().is_validation());
    }
}
