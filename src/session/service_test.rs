use super::*;
use crate::net::types::AuthTokens;
use crate::session::store::MemoryStore;
use std::sync::Mutex;

// =========================================================================
// MockBackend
// =========================================================================

struct MockBackend {
    login_results: Mutex<Vec<Result<LoginResponse, AuthError>>>,
    refresh_results: Mutex<Vec<Result<LoginResponse, AuthError>>>,
    logout_results: Mutex<Vec<Result<ApiStatus, AuthError>>>,
}

impl MockBackend {
    fn new() -> Self {
        Self {
            login_results: Mutex::new(Vec::new()),
            refresh_results: Mutex::new(Vec::new()),
            logout_results: Mutex::new(Vec::new()),
        }
    }

    fn with_login(self, result: Result<LoginResponse, AuthError>) -> Self {
        self.login_results.lock().unwrap().push(result);
        self
    }

    fn with_refresh(self, result: Result<LoginResponse, AuthError>) -> Self {
        self.refresh_results.lock().unwrap().push(result);
        self
    }

    fn with_logout(self, result: Result<ApiStatus, AuthError>) -> Self {
        self.logout_results.lock().unwrap().push(result);
        self
    }
}

#[async_trait::async_trait]
impl AuthBackend for MockBackend {
    async fn login(&self, _credentials: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let mut results = self.login_results.lock().unwrap();
        if results.is_empty() { Ok(make_login_response("u-1")) } else { results.remove(0) }
    }

    async fn refresh(&self, _request: &RefreshTokenRequest) -> Result<LoginResponse, AuthError> {
        let mut results = self.refresh_results.lock().unwrap();
        if results.is_empty() { Ok(make_login_response("u-1")) } else { results.remove(0) }
    }

    async fn logout(&self) -> Result<ApiStatus, AuthError> {
        let mut results = self.logout_results.lock().unwrap();
        if results.is_empty() { Ok(ApiStatus { success: true, message: None }) } else { results.remove(0) }
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn make_user(id: &str) -> AuthUser {
    AuthUser {
        id: id.to_owned(),
        nombres: "Juan Carlos".to_owned(),
        apellidos: "Pérez González".to_owned(),
        email: "juan.perez@municipio.gob.ec".to_owned(),
        rol: "supervisor".to_owned(),
    }
}

fn make_login_response(id: &str) -> LoginResponse {
    LoginResponse {
        success: true,
        message: None,
        data: Some(AuthPayload {
            user: make_user(id),
            tokens: AuthTokens {
                access_token: format!("acc-{id}"),
                refresh_token: format!("ref-{id}"),
            },
        }),
    }
}

fn make_service(backend: MockBackend) -> (SessionService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = SessionService::new(Arc::new(backend), store.clone());
    (service, store)
}

fn make_credentials() -> LoginRequest {
    LoginRequest { email: "juan.perez@municipio.gob.ec".to_owned(), password: "secreto".to_owned() }
}

// =========================================================================
// login
// =========================================================================

#[tokio::test]
async fn login_installs_session_and_emits_once() {
    let (service, store) = make_service(MockBackend::new());
    let mut rx = service.subscribe();
    assert!(rx.borrow().is_none());

    let response = service.login(&make_credentials()).await.unwrap();
    assert!(response.success);

    assert!(service.is_authenticated());
    assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-u-1"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-u-1"));
    let stored: AuthUser = serde_json::from_str(&store.get(CURRENT_USER_KEY).unwrap()).unwrap();
    assert_eq!(stored, make_user("u-1"));

    // Exactly one emission for the login.
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().map(|u| u.id.clone()), Some("u-1".to_owned()));
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn login_failure_leaves_session_untouched() {
    let backend = MockBackend::new().with_login(Err(AuthError::Status { status: 401, body: String::new() }));
    let (service, store) = make_service(backend);
    let rx = service.subscribe();

    let err = service.login(&make_credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Status { status: 401, .. }));

    assert!(!service.is_authenticated());
    assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    assert!(store.get(CURRENT_USER_KEY).is_none());
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn login_response_without_payload_installs_nothing() {
    let backend = MockBackend::new().with_login(Ok(LoginResponse {
        success: false,
        message: Some("credenciales inválidas".to_owned()),
        data: None,
    }));
    let (service, store) = make_service(backend);

    let response = service.login(&make_credentials()).await.unwrap();
    assert!(!response.success);
    assert!(!service.is_authenticated());
    assert!(store.get(ACCESS_TOKEN_KEY).is_none());
}

// =========================================================================
// refresh
// =========================================================================

#[tokio::test]
async fn refresh_replaces_all_three_fields() {
    let backend = MockBackend::new().with_refresh(Ok(make_login_response("u-2")));
    let (service, store) = make_service(backend);
    service.login(&make_credentials()).await.unwrap();

    let request = RefreshTokenRequest { refresh_token: service.refresh_token().unwrap() };
    service.refresh(&request).await.unwrap();

    assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-u-2"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-u-2"));
    assert_eq!(service.current_user().map(|u| u.id), Some("u-2".to_owned()));
}

#[tokio::test]
async fn refresh_failure_keeps_previous_session() {
    let backend = MockBackend::new().with_refresh(Err(AuthError::Request("connection refused".to_owned())));
    let (service, _store) = make_service(backend);
    service.login(&make_credentials()).await.unwrap();

    let request = RefreshTokenRequest { refresh_token: "ref-u-1".to_owned() };
    let err = service.refresh(&request).await.unwrap_err();
    assert!(matches!(err, AuthError::Request(_)));

    assert!(service.is_authenticated());
    assert_eq!(service.current_user().map(|u| u.id), Some("u-1".to_owned()));
}

// =========================================================================
// logout
// =========================================================================

#[tokio::test]
async fn logout_clears_even_when_backend_fails() {
    let backend = MockBackend::new().with_logout(Err(AuthError::Request("connection refused".to_owned())));
    let (service, store) = make_service(backend);
    service.login(&make_credentials()).await.unwrap();
    let mut rx = service.subscribe();

    let result = service.logout().await;
    assert!(result.is_err());

    assert!(!service.is_authenticated());
    assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    assert!(store.get(REFRESH_TOKEN_KEY).is_none());
    assert!(store.get(CURRENT_USER_KEY).is_none());

    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_none());
}

#[tokio::test]
async fn logout_success_clears_and_returns_status() {
    let (service, store) = make_service(MockBackend::new());
    service.login(&make_credentials()).await.unwrap();

    let status = service.logout().await.unwrap();
    assert!(status.success);
    assert!(!service.is_authenticated());
    assert!(store.get(CURRENT_USER_KEY).is_none());
}

// =========================================================================
// rehydration
// =========================================================================

#[tokio::test]
async fn rehydrates_stored_user() {
    let store = Arc::new(MemoryStore::new());
    store.set(ACCESS_TOKEN_KEY, "acc-1");
    store.set(CURRENT_USER_KEY, &serde_json::to_string(&make_user("u-9")).unwrap());

    let service = SessionService::new(Arc::new(MockBackend::new()), store);
    assert!(service.is_authenticated());
    assert_eq!(service.current_user().map(|u| u.id), Some("u-9".to_owned()));
}

#[tokio::test]
async fn rehydrated_user_without_token_is_not_authenticated() {
    // Partial state is representable and deliberately not repaired.
    let store = Arc::new(MemoryStore::new());
    store.set(CURRENT_USER_KEY, &serde_json::to_string(&make_user("u-9")).unwrap());

    let service = SessionService::new(Arc::new(MockBackend::new()), store.clone());
    assert!(service.current_user().is_some());
    assert!(!service.is_authenticated());
    assert!(store.get(CURRENT_USER_KEY).is_some());
}

#[tokio::test]
async fn corrupt_stored_user_wipes_storage_silently() {
    let store = Arc::new(MemoryStore::new());
    store.set(ACCESS_TOKEN_KEY, "x");
    store.set(REFRESH_TOKEN_KEY, "y");
    store.set(CURRENT_USER_KEY, "{not valid json");

    let service = SessionService::new(Arc::new(MockBackend::new()), store.clone());
    assert!(!service.is_authenticated());
    assert!(service.current_user().is_none());
    assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    assert!(store.get(REFRESH_TOKEN_KEY).is_none());
    assert!(store.get(CURRENT_USER_KEY).is_none());
}

#[tokio::test]
async fn empty_store_starts_unauthenticated() {
    let (service, store) = make_service(MockBackend::new());
    assert!(!service.is_authenticated());
    assert!(service.current_user().is_none());
    // Absent user key leaves the store untouched.
    store.set("unrelated", "kept");
    assert_eq!(store.get("unrelated").as_deref(), Some("kept"));
}

// =========================================================================
// queries
// =========================================================================

#[tokio::test]
async fn token_getters_read_through_the_store() {
    let (service, store) = make_service(MockBackend::new());
    assert!(service.access_token().is_none());
    assert!(service.refresh_token().is_none());

    store.set(ACCESS_TOKEN_KEY, "acc-direct");
    store.set(REFRESH_TOKEN_KEY, "ref-direct");
    assert_eq!(service.access_token().as_deref(), Some("acc-direct"));
    assert_eq!(service.refresh_token().as_deref(), Some("ref-direct"));
}

#[tokio::test]
async fn late_subscriber_sees_latest_snapshot() {
    let (service, _store) = make_service(MockBackend::new());
    service.login(&make_credentials()).await.unwrap();

    // Subscribing after the fact replays the current value without a change event.
    let rx = service.subscribe();
    assert_eq!(rx.borrow().as_ref().map(|u| u.id.clone()), Some("u-1".to_owned()));
}
