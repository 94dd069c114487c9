use noted_core::Store;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Credentials protecting the API documentation routes.
#[derive(Clone)]
pub struct DocsAuth {
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AppState {
    /// The document store. rusqlite is a blocking driver, so access is
    /// serialized behind a mutex; each request locks for the duration of
    /// its store calls.
    pub store: Arc<Mutex<Store>>,
    /// When set, `/docs` requires matching Basic credentials.
    pub docs_auth: Option<DocsAuth>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Store, docs_auth: Option<DocsAuth>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            docs_auth,
            started_at: Instant::now(),
        }
    }
}
