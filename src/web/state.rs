//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::notify::Notifier;
use crate::web::schema::SchemaGuard;

pub struct AppState {
    /// Database file; every submission opens its own connection to it.
    pub db_path: PathBuf,
    pub notifier: Arc<dyn Notifier>,
    pub schema: SchemaGuard,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(db_path: PathBuf, notifier: Arc<dyn Notifier>) -> SharedState {
        let schema = SchemaGuard::new(db_path.clone());
        Arc::new(Self {
            db_path,
            notifier,
            schema,
        })
    }
}
