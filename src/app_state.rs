use crate::auth::AuthService;
use crate::db::Database;
use crate::events::ChangeBus;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: Arc<AuthService>,
    pub events: ChangeBus,
}

impl AppState {
    pub fn init(db: Database, auth: AuthService) -> Self {
        Self {
            db: Arc::new(db),
            auth: Arc::new(auth),
            events: ChangeBus::default(),
        }
    }
}
