use std::sync::Arc;

use mongodb::Database;
use rosterline_config::Settings;
use rosterline_services::{
    AuthService, DashboardService,
    dashboard::{Clock, DashboardStore, MongoStore, SystemClock},
};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        Self::with_store(Arc::new(MongoStore::new(&db)), Arc::new(SystemClock), settings)
    }

    pub fn with_store(
        store: Arc<dyn DashboardStore>,
        clock: Arc<dyn Clock>,
        settings: Settings,
    ) -> Self {
        let auth = Arc::new(AuthService::new(&settings.jwt));
        let dashboard = Arc::new(DashboardService::new(
            store,
            settings.dashboard.clone(),
            clock,
        ));

        Self {
            settings,
            auth,
            dashboard,
        }
    }
}
