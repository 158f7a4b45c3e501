use std::sync::Arc;

use crate::application::services::RelayService;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub relay_service: Arc<RelayService>,
    pub settings: Settings,
}
