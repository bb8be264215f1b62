use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, quiz::SessionHandle, services::scores::ScoreStore};

#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
    pub scores: Arc<dyn ScoreStore>,
    pub config: Config,
}

impl FromRef<AppState> for SessionHandle {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ScoreStore> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.scores)
    }
}
