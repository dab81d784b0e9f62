use std::sync::Arc;

use crate::{auth::JwtSettings, store::Store};

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt: JwtSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt: JwtSettings) -> Self {
        Self { store, jwt }
    }
}
