use crate::auth::TokenCodec;
use crate::config::Settings;
use crate::upstream::{ClientBuildError, UniversityClient};
use std::sync::Arc;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub settings: Arc<Settings>,
    pub tokens: Arc<TokenCodec>,
    pub university: Arc<UniversityClient>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, ClientBuildError> {
        let university = UniversityClient::new(&settings.upstream)?;
        let tokens = TokenCodec::new(&settings.jwt.secret);
        Ok(Self {
            settings: Arc::new(settings),
            tokens: Arc::new(tokens),
            university: Arc::new(university),
        })
    }

    #[cfg(test)]
    pub fn for_testing(settings: &Settings) -> Self {
        Self::new(settings.clone()).expect("Failed to create test state")
    }
}
