use std::sync::RwLock;

/// Access-credential source for the notification client
///
/// The rest of the application owns authentication; the client only asks
/// whether a session is active and for the current access token. The token
/// is sent as a bearer header on REST calls and as a query parameter when
/// opening the stream.
pub trait CredentialProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn token(&self) -> Option<String>;
}

/// Credential provider over an interior-mutable token slot
///
/// Suitable for embedding: the host application stores the token after
/// login and clears it on logout.
pub struct StaticCredentials {
    token: RwLock<Option<String>>,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        StaticCredentials {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// A provider with no token; `is_authenticated` reports false.
    pub fn anonymous() -> Self {
        StaticCredentials {
            token: RwLock::new(None),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }
}
