use crate::config::UpstreamConfig;

const STATE_VECTORS_PATH: &str = "/states/all";

/// HTTP basic credentials for the flight-state feed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SourceProvider {
    base_url: String,
    cred: Option<Credentials>,
    use_cache: bool,
}

/// A resolved upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    url: String,
    cred: Option<Credentials>,
    use_cache: bool,
}

impl SourceProvider {
    pub fn new(base_url: impl Into<String>, cred: Option<Credentials>, use_cache: bool) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, cred, use_cache }
    }

    pub fn from_config(upstream: &UpstreamConfig, use_cache: bool) -> Self {
        let cred = match (&upstream.username, &upstream.password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };
        Self::new(upstream.base_url.clone(), cred, use_cache)
    }

    pub fn is_authenticated(&self) -> bool { self.cred.is_some() }

    fn source(&self, path: &str) -> Source {
        Source::new(format!("{}{}", self.base_url, path), self.cred.clone(), self.use_cache)
    }

    pub fn source_state_vectors(&self) -> Source {
        self.source(STATE_VECTORS_PATH)
    }
}

impl Source {
    pub fn new(url: String, cred: Option<Credentials>, use_cache: bool) -> Self {
        Self { url, cred, use_cache }
    }

    pub fn url(&self) -> &str { &self.url }
    pub fn credentials(&self) -> Option<&Credentials> { self.cred.as_ref() }
    pub fn should_use_cache(&self) -> bool { self.use_cache }

    /// Responses are cached per request URL; credentials never form part of the key.
    pub fn cache_key(&self) -> &str { &self.url }
}
