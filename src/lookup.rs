//! Flight lookup: fetch the state-vector feed, normalize, filter by term.

use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::data::{FlightRecord, FlightView, StateSnapshot};
use crate::error::{Error, NotFound, Result};
use crate::sources::{HttpClient, ReqwestClient, ResponseCache, SourceProvider};

/// A validated, non-blank search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    needle: String,
}

impl SearchTerm {
    /// # Errors
    ///
    /// [`Error::Validation`] when the term is absent, empty or only whitespace.
    pub fn parse(term: Option<&str>) -> Result<Self> {
        let raw = term.map(str::trim).filter(|t| !t.is_empty()).ok_or(Error::Validation)?;
        Ok(Self { raw: raw.to_string(), needle: raw.to_uppercase() })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, record: &FlightRecord) -> bool {
        record.matches(&self.needle)
    }
}

/// Records of `records` matching `term`, in their original order.
pub fn filter_records<'a>(records: &'a [FlightRecord], term: &SearchTerm) -> Vec<&'a FlightRecord> {
    records.iter()
        .filter(|record| {
            let is_match = term.matches(record);
            trace!(callsign = %record.callsign, icao24 = %record.icao24, term = term.as_str(), is_match, "Checking flight");
            is_match
        })
        .collect()
}

/// The fetcher and normalizer behind `GET /api/flight`.  Holds no per-call
/// state apart from the optional response cache.
pub struct FlightLookup {
    provider: SourceProvider,
    http: Arc<dyn HttpClient>,
    cache: Option<ResponseCache>,
}

impl std::fmt::Debug for FlightLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightLookup")
            .field("provider", &self.provider)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl FlightLookup {
    pub fn new(provider: SourceProvider, http: Arc<dyn HttpClient>, cache: Option<ResponseCache>) -> Self {
        Self { provider, http, cache }
    }

    /// Build the production lookup: reqwest client, system clock, cache per config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Arc::new(ReqwestClient::new(config.upstream_timeout())?);
        Ok(Self::with_client(config, http, Arc::new(SystemClock)))
    }

    /// Lookup per `config` using the given HTTP client and clock.
    pub fn with_client(config: &Config, http: Arc<dyn HttpClient>, clock: Arc<dyn Clock>) -> Self {
        let provider = SourceProvider::from_config(&config.upstream, config.cache.enabled);
        debug!(base_url = %config.upstream.base_url, authenticated = provider.is_authenticated(), "Configured flight-state source");
        let cache = config.cache.enabled
            .then(|| ResponseCache::new(config.cache_ttl(), config.cache.max_entries, clock));
        Self::new(provider, http, cache)
    }

    /// Look up flights whose callsign or ICAO24 code contains `term`.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a missing or blank term, before any fetch
    /// - [`Error::Upstream`] / [`Error::MalformedFeed`] when the feed fails
    /// - [`Error::NotFound`] when the feed is empty or nothing matches
    pub async fn search(&self, term: Option<&str>) -> Result<Vec<FlightView>> {
        let term = SearchTerm::parse(term)?;
        let snapshot = self.fetch_snapshot().await?;

        if snapshot.is_empty() {
            info!(term = term.as_str(), "Feed carried no state vectors");
            return Err(Error::NotFound(NotFound::NoActiveFlights));
        }

        let records = snapshot.state_vectors().iter()
            .map(FlightRecord::from)
            .collect::<Vec<FlightRecord>>();
        debug!(total = records.len(), feed_time = ?snapshot.time, "Normalized state vectors");

        let matches = filter_records(&records, &term);
        debug!(term = term.as_str(), matches = matches.len(), "Filtered flights");

        if matches.is_empty() {
            return Err(Error::NotFound(NotFound::NoMatch));
        }

        Ok(matches.into_iter().map(FlightView::from).collect())
    }

    async fn fetch_snapshot(&self) -> Result<StateSnapshot> {
        let source = self.provider.source_state_vectors();
        let cache = self.cache.as_ref().filter(|_| source.should_use_cache());

        if let Some(body) = cache.and_then(|c| c.get(source.cache_key())) {
            debug!(url = source.url(), "Using cached feed response");
            return Ok(StateSnapshot::parse(&body)?);
        }

        let body = self.http.get(&source).await?;
        let snapshot = StateSnapshot::parse(&body)?;
        if let Some(cache) = cache {
            cache.insert(source.cache_key(), body);
        }
        Ok(snapshot)
    }
}
