//! Presentation client: drives the flight endpoint, tracks what is shown and
//! forwards mint requests to the token contract.

pub mod api;
pub mod contract;
pub mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

pub use api::{FlightApi, HttpFlightApi};
pub use contract::{MintContract, MintReceipt, MintRequest, WalletAddress};
pub use state::{ClientState, SearchPhase, SearchTicket};

use crate::data::FlightView;
use crate::error::{Error, Result};

/// Search and mint front end over injected endpoint and contract bindings.
///
/// The state lock is never held across an await, so a mint can proceed while
/// a search is still loading.
pub struct FlightClient {
    api: Arc<dyn FlightApi>,
    contract: Option<Arc<dyn MintContract>>,
    state: Mutex<ClientState>,
}

impl std::fmt::Debug for FlightClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightClient")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl FlightClient {
    /// A client that can search and select but has no contract to mint with.
    pub fn new(api: Arc<dyn FlightApi>) -> Self {
        Self { api, contract: None, state: Mutex::new(ClientState::new()) }
    }

    #[must_use]
    pub fn with_contract(mut self, contract: Arc<dyn MintContract>) -> Self {
        self.contract = Some(contract);
        self
    }

    fn state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> ClientState {
        self.state().clone()
    }

    /// Run a search to completion.  Returns the phase after this search's
    /// response was applied, or the newer phase if the response was stale.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a blank term; nothing is requested.
    pub async fn search(&self, term: &str) -> Result<SearchPhase> {
        let ticket = self.state().begin_search(term)?;
        debug!(?ticket, term, "Search started");

        let outcome = self.api.lookup(term.trim()).await;
        if let Err(e) = &outcome {
            warn!(term, error = %e, "Search failed");
        }

        let mut state = self.state();
        if !state.complete_search(ticket, outcome) {
            debug!(?ticket, "Discarding superseded search response");
        }
        Ok(state.phase().clone())
    }

    /// # Errors
    ///
    /// Fails unless the last search succeeded and `index` is in range.
    pub fn select(&self, index: usize) -> Result<FlightView> {
        self.state().select(index).cloned()
    }

    pub fn selected(&self) -> Option<FlightView> {
        self.state().selected().cloned()
    }

    /// Mint a token for the selected flight's altitude.  Never touches the
    /// search phase; failures are left as the mint notice, success clears it.
    /// The outcome is not shown if a new search started while the mint ran.
    ///
    /// # Errors
    ///
    /// - [`Error::NoSelection`] when no flight is selected
    /// - [`Error::WalletNotConnected`] when `wallet` is `None`; the contract is
    ///   not contacted
    /// - whatever the contract reports for a rejected call
    pub async fn mint(&self, wallet: Option<&WalletAddress>) -> Result<MintReceipt> {
        let (flight, stamp) = {
            let state = self.state();
            (state.selected().cloned().ok_or(Error::NoSelection)?, state.mint_stamp())
        };

        let result = match (wallet, &self.contract) {
            (None, _) => Err(Error::WalletNotConnected),
            (Some(_), None) => Err(Error::MintRejected("no contract binding configured".to_string())),
            (Some(wallet), Some(contract)) => {
                let request = MintRequest::for_flight(wallet.clone(), &flight);
                info!(to = %request.to, altitude = request.altitude, flight = %flight.number, "Submitting mint");
                contract.mint(&request).await
            }
        };

        let notice = result.as_ref().err().map(Error::report);
        if let Some(report) = &notice {
            warn!(error = %report, "Mint failed");
        }
        if !self.state().settle_mint(stamp, notice) {
            debug!("Dropping mint outcome superseded by a newer search");
        }
        result
    }
}
