//! Search and selection state for the presentation client.
//!
//! Every search is stamped with a ticket. Only the response carrying the
//! latest ticket may complete the search, so a slow earlier response can
//! never overwrite a newer one.

use crate::data::FlightView;
use crate::error::{Error, ErrorReport, Result, TITLE_FETCH_FAILED};

/// Identifies one issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading {
        ticket: SearchTicket,
        term: String,
    },
    Success {
        flights: Vec<FlightView>,
        selection: Option<usize>,
    },
    Failed(ErrorReport),
}

/// Client-side view state: the search phase plus any notice left by the
/// last mint attempt.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    phase: SearchPhase,
    mint_notice: Option<ErrorReport>,
    last_ticket: u64,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading { .. })
    }

    /// Start a search from any phase.  Clears results, selection and errors.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a blank term; the state is left untouched.
    pub fn begin_search(&mut self, term: &str) -> Result<SearchTicket> {
        let term = term.trim();
        if term.is_empty() {
            return Err(Error::Validation);
        }

        self.last_ticket += 1;
        let ticket = SearchTicket(self.last_ticket);
        self.phase = SearchPhase::Loading { ticket, term: term.to_string() };
        self.mint_notice = None;
        Ok(ticket)
    }

    /// Apply the outcome of the search identified by `ticket`.  Returns false
    /// and changes nothing when a newer search has since been started.
    pub fn complete_search(&mut self, ticket: SearchTicket, outcome: Result<Vec<FlightView>>) -> bool {
        match self.phase {
            SearchPhase::Loading { ticket: current, .. } if current == ticket => {}
            _ => return false,
        }

        self.phase = match outcome {
            Ok(flights) if !flights.is_empty() => SearchPhase::Success { flights, selection: None },
            Ok(_) => SearchPhase::Failed(Error::NotFound(crate::error::NotFound::NoMatch).report()),
            Err(err) => SearchPhase::Failed(search_failure(&err)),
        };
        true
    }

    /// # Errors
    ///
    /// [`Error::NoSelection`] outside `Success`, or
    /// [`Error::SelectionOutOfRange`] for an index past the results.
    pub fn select(&mut self, index: usize) -> Result<&FlightView> {
        match &mut self.phase {
            SearchPhase::Success { flights, selection } => {
                if index >= flights.len() {
                    return Err(Error::SelectionOutOfRange { index, len: flights.len() });
                }
                *selection = Some(index);
                Ok(&flights[index])
            }
            _ => Err(Error::NoSelection),
        }
    }

    pub fn results(&self) -> &[FlightView] {
        match &self.phase {
            SearchPhase::Success { flights, .. } => flights,
            _ => &[],
        }
    }

    pub fn selected(&self) -> Option<&FlightView> {
        match &self.phase {
            SearchPhase::Success { flights, selection: Some(ix) } => flights.get(*ix),
            _ => None,
        }
    }

    /// Stamp taken when a mint starts; see [`ClientState::settle_mint`].
    pub fn mint_stamp(&self) -> u64 {
        self.last_ticket
    }

    /// Record the outcome of a mint started at `stamp`.  A search begun in the
    /// meantime owns the screen, so the notice is dropped and false returned.
    pub fn settle_mint(&mut self, stamp: u64, notice: Option<ErrorReport>) -> bool {
        if stamp != self.last_ticket {
            return false;
        }
        self.mint_notice = notice;
        true
    }

    /// The error to show, if any: a failed search or a failed mint.
    pub fn current_error(&self) -> Option<&ErrorReport> {
        match &self.phase {
            SearchPhase::Failed(report) => Some(report),
            _ => self.mint_notice.as_ref(),
        }
    }
}

/// A failed search is always titled as a fetch failure; the server's own
/// message becomes the detail.
fn search_failure(err: &Error) -> ErrorReport {
    match err {
        Error::Endpoint { report, .. } => ErrorReport::with_details(TITLE_FETCH_FAILED, report.error.clone()),
        other => {
            let report = other.report();
            if report.error == TITLE_FETCH_FAILED {
                report
            } else {
                ErrorReport::with_details(TITLE_FETCH_FAILED, report.error)
            }
        }
    }
}
