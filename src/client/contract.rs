use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::FlightView;
use crate::error::Result;

/// Address of the connected wallet, as handed over by the wallet binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arguments of the contract's `mint` method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub to: WalletAddress,
    pub altitude: i64,
}

impl MintRequest {
    pub fn for_flight(to: WalletAddress, flight: &FlightView) -> Self {
        Self { to, altitude: flight.rounded_altitude() }
    }
}

/// Whatever the contract binding reports back for an accepted call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub transaction: String,
}

/// The external token contract.
#[async_trait]
pub trait MintContract: Send + Sync {
    /// # Errors
    ///
    /// [`crate::Error::MintRejected`] when the call is rejected or fails.
    async fn mint(&self, request: &MintRequest) -> Result<MintReceipt>;
}
