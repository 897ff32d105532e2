//! Shared reactive state for the donation widget.

use std::sync::{Arc, Mutex};

use alloy_primitives::Address;

use crate::frame::HostBridge;

/// Current wallet connection state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error(String),
}

/// Top-level reactive state, stored in a Dioxus `Signal`.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub connection_status: ConnectionStatus,
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
}

/// Thread-safe handle to the frame host bridge, created on first use.
pub type SharedHost = Arc<Mutex<Option<HostBridge>>>;
