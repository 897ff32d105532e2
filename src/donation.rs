//! Donation flow controller.
//!
//! Owns the widget's state (selected amount, custom amount, transaction
//! handle) and drives the submission sequence: connect wallet if needed,
//! switch to Base if needed, validate the amount, then hand the transfer to
//! the wallet bridge. The chain collaborators are injected at construction so
//! the whole flow runs against mocks in tests.

use std::sync::Arc;

use alloy_primitives::{utils::parse_units, Address, U256};

use crate::erc20::{BASE_CHAIN_ID, DONATION_ADDRESS, USDC_ADDRESS, USDC_DECIMALS};
use crate::provider::ChainError;

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

pub trait WalletConnector: Send + Sync {
    fn is_connected(&self) -> bool;
    fn chain_id(&self) -> Option<u64>;
    /// Prompt the user to connect. Blocks until approved or declined.
    fn request_connection(&self) -> Result<(), ChainError>;
}

pub trait ChainSwitcher: Send + Sync {
    fn switch_chain(&self, chain_id: u64) -> Result<(), ChainError>;
}

pub trait TransferSubmitter: Send + Sync {
    /// Submit an ERC20 transfer and return the transaction hash.
    fn submit_transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<String, ChainError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Pending,
    Confirmed,
    Reverted,
}

pub trait ReceiptWatcher: Send + Sync {
    fn receipt_status(&self, tx_hash: &str) -> Result<ReceiptStatus, ChainError>;
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// What a single `submit` call did. Connect and switch requests return early
/// without attempting a transfer; the user triggers the flow again once the
/// wallet is in the right state.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    ConnectRequested,
    SwitchRequested,
    /// Validation gate: empty, non-positive, or unparseable amount.
    /// Deliberately silent.
    Ignored,
    Submitted(String),
    Failed,
}

#[derive(Clone)]
pub struct DonationController {
    wallet: Arc<dyn WalletConnector>,
    chain: Arc<dyn ChainSwitcher>,
    transfer: Arc<dyn TransferSubmitter>,
    receipts: Arc<dyn ReceiptWatcher>,

    pub selected_amount: u32,
    pub custom_amount: String,
    pub is_custom: bool,
    pub tx_hash: Option<String>,
    pub last_error: Option<ChainError>,
}

impl DonationController {
    pub fn new<C>(chain: C) -> Self
    where
        C: WalletConnector + ChainSwitcher + TransferSubmitter + ReceiptWatcher + Clone + 'static,
    {
        Self::with_collaborators(
            Arc::new(chain.clone()),
            Arc::new(chain.clone()),
            Arc::new(chain.clone()),
            Arc::new(chain),
        )
    }

    pub fn with_collaborators(
        wallet: Arc<dyn WalletConnector>,
        chain: Arc<dyn ChainSwitcher>,
        transfer: Arc<dyn TransferSubmitter>,
        receipts: Arc<dyn ReceiptWatcher>,
    ) -> Self {
        Self {
            wallet,
            chain,
            transfer,
            receipts,
            selected_amount: 5,
            custom_amount: String::new(),
            is_custom: false,
            tx_hash: None,
            last_error: None,
        }
    }

    pub fn select_preset(&mut self, amount: u32) {
        self.selected_amount = amount;
        self.is_custom = false;
    }

    pub fn set_custom(&mut self, text: impl Into<String>) {
        self.custom_amount = text.into();
        self.is_custom = true;
    }

    /// Amount shown on the donate button.
    pub fn display_amount(&self) -> String {
        if self.is_custom {
            self.custom_amount.clone()
        } else {
            self.selected_amount.to_string()
        }
    }

    /// Handle for the receipt poll loop.
    pub fn receipts(&self) -> Arc<dyn ReceiptWatcher> {
        self.receipts.clone()
    }

    /// Run the donation sequence once. Blocks on wallet prompts, so callers
    /// in the UI wrap this in `spawn_blocking`.
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.wallet.is_connected() {
            return match self.wallet.request_connection() {
                Ok(()) => SubmitOutcome::ConnectRequested,
                Err(e) => {
                    tracing::error!(error = %e, "wallet connect failed");
                    self.last_error = Some(e);
                    SubmitOutcome::Failed
                }
            };
        }

        if self.wallet.chain_id() != Some(BASE_CHAIN_ID) {
            return match self.chain.switch_chain(BASE_CHAIN_ID) {
                Ok(()) => SubmitOutcome::SwitchRequested,
                Err(e) => {
                    tracing::error!(error = %e, "chain switch failed");
                    self.last_error = Some(e);
                    SubmitOutcome::Failed
                }
            };
        }

        let amount = self.display_amount();
        // Invalid input is not an error: the widget simply declines to act.
        if amount.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if let Ok(v) = amount.parse::<f64>() {
            if v <= 0.0 {
                return SubmitOutcome::Ignored;
            }
        }

        let units = match parse_units(&amount, USDC_DECIMALS) {
            Ok(parsed) => parsed.get_absolute(),
            Err(e) => {
                tracing::debug!(amount = %amount, error = %e, "ignoring unparseable amount");
                return SubmitOutcome::Ignored;
            }
        };

        self.last_error = None;
        tracing::info!(amount = %amount, "submitting donation");
        match self
            .transfer
            .submit_transfer(USDC_ADDRESS, DONATION_ADDRESS, units)
        {
            Ok(hash) => {
                self.tx_hash = Some(hash.clone());
                SubmitOutcome::Submitted(hash)
            }
            Err(e) => {
                tracing::error!(error = %e, "transfer failed");
                self.last_error = Some(e);
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erc20::DONATION_AMOUNTS;
    use std::sync::Mutex;

    /// Recording fake for every collaborator seam.
    #[derive(Clone, Default)]
    struct FakeChain {
        inner: Arc<Mutex<FakeChainState>>,
    }

    #[derive(Default)]
    struct FakeChainState {
        connected: bool,
        chain_id: Option<u64>,
        connect_requests: usize,
        switch_requests: Vec<u64>,
        transfers: Vec<(Address, Address, U256)>,
        transfer_result: Option<Result<String, ChainError>>,
    }

    impl FakeChain {
        fn connected_on(chain_id: u64) -> Self {
            let fake = Self::default();
            {
                let mut s = fake.inner.lock().unwrap();
                s.connected = true;
                s.chain_id = Some(chain_id);
                s.transfer_result = Some(Ok("0xfeed".into()));
            }
            fake
        }

        fn transfer_result(&self, result: Result<String, ChainError>) {
            self.inner.lock().unwrap().transfer_result = Some(result);
        }

        fn connect_requests(&self) -> usize {
            self.inner.lock().unwrap().connect_requests
        }

        fn switch_requests(&self) -> Vec<u64> {
            self.inner.lock().unwrap().switch_requests.clone()
        }

        fn transfers(&self) -> Vec<(Address, Address, U256)> {
            self.inner.lock().unwrap().transfers.clone()
        }
    }

    impl WalletConnector for FakeChain {
        fn is_connected(&self) -> bool {
            self.inner.lock().unwrap().connected
        }
        fn chain_id(&self) -> Option<u64> {
            self.inner.lock().unwrap().chain_id
        }
        fn request_connection(&self) -> Result<(), ChainError> {
            self.inner.lock().unwrap().connect_requests += 1;
            Ok(())
        }
    }

    impl ChainSwitcher for FakeChain {
        fn switch_chain(&self, chain_id: u64) -> Result<(), ChainError> {
            self.inner.lock().unwrap().switch_requests.push(chain_id);
            Ok(())
        }
    }

    impl TransferSubmitter for FakeChain {
        fn submit_transfer(
            &self,
            token: Address,
            to: Address,
            amount: U256,
        ) -> Result<String, ChainError> {
            let mut s = self.inner.lock().unwrap();
            s.transfers.push((token, to, amount));
            s.transfer_result
                .clone()
                .unwrap_or(Ok("0xfeed".into()))
        }
    }

    impl ReceiptWatcher for FakeChain {
        fn receipt_status(&self, _tx_hash: &str) -> Result<ReceiptStatus, ChainError> {
            Ok(ReceiptStatus::Pending)
        }
    }

    #[test]
    fn preset_selection_clears_custom_mode() {
        let fake = FakeChain::default();
        let mut ctl = DonationController::new(fake);
        ctl.set_custom("7");
        for amount in DONATION_AMOUNTS {
            ctl.select_preset(amount);
            assert_eq!(ctl.selected_amount, amount);
            assert!(!ctl.is_custom);
            ctl.set_custom("7");
        }
    }

    #[test]
    fn custom_text_enables_custom_mode() {
        let fake = FakeChain::default();
        let mut ctl = DonationController::new(fake);
        ctl.select_preset(20);
        ctl.set_custom("3.50");
        assert!(ctl.is_custom);
        assert_eq!(ctl.custom_amount, "3.50");
        assert_eq!(ctl.display_amount(), "3.50");
    }

    #[test]
    fn submit_while_disconnected_requests_connection_only() {
        let fake = FakeChain::default();
        let mut ctl = DonationController::new(fake.clone());
        let outcome = ctl.submit();
        assert_eq!(outcome, SubmitOutcome::ConnectRequested);
        assert_eq!(fake.connect_requests(), 1);
        assert!(fake.transfers().is_empty());
    }

    #[test]
    fn submit_on_wrong_chain_requests_switch_only() {
        let fake = FakeChain::connected_on(1); // mainnet, not Base
        let mut ctl = DonationController::new(fake.clone());
        let outcome = ctl.submit();
        assert_eq!(outcome, SubmitOutcome::SwitchRequested);
        assert_eq!(fake.switch_requests(), vec![BASE_CHAIN_ID]);
        assert!(fake.transfers().is_empty());
    }

    #[test]
    fn invalid_custom_amounts_are_silently_ignored() {
        for bad in ["", "0", "-5", "abc"] {
            let fake = FakeChain::connected_on(BASE_CHAIN_ID);
            let mut ctl = DonationController::new(fake.clone());
            ctl.set_custom(bad);
            let outcome = ctl.submit();
            assert_eq!(outcome, SubmitOutcome::Ignored, "input {bad:?}");
            assert!(fake.transfers().is_empty());
            assert!(ctl.last_error.is_none());
        }
    }

    #[test]
    fn valid_amount_submits_in_smallest_units() {
        let fake = FakeChain::connected_on(BASE_CHAIN_ID);
        let mut ctl = DonationController::new(fake.clone());
        ctl.set_custom("10");
        ctl.submit();
        assert_eq!(
            fake.transfers(),
            vec![(USDC_ADDRESS, DONATION_ADDRESS, U256::from(10_000_000u64))]
        );
    }

    #[test]
    fn default_preset_submits_five_usdc() {
        let fake = FakeChain::connected_on(BASE_CHAIN_ID);
        let mut ctl = DonationController::new(fake.clone());
        ctl.submit();
        assert_eq!(
            fake.transfers(),
            vec![(USDC_ADDRESS, DONATION_ADDRESS, U256::from(5_000_000u64))]
        );
    }

    #[test]
    fn fractional_custom_amount_converts_exactly() {
        let fake = FakeChain::connected_on(BASE_CHAIN_ID);
        let mut ctl = DonationController::new(fake.clone());
        ctl.set_custom("2.5");
        ctl.submit();
        assert_eq!(
            fake.transfers(),
            vec![(USDC_ADDRESS, DONATION_ADDRESS, U256::from(2_500_000u64))]
        );
    }

    #[test]
    fn successful_submission_stores_the_handle() {
        let fake = FakeChain::connected_on(BASE_CHAIN_ID);
        fake.transfer_result(Ok("0xabc".into()));
        let mut ctl = DonationController::new(fake);
        let outcome = ctl.submit();
        assert_eq!(outcome, SubmitOutcome::Submitted("0xabc".into()));
        assert_eq!(ctl.tx_hash.as_deref(), Some("0xabc"));
        assert!(ctl.last_error.is_none());
    }

    #[test]
    fn user_rejection_is_captured_with_its_kind() {
        let fake = FakeChain::connected_on(BASE_CHAIN_ID);
        fake.transfer_result(Err(ChainError::UserRejected));
        let mut ctl = DonationController::new(fake);
        assert_eq!(ctl.submit(), SubmitOutcome::Failed);
        assert!(matches!(ctl.last_error, Some(ChainError::UserRejected)));
        assert!(ctl.tx_hash.is_none());
    }
}
