//! Chain constants and the minimal ERC20 surface used by the donation flow.

use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

/// USDC contract on Base.
pub const USDC_ADDRESS: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

/// Donation recipient.
pub const DONATION_ADDRESS: Address = address!("a52820d251b38d6e3bd5739f4fd6fa32e7d125f3");

/// USDC uses 6 decimals on every chain it is issued on.
pub const USDC_DECIMALS: u8 = 6;

/// Base mainnet chain id.
pub const BASE_CHAIN_ID: u64 = 8453;

/// Preset donation amounts, in whole USDC.
pub const DONATION_AMOUNTS: [u32; 4] = [1, 5, 10, 20];

pub const LEARN_MORE_URL: &str = "https://www.buddhistglobalrelief.org/myanmar-crisis";

sol! {
    /// The one ERC20 function the widget calls.
    interface ERC20 {
        function transfer(address recipient, uint256 amount) external returns (bool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use alloy_sol_types::SolCall;

    #[test]
    fn transfer_calldata_layout() {
        let call = ERC20::transferCall {
            recipient: DONATION_ADDRESS,
            amount: U256::from(5_000_000u64),
        };
        let data = call.abi_encode();

        // transfer(address,uint256) selector
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        // two 32-byte words follow the selector
        assert_eq!(data.len(), 4 + 64);
        // recipient right-aligned in the first word
        assert_eq!(&data[4 + 12..4 + 32], DONATION_ADDRESS.as_slice());
        // amount in the second word
        assert_eq!(
            U256::from_be_slice(&data[4 + 32..4 + 64]),
            U256::from(5_000_000u64)
        );
    }
}
