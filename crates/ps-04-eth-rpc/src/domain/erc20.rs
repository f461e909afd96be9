//! ERC-20 `transfer(address,uint256)` calldata.

use super::quantity::trimmed_be_bytes;
use shared_types::{Address, U256};

/// First four bytes of keccak256("transfer(address,uint256)").
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

pub fn erc20_transfer_calldata(to: Address, amount: U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32 + 32);
    data.extend_from_slice(&TRANSFER_SELECTOR);

    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(to.as_bytes());

    let amount = trimmed_be_bytes(amount);
    data.extend(std::iter::repeat(0u8).take(32 - amount.len()));
    data.extend_from_slice(&amount);
    data
}
