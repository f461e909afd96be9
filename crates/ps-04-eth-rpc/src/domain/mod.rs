//! Wire-level encoding: quantities, transactions, token calldata.

pub mod erc20;
pub mod quantity;
pub mod transaction;

pub use erc20::erc20_transfer_calldata;
pub use quantity::{format_quantity, parse_quantity, parse_quantity_u64};
pub use transaction::{LegacyTransaction, SignedTransaction};
