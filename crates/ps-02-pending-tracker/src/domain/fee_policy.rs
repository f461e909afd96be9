//! Replacement fee escalation.

use shared_types::U256;

/// Factor applied to the dominant fee pressure.
pub const REPLACEMENT_MULTIPLIER: u64 = 2;

/// Minimum fee for a same-sequence replacement.
///
/// Formula: 2 * max(current_network_fee, original_fee), saturating.
pub fn replacement_fee(current_network_fee: U256, original_fee: U256) -> U256 {
    current_network_fee
        .max(original_fee)
        .saturating_mul(U256::from(REPLACEMENT_MULTIPLIER))
}
