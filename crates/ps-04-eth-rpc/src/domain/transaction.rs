//! # Legacy Transactions
//!
//! Pre-EIP-2718 transactions with EIP-155 replay protection:
//!
//! ```text
//! signing hash = keccak256(rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0]))
//! raw          = rlp([nonce, gasPrice, gas, to, value, data, v, r, s])
//! v            = recovery_id + chainId * 2 + 35
//! ```

use super::quantity::trimmed_be_bytes;
use k256::ecdsa::{RecoveryId, SigningKey};
use rlp::RlpStream;
use shared_types::{keccak256, Address, ChainError, TransferRequest, TxHash, U256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

/// Signed, RLP-encoded transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: TxHash,
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }
}

impl LegacyTransaction {
    pub fn from_request(request: &TransferRequest, chain_id: u64) -> Self {
        Self {
            nonce: request.nonce,
            gas_price: request.gas_price,
            gas_limit: request.gas_limit,
            to: request.to,
            value: request.value,
            data: request.data.clone(),
            chain_id,
        }
    }

    fn append_fields(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&trimmed_be_bytes(self.gas_price));
        stream.append(&self.gas_limit);
        stream.append(&self.to.as_bytes().to_vec());
        stream.append(&trimmed_be_bytes(self.value));
        stream.append(&self.data);
    }

    pub fn signing_hash(&self) -> [u8; 32] {
        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream);
        stream.append(&self.chain_id);
        stream.append_empty_data();
        stream.append_empty_data();
        keccak256(&stream.out())
    }

    pub fn sign(&self, key: &SigningKey) -> Result<SignedTransaction, ChainError> {
        let (signature, recovery_id) = key
            .sign_prehash_recoverable(&self.signing_hash())
            .map_err(|e| ChainError::Signing(e.to_string()))?;

        // Low-s form; flipping s flips the parity of y.
        let (signature, recovery_id) = match signature.normalize_s() {
            Some(normalized) => (
                normalized,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (signature, recovery_id),
        };

        let bytes = signature.to_bytes();
        let r = trimmed_be_bytes(U256::from_big_endian(&bytes[..32]));
        let s = trimmed_be_bytes(U256::from_big_endian(&bytes[32..]));
        let v = u64::from(recovery_id.to_byte()) + self.chain_id * 2 + 35;

        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream);
        stream.append(&v);
        stream.append(&r);
        stream.append(&s);

        let raw = stream.out().to_vec();
        let hash = TxHash::from_slice(&keccak256(&raw));
        Ok(SignedTransaction { raw, hash })
    }
}
