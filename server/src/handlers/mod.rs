pub mod dex;
pub mod health;
pub mod kyc;
pub mod token;

use alloy::primitives::Address;

/// EIP-55 form used in every response body.
pub(crate) fn checksummed(address: Address) -> String {
    address.to_checksum(None)
}

pub(crate) fn hex_data(data: &[u8]) -> String {
    format!("0x{}", alloy::hex::encode(data))
}
