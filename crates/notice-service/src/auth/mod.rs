//! Token handling: host-issued access tokens and unsubscribe codes.

pub mod claims;
pub mod decoder;
pub mod signer;

pub use claims::{AccessClaims, UnsubscribeClaims};
pub use decoder::AccessTokenDecoder;
pub use signer::UnsubscribeSigner;
