// Copyright (c) 2022-2023 The MobileCoin Foundation

use wallet_plugin_apdu::{error::DescriptorError, ApduError};

use crate::signer::SignerError;

/// Plugin descriptor API error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Descriptor field validation failure
    #[error("invalid descriptor: {0}")]
    Descriptor(DescriptorError),

    /// APDU encode / decode failure
    #[error("APDU encoding failed: {0:?}")]
    Apdu(ApduError),

    /// Authority signer failure, surfaced unchanged
    #[error("authority signing failed: {0}")]
    Signer(#[from] SignerError),

    /// Registry serialization failure
    #[error("registry serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed hex in a serialized registry
    #[error("invalid hex in serialized registry: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl From<DescriptorError> for Error {
    fn from(e: DescriptorError) -> Self {
        Error::Descriptor(e)
    }
}

impl From<ApduError> for Error {
    fn from(e: ApduError) -> Self {
        Error::Apdu(e)
    }
}
