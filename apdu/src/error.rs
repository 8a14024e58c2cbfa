// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Descriptor validation errors
//!
//! These are raised while constructing descriptor values, before any bytes
//! can be serialized or handed to an authority signer. Wire-level buffer
//! errors use [`ApduError`][crate::ApduError] as elsewhere.

use core::fmt;

/// Validation failures for descriptor fields
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum DescriptorError {
    /// Call payload too short to contain a selector
    InvalidPayload(usize),

    /// Plugin identifier empty, over the protocol cap, or not printable ASCII
    InvalidIdentifier,

    /// Contract address not exactly [`ADDRESS_LEN`][crate::address::ADDRESS_LEN] bytes
    InvalidAddress(usize),

    /// Selector not exactly [`SELECTOR_LEN`][crate::selector::SELECTOR_LEN] bytes
    InvalidSelector(usize),

    /// Metadata too long for its single length-prefix byte
    InvalidMetadata(usize),

    /// Signature length outside the protocol-allowed range
    SignatureLengthInvalid(usize),
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPayload(n) => {
                write!(f, "call payload too short for selector ({n} bytes)")
            }
            Self::InvalidIdentifier => write!(f, "invalid plugin identifier"),
            Self::InvalidAddress(n) => write!(f, "invalid contract address length ({n} bytes)"),
            Self::InvalidSelector(n) => write!(f, "invalid selector length ({n} bytes)"),
            Self::InvalidMetadata(n) => write!(f, "metadata too long ({n} bytes)"),
            Self::SignatureLengthInvalid(n) => {
                write!(f, "signature length outside allowed range ({n} bytes)")
            }
        }
    }
}
