// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Contract address type
//!
//! Addresses are 20 opaque bytes with no internal structure. Checksummed or
//! hex string forms are a loading concern for the caller, everything here
//! operates on the decoded bytes.

use encdec::{DecodeOwned, Encode};
use ledger_proto::ApduError;

use crate::error::DescriptorError;

/// Contract address length in bytes
pub const ADDRESS_LEN: usize = 20;

/// 20-byte contract address
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContractAddress([u8; ADDRESS_LEN]);

impl ContractAddress {
    /// Create an address from a fixed 20-byte value
    pub const fn new(b: [u8; ADDRESS_LEN]) -> Self {
        Self(b)
    }

    /// Fetch the raw address bytes
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for ContractAddress {
    fn from(b: [u8; ADDRESS_LEN]) -> Self {
        Self(b)
    }
}

/// Fallible conversion for addresses sourced from untrusted slices
impl TryFrom<&[u8]> for ContractAddress {
    type Error = DescriptorError;

    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        if b.len() != ADDRESS_LEN {
            return Err(DescriptorError::InvalidAddress(b.len()));
        }

        let mut d = [0u8; ADDRESS_LEN];
        d.copy_from_slice(b);

        Ok(Self(d))
    }
}

impl Encode for ContractAddress {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(ADDRESS_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < ADDRESS_LEN {
            return Err(ApduError::InvalidLength);
        }

        buff[..ADDRESS_LEN].copy_from_slice(&self.0);

        Ok(ADDRESS_LEN)
    }
}

impl DecodeOwned for ContractAddress {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.len() < ADDRESS_LEN {
            return Err(ApduError::InvalidLength);
        }

        let mut d = [0u8; ADDRESS_LEN];
        d.copy_from_slice(&buff[..ADDRESS_LEN]);

        Ok((Self(d), ADDRESS_LEN))
    }
}

/// Display [`ContractAddress`] as hex
impl core::fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x")?;
        for b in &self.0[..] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Debug format [`ContractAddress`] as hex
impl core::fmt::Debug for ContractAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}
