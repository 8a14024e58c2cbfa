// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Function selector type and derivation
//!
//! A selector is the 4-byte identifier a contract dispatcher uses to route a
//! call to the correct function. [`Selector::from_payload`] mirrors the
//! on-chain extraction rule bit-for-bit: the first four bytes of the call
//! payload, with no hashing (hashing a human-readable signature down to a
//! selector is the ABI encoder's job, not ours).

use encdec::{DecodeOwned, Encode};
use ledger_proto::ApduError;

use crate::error::DescriptorError;

/// Selector length in bytes
pub const SELECTOR_LEN: usize = 4;

/// 4-byte function selector
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector([u8; SELECTOR_LEN]);

impl Selector {
    /// Create a selector from a fixed 4-byte value
    pub const fn new(b: [u8; SELECTOR_LEN]) -> Self {
        Self(b)
    }

    /// Derive the selector from a raw call payload.
    ///
    /// Returns the payload's first four bytes, failing when the payload
    /// cannot contain a selector.
    pub fn from_payload(payload: &[u8]) -> Result<Self, DescriptorError> {
        if payload.len() < SELECTOR_LEN {
            return Err(DescriptorError::InvalidPayload(payload.len()));
        }

        let mut b = [0u8; SELECTOR_LEN];
        b.copy_from_slice(&payload[..SELECTOR_LEN]);

        Ok(Self(b))
    }

    /// Fetch the raw selector bytes
    pub const fn as_bytes(&self) -> &[u8; SELECTOR_LEN] {
        &self.0
    }
}

impl From<[u8; SELECTOR_LEN]> for Selector {
    fn from(b: [u8; SELECTOR_LEN]) -> Self {
        Self(b)
    }
}

/// Fallible conversion for selectors sourced from untrusted slices
impl TryFrom<&[u8]> for Selector {
    type Error = DescriptorError;

    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        if b.len() != SELECTOR_LEN {
            return Err(DescriptorError::InvalidSelector(b.len()));
        }

        let mut d = [0u8; SELECTOR_LEN];
        d.copy_from_slice(b);

        Ok(Self(d))
    }
}

impl Encode for Selector {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(SELECTOR_LEN)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
        if buff.len() < SELECTOR_LEN {
            return Err(ApduError::InvalidLength);
        }

        buff[..SELECTOR_LEN].copy_from_slice(&self.0);

        Ok(SELECTOR_LEN)
    }
}

impl DecodeOwned for Selector {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        if buff.len() < SELECTOR_LEN {
            return Err(ApduError::InvalidLength);
        }

        let mut d = [0u8; SELECTOR_LEN];
        d.copy_from_slice(&buff[..SELECTOR_LEN]);

        Ok((Self(d), SELECTOR_LEN))
    }
}

/// Display [`Selector`] as hex
impl core::fmt::Display for Selector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x")?;
        for b in &self.0[..] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Debug format [`Selector`] as hex
impl core::fmt::Debug for Selector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}
