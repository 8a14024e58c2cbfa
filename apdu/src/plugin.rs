// Copyright (c) 2022-2023 The MobileCoin Foundation

//! External plugin registration APDUs
//!
//! [`PluginDescriptor`] binds an installed plugin to one (contract address,
//! selector) pair and serializes to the command body an authority signs.
//! [`SetPluginReq`] is the full registration command, carrying the descriptor
//! body with the authority signature appended.

use encdec::{Decode, DecodeOwned, Encode};
use ledger_proto::{ApduError, ApduStatic};

use crate::address::{ContractAddress, ADDRESS_LEN};
use crate::error::DescriptorError;
use crate::selector::{Selector, SELECTOR_LEN};
use crate::{Instruction, WALLET_APDU_CLA};

/// Maximum plugin identifier length in bytes (protocol cap)
pub const MAX_PLUGIN_NAME_LEN: usize = 30;

/// Maximum metadata length (single length-prefix byte)
pub const MAX_METADATA_LEN: usize = 255;

/// Minimum accepted authority signature length (fixed-width ed25519)
pub const MIN_SIGNATURE_LEN: usize = 64;

/// Maximum accepted authority signature length (DER-encoded ECDSA)
pub const MAX_SIGNATURE_LEN: usize = 72;

/// Plugin binding descriptor.
///
/// Immutable once constructed, any change to a binding is a new descriptor
/// with a new signature. Serialization is referentially transparent: the
/// same fields always produce byte-identical output, which the signature
/// protocol relies on.
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    NAME_LEN   |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                     PLUGIN_NAME (variable)                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                   CONTRACT_ADDRESS (20-byte)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        SELECTOR (4-byte)                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    META_LEN   |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                       METADATA (variable)                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PluginDescriptor<'a> {
    /// Installed plugin handling this binding
    pub name: &'a str,

    /// Bound contract address
    pub address: ContractAddress,

    /// Bound function selector
    pub selector: Selector,

    /// Opaque plugin-specific metadata (may be empty)
    pub metadata: &'a [u8],
}

impl<'a> PluginDescriptor<'a> {
    /// Build a validated descriptor.
    ///
    /// The identifier must be non-empty printable ASCII up to
    /// [`MAX_PLUGIN_NAME_LEN`] bytes, metadata must fit its length prefix.
    pub fn new(
        name: &'a str,
        address: ContractAddress,
        selector: Selector,
        metadata: &'a [u8],
    ) -> Result<Self, DescriptorError> {
        if !name_valid(name) {
            return Err(DescriptorError::InvalidIdentifier);
        }

        if metadata.len() > MAX_METADATA_LEN {
            return Err(DescriptorError::InvalidMetadata(metadata.len()));
        }

        Ok(Self {
            name,
            address,
            selector,
            metadata,
        })
    }

    /// Build a validated descriptor from raw address and selector slices
    pub fn from_parts(
        name: &'a str,
        address: &[u8],
        selector: &[u8],
        metadata: &'a [u8],
    ) -> Result<Self, DescriptorError> {
        Self::new(
            name,
            ContractAddress::try_from(address)?,
            Selector::try_from(selector)?,
            metadata,
        )
    }
}

/// Identifier constraint shared by the builder and the wallet-side parser
fn name_valid(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_PLUGIN_NAME_LEN
        && name.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// Unsigned registration commands share the framing of [`SetPluginReq`]
impl ApduStatic for PluginDescriptor<'_> {
    const CLA: u8 = WALLET_APDU_CLA;
    const INS: u8 = Instruction::SetExternalPlugin as u8;
}

impl Encode for PluginDescriptor<'_> {
    type Error = ApduError;

    /// Encode the descriptor body into the provided buffer
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = 0;
        let name = self.name.as_bytes();

        // Check buffer length is viable
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        // Write name length and name
        buff[index] = name.len() as u8;
        index += 1;

        buff[index..][..name.len()].copy_from_slice(name);
        index += name.len();

        // Write contract address
        index += self.address.encode(&mut buff[index..])?;

        // Write selector
        index += self.selector.encode(&mut buff[index..])?;

        // Write metadata length and metadata
        buff[index] = self.metadata.len() as u8;
        index += 1;

        buff[index..][..self.metadata.len()].copy_from_slice(self.metadata);
        index += self.metadata.len();

        Ok(index)
    }

    /// Compute the encoded descriptor body length
    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(2 + self.name.len() + ADDRESS_LEN + SELECTOR_LEN + self.metadata.len())
    }
}

impl<'a> Decode<'a> for PluginDescriptor<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a descriptor body from the provided buffer (wallet-side parse)
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let mut index = 0;

        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        // Read name length and name
        let name_len = buff[index] as usize;
        index += 1;

        if buff.len() < index + name_len {
            return Err(ApduError::InvalidLength);
        }

        let name =
            core::str::from_utf8(&buff[index..][..name_len]).map_err(|_| ApduError::InvalidUtf8)?;
        index += name_len;

        // The wallet applies the same identifier constraint as the builder
        if !name_valid(name) {
            return Err(ApduError::InvalidEncoding);
        }

        // Read contract address
        let (address, n) = ContractAddress::decode_owned(&buff[index..])?;
        index += n;

        // Read selector
        let (selector, n) = Selector::decode_owned(&buff[index..])?;
        index += n;

        // Read metadata length and metadata
        if buff.len() < index + 1 {
            return Err(ApduError::InvalidLength);
        }

        let meta_len = buff[index] as usize;
        index += 1;

        if buff.len() < index + meta_len {
            return Err(ApduError::InvalidLength);
        }

        let metadata = &buff[index..][..meta_len];
        index += meta_len;

        Ok((
            Self {
                name,
                address,
                selector,
                metadata,
            },
            index,
        ))
    }
}

/// Signed plugin registration command.
///
/// The authority signature covers the descriptor body exactly as encoded,
/// excluding the five-byte command header and the signature itself.
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                   DESCRIPTOR (variable, above)                /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                SIGNATURE (64..=72 bytes, to end)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SetPluginReq<'a> {
    /// Descriptor to register
    pub descriptor: PluginDescriptor<'a>,

    /// Authority signature over the descriptor body
    pub signature: &'a [u8],
}

impl<'a> SetPluginReq<'a> {
    /// Assemble a signed registration command.
    ///
    /// Cryptographic validity is checked by the wallet, not here, but
    /// signatures outside the protocol-allowed length range are rejected
    /// before assembly.
    pub fn new(
        descriptor: PluginDescriptor<'a>,
        signature: &'a [u8],
    ) -> Result<Self, DescriptorError> {
        if !(MIN_SIGNATURE_LEN..=MAX_SIGNATURE_LEN).contains(&signature.len()) {
            return Err(DescriptorError::SignatureLengthInvalid(signature.len()));
        }

        Ok(Self {
            descriptor,
            signature,
        })
    }
}

impl ApduStatic for SetPluginReq<'_> {
    const CLA: u8 = WALLET_APDU_CLA;
    const INS: u8 = Instruction::SetExternalPlugin as u8;
}

impl Encode for SetPluginReq<'_> {
    type Error = ApduError;

    /// Encode the signed command body into the provided buffer
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = 0;

        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        // Write descriptor body
        index += self.descriptor.encode(buff)?;

        // Append signature
        buff[index..][..self.signature.len()].copy_from_slice(self.signature);
        index += self.signature.len();

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(self.descriptor.encode_len()? + self.signature.len())
    }
}

impl<'a> Decode<'a> for SetPluginReq<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a signed command body, taking the trailing bytes as signature
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let (descriptor, n) = PluginDescriptor::decode(buff)?;

        let signature = &buff[n..];
        if !(MIN_SIGNATURE_LEN..=MAX_SIGNATURE_LEN).contains(&signature.len()) {
            return Err(ApduError::InvalidLength);
        }

        Ok((
            Self {
                descriptor,
                signature,
            },
            buff.len(),
        ))
    }
}
