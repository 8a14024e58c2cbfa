// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Signed token display information APDUs
//!
//! Token descriptors let the wallet render amounts for a known token
//! (ticker and decimals) instead of raw integers. Like plugin bindings they
//! are only trusted when accompanied by an authority signature, here over
//! the whole body with the signature itself excluded.

use byteorder::{BigEndian, ByteOrder};
use encdec::{Decode, DecodeOwned, Encode};
use ledger_proto::{ApduError, ApduStatic};

use crate::address::{ContractAddress, ADDRESS_LEN};
use crate::error::DescriptorError;
use crate::plugin::{MAX_SIGNATURE_LEN, MIN_SIGNATURE_LEN};
use crate::{Instruction, WALLET_APDU_CLA};

/// Maximum token ticker length in bytes
pub const MAX_TICKER_LEN: usize = 10;

/// Token display information descriptor.
///
/// Integer fields are big-endian, following the asset registry format.
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   TICKER_LEN  |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                       TICKER (variable)                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                   CONTRACT_ADDRESS (20-byte)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                     DECIMALS (u32, big-endian)                |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                     CHAIN_ID (u32, big-endian)                |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TokenInfo<'a> {
    /// Token ticker rendered next to amounts
    pub ticker: &'a str,

    /// Token contract address
    pub address: ContractAddress,

    /// Display decimals
    pub decimals: u32,

    /// Chain the token lives on
    pub chain_id: u32,
}

impl<'a> TokenInfo<'a> {
    /// Build a validated token descriptor
    pub fn new(
        ticker: &'a str,
        address: ContractAddress,
        decimals: u32,
        chain_id: u32,
    ) -> Result<Self, DescriptorError> {
        if !ticker_valid(ticker) {
            return Err(DescriptorError::InvalidIdentifier);
        }

        Ok(Self {
            ticker,
            address,
            decimals,
            chain_id,
        })
    }
}

fn ticker_valid(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker.len() <= MAX_TICKER_LEN
        && ticker.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

impl ApduStatic for TokenInfo<'_> {
    const CLA: u8 = WALLET_APDU_CLA;
    const INS: u8 = Instruction::ProvideTokenInfo as u8;
}

impl Encode for TokenInfo<'_> {
    type Error = ApduError;

    /// Encode the token descriptor body into the provided buffer
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = 0;
        let ticker = self.ticker.as_bytes();

        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        // Write ticker length and ticker
        buff[index] = ticker.len() as u8;
        index += 1;

        buff[index..][..ticker.len()].copy_from_slice(ticker);
        index += ticker.len();

        // Write contract address
        index += self.address.encode(&mut buff[index..])?;

        // Write decimals and chain id
        BigEndian::write_u32(&mut buff[index..][..4], self.decimals);
        index += 4;

        BigEndian::write_u32(&mut buff[index..][..4], self.chain_id);
        index += 4;

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1 + self.ticker.len() + ADDRESS_LEN + 8)
    }
}

impl<'a> Decode<'a> for TokenInfo<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a token descriptor body from the provided buffer
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let mut index = 0;

        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        // Read ticker length and ticker
        let ticker_len = buff[index] as usize;
        index += 1;

        if buff.len() < index + ticker_len {
            return Err(ApduError::InvalidLength);
        }

        let ticker = core::str::from_utf8(&buff[index..][..ticker_len])
            .map_err(|_| ApduError::InvalidUtf8)?;
        index += ticker_len;

        if !ticker_valid(ticker) {
            return Err(ApduError::InvalidEncoding);
        }

        // Read contract address
        let (address, n) = ContractAddress::decode_owned(&buff[index..])?;
        index += n;

        // Read decimals and chain id
        if buff.len() < index + 8 {
            return Err(ApduError::InvalidLength);
        }

        let decimals = BigEndian::read_u32(&buff[index..]);
        index += 4;

        let chain_id = BigEndian::read_u32(&buff[index..]);
        index += 4;

        Ok((
            Self {
                ticker,
                address,
                decimals,
                chain_id,
            },
            index,
        ))
    }
}

/// Signed token information command, descriptor body with the authority
/// signature appended (64..=72 bytes, to the end of the body).
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ProvideTokenInfoReq<'a> {
    /// Token descriptor
    pub info: TokenInfo<'a>,

    /// Authority signature over the descriptor body
    pub signature: &'a [u8],
}

impl<'a> ProvideTokenInfoReq<'a> {
    /// Assemble a signed token information command
    pub fn new(info: TokenInfo<'a>, signature: &'a [u8]) -> Result<Self, DescriptorError> {
        if !(MIN_SIGNATURE_LEN..=MAX_SIGNATURE_LEN).contains(&signature.len()) {
            return Err(DescriptorError::SignatureLengthInvalid(signature.len()));
        }

        Ok(Self { info, signature })
    }
}

impl ApduStatic for ProvideTokenInfoReq<'_> {
    const CLA: u8 = WALLET_APDU_CLA;
    const INS: u8 = Instruction::ProvideTokenInfo as u8;
}

impl Encode for ProvideTokenInfoReq<'_> {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = 0;

        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        // Write descriptor body
        index += self.info.encode(buff)?;

        // Append signature
        buff[index..][..self.signature.len()].copy_from_slice(self.signature);
        index += self.signature.len();

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(self.info.encode_len()? + self.signature.len())
    }
}

impl<'a> Decode<'a> for ProvideTokenInfoReq<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let (info, n) = TokenInfo::decode(buff)?;

        let signature = &buff[n..];
        if !(MIN_SIGNATURE_LEN..=MAX_SIGNATURE_LEN).contains(&signature.len()) {
            return Err(ApduError::InvalidLength);
        }

        Ok((Self { info, signature }, buff.len()))
    }
}
