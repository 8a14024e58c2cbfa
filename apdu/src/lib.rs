// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for external plugin registration
//!
//! This module provides a protocol specification and reference implementation
//! for registering external call-parsing plugins with a hardware wallet.
//!
//! A plugin binding is an authority-signed descriptor asserting that a named
//! plugin knows how to render calls to a particular (contract address,
//! function selector) pair. The wallet refuses to hand call parsing to a
//! plugin unless the descriptor carries a valid signature from a trusted
//! authority key, so the byte encodings here are a hard contract with the
//! wallet-side parser and must never change silently.
//!
//! Encodings use single length-prefix bytes for variable fields and fixed
//! widths everywhere else, matching the wallet firmware. Multi-byte integer
//! fields are big-endian, following the asset registry format.
//!

#![no_std]

pub use ledger_proto::{ApduError, ApduStatic};

use encdec::Encode;
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString};

pub mod address;
pub mod error;
pub mod plugin;
pub mod prelude;
pub mod selector;
pub mod token;

/// APDU class for the target wallet application
pub const WALLET_APDU_CLA: u8 = 0xe0;

/// Length of the APDU command header (CLA, INS, P1, P2, LEN)
///
/// The authority signature over a registration command covers the command
/// body only, so this is also the number of leading bytes stripped from a
/// framed command before it is handed to a signer.
pub const APDU_HEADER_LEN: usize = 5;

/// Maximum APDU body length (the header carries a single length byte)
pub const APDU_BODY_LIMIT: usize = 255;

/// Wallet APDU instruction codes
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumIter, TryFromPrimitive)]
#[repr(u8)]
pub enum Instruction {
    /// Provide signed token display information
    ProvideTokenInfo = 0x0a,

    /// Register an external plugin for a (contract, selector) pair
    SetExternalPlugin = 0x12,
}

/// Frame a request APDU into the provided buffer, prepending the
/// five-byte command header.
///
/// P1 / P2 are always zero for the commands defined here.
pub fn frame_request<R>(req: &R, buff: &mut [u8]) -> Result<usize, ApduError>
where
    R: ApduStatic + Encode<Error = ApduError>,
{
    let n = req.encode_len()?;

    // Body length must fit the single length byte
    if n > APDU_BODY_LIMIT {
        return Err(ApduError::InvalidLength);
    }

    // Check buffer length is viable
    if buff.len() < APDU_HEADER_LEN + n {
        return Err(ApduError::InvalidLength);
    }

    // Write command header
    buff[0] = R::CLA;
    buff[1] = R::INS;
    buff[2] = 0x00;
    buff[3] = 0x00;
    buff[4] = n as u8;

    // Write body
    let m = req.encode(&mut buff[APDU_HEADER_LEN..])?;

    Ok(APDU_HEADER_LEN + m)
}

/// Split a framed command into instruction and body, checking the
/// class byte and length byte against the buffer.
pub fn unframe_request(buff: &[u8]) -> Result<(Instruction, &[u8]), ApduError> {
    if buff.len() < APDU_HEADER_LEN {
        return Err(ApduError::InvalidLength);
    }

    if buff[0] != WALLET_APDU_CLA {
        return Err(ApduError::InvalidEncoding);
    }

    let ins = Instruction::try_from(buff[1]).map_err(|_| ApduError::InvalidEncoding)?;

    let n = buff[4] as usize;
    if buff.len() < APDU_HEADER_LEN + n {
        return Err(ApduError::InvalidLength);
    }

    Ok((ins, &buff[APDU_HEADER_LEN..][..n]))
}

#[cfg(test)]
pub(crate) mod test {
    use encdec::EncDec;

    use super::*;

    /// Helper for APDU encode / decode tests
    pub fn encode_decode_apdu<'a, A: EncDec<'a, ApduError> + PartialEq>(
        buff: &'a mut [u8],
        apdu: &A,
    ) -> usize {
        // Encode APDU
        let n = apdu.encode(buff).expect("encode failed");

        // Ensure encoded data fits maximum APDU payload
        assert!(
            n <= APDU_BODY_LIMIT,
            "encoded length {n} exceeds maximum APDU payload {APDU_BODY_LIMIT}"
        );

        // Check encoded length matches expected length
        let expected_n = apdu.encode_len().expect("get length failed");
        assert_eq!(n, expected_n, "encode length mismatch");

        // Decode APDU
        let (decoded, decoded_n) = A::decode(&buff[..n]).expect("decode failed");

        // Check decoded object and length match
        assert_eq!(apdu, &decoded);
        assert_eq!(expected_n, decoded_n);

        // Return length, useful for rough confirmation of packing expectations
        n
    }

    #[test]
    fn instruction_codes() {
        use strum::IntoEnumIterator;

        for ins in Instruction::iter() {
            assert_eq!(Instruction::try_from(ins as u8).unwrap(), ins);
        }

        // Unknown instruction codes must not resolve
        assert!(Instruction::try_from(0x13).is_err());
    }
}
