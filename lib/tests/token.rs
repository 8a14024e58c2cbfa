// Copyright (c) 2022-2023 The MobileCoin Foundation

use ed25519_dalek::{Signature, Verifier};
use encdec::Decode;

use wallet_plugin::apdu::prelude::*;
use wallet_plugin::{Error, Keychain, Registrar};

mod helpers;
use helpers::setup;

const CA_SEED: &[u8; 32] = b"wallet-plugin-test-authority-key";

/// WETH
const TOKEN: [u8; 20] = [
    0xc0, 0x2a, 0xaa, 0x39, 0xb2, 0x23, 0xfe, 0x8d, 0x0a, 0x0e, 0x5c, 0x4f, 0x27, 0xea, 0xd9,
    0x08, 0x3c, 0x75, 0x6c, 0xc2,
];

fn authority() -> Keychain {
    let mut seed = *CA_SEED;

    let mut keys = Keychain::new();
    keys.insert_seed("CAL", &mut seed);

    keys
}

#[test]
fn token_registration() -> Result<(), Error> {
    setup();

    let keys = authority();
    let registrar = Registrar::new(keys.signer("CAL")?);

    let info = TokenInfo::new("WETH", ContractAddress::new(TOKEN), 18, 1)?;
    let signed = registrar.register_token(&info)?;

    let cmd = signed.command_bytes()?;

    // Framing
    assert_eq!(cmd[0], WALLET_APDU_CLA);
    assert_eq!(cmd[1], Instruction::ProvideTokenInfo as u8);
    assert_eq!(cmd[4] as usize, cmd.len() - APDU_HEADER_LEN);

    // Token descriptors sign over the whole body, no header offset
    let body_len = cmd.len() - APDU_HEADER_LEN - signed.signature().len();
    let sig = Signature::from_bytes(signed.signature().try_into().expect("64-byte signature"));
    keys.verifying_key("CAL")?
        .verify(&cmd[APDU_HEADER_LEN..][..body_len], &sig)
        .expect("authority signature must verify");

    // Reproducible across runs
    assert_eq!(cmd, registrar.register_token(&info)?.command_bytes()?);

    // Wallet-side parse recovers ticker, decimals and chain
    let (ins, body) = unframe_request(&cmd)?;
    assert_eq!(ins, Instruction::ProvideTokenInfo);

    let (req, _) = ProvideTokenInfoReq::decode(body)?;
    assert_eq!(req.info, info);
    assert_eq!(req.signature, signed.signature());

    Ok(())
}
