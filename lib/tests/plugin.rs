// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::cell::Cell;

use ed25519_dalek::{Signature, Verifier};
use encdec::Decode;
use log::info;
use rand::RngCore;

use wallet_plugin::apdu::prelude::*;
use wallet_plugin::{
    unsigned_plugin_command, AuthoritySigner, Error, Keychain, PluginRegistry, Registrar,
    SignerError, SIGNED_PAYLOAD_OFFSET,
};

mod helpers;
use helpers::setup;

/// Fixed test authority seed, the "certificate authority loaded" profile
const CA_SEED: &[u8; 32] = b"wallet-plugin-test-authority-key";

/// Uniswap v2 router
const ROUTER: [u8; 20] = [
    0x7a, 0x25, 0x0d, 0x56, 0x30, 0xb4, 0xcf, 0x53, 0x97, 0x39, 0xdf, 0x2c, 0x5d, 0xac, 0xb4,
    0xc6, 0x59, 0xf2, 0x48, 0x8d,
];

/// swapExactTokensForTokens(uint256,uint256,address[],address,uint256)
const SWAP_SELECTOR: [u8; 4] = [0x38, 0xed, 0x17, 0x39];

fn authority() -> Keychain {
    let mut seed = *CA_SEED;

    let mut keys = Keychain::new();
    keys.insert_seed("CAL", &mut seed);

    keys
}

fn descriptor() -> PluginDescriptor<'static> {
    PluginDescriptor::new(
        "PluginBoilerplate",
        ContractAddress::new(ROUTER),
        Selector::new(SWAP_SELECTOR),
        &[],
    )
    .unwrap()
}

#[test]
fn end_to_end_registration() -> Result<(), Error> {
    setup();

    let keys = authority();
    let registrar = Registrar::new(keys.signer("CAL")?);

    // A call payload carries the selector in its first four bytes
    let mut call = vec![0u8; 100];
    call[..4].copy_from_slice(&SWAP_SELECTOR);
    assert_eq!(Selector::from_payload(&call)?, Selector::new(SWAP_SELECTOR));

    let signed = registrar.register_plugin(&descriptor())?;
    let cmd = signed.command_bytes()?;

    info!("signed command: {}", hex::encode(&cmd));

    // Framing: class, instruction, zero P1/P2, body length byte
    assert_eq!(cmd[0], WALLET_APDU_CLA);
    assert_eq!(cmd[1], Instruction::SetExternalPlugin as u8);
    assert_eq!(&cmd[2..4], &[0, 0]);
    assert_eq!(cmd[4] as usize, cmd.len() - APDU_HEADER_LEN);

    // Serialized selector field is bit-exact at its fixed offset
    let selector_offset = APDU_HEADER_LEN + 1 + "PluginBoilerplate".len() + ADDRESS_LEN;
    assert_eq!(&cmd[selector_offset..][..4], &SWAP_SELECTOR);

    // The authority signature covers the command body, header excluded
    let unsigned = unsigned_plugin_command(&descriptor())?;
    let sig = Signature::from_bytes(signed.signature().try_into().expect("64-byte signature"));
    keys.verifying_key("CAL")?
        .verify(&unsigned[SIGNED_PAYLOAD_OFFSET..], &sig)
        .expect("authority signature must verify");

    // Signing is reproducible byte-for-byte across runs
    let again = Registrar::new(keys.signer("CAL")?).register_plugin(&descriptor())?;
    assert_eq!(cmd, again.command_bytes()?);

    // The wallet-side parser recovers the exact binding
    let (ins, body) = unframe_request(&cmd)?;
    assert_eq!(ins, Instruction::SetExternalPlugin);

    let (req, _) = SetPluginReq::decode(body)?;
    assert_eq!(req.descriptor, descriptor());
    assert_eq!(req.signature, signed.signature());

    Ok(())
}

#[test]
fn assembly_idempotent() -> Result<(), Error> {
    setup();

    let keys = authority();
    let signed = Registrar::new(keys.signer("CAL")?).register_plugin(&descriptor())?;

    assert_eq!(signed.command_bytes()?, signed.command_bytes()?);

    Ok(())
}

/// Signer double asserting it is never reached
#[derive(Default)]
struct CountingSigner {
    calls: Cell<usize>,
}

impl AuthoritySigner for CountingSigner {
    fn sign(&self, _data: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.calls.set(self.calls.get() + 1);
        Ok(vec![0u8; 64])
    }
}

#[test]
fn validation_precedes_signing() {
    setup();

    let signer = CountingSigner::default();
    let registrar = Registrar::new(&signer);

    // Empty identifier
    let r = registrar.register_plugin_parts("", &ROUTER, &SWAP_SELECTOR, &[]);
    assert!(matches!(
        r,
        Err(Error::Descriptor(DescriptorError::InvalidIdentifier))
    ));

    // Truncated and oversized addresses
    for n in [19, 21] {
        let r = registrar.register_plugin_parts("PluginBoilerplate", &[0u8; 32][..n], &SWAP_SELECTOR, &[]);
        assert!(matches!(
            r,
            Err(Error::Descriptor(DescriptorError::InvalidAddress(m))) if m == n
        ));
    }

    // Truncated and oversized selectors
    for n in [3, 5] {
        let r = registrar.register_plugin_parts("PluginBoilerplate", &ROUTER, &[0u8; 8][..n], &[]);
        assert!(matches!(
            r,
            Err(Error::Descriptor(DescriptorError::InvalidSelector(m))) if m == n
        ));
    }

    // No malformed binding ever reached the signer
    assert_eq!(signer.calls.get(), 0);
}

#[test]
fn signer_errors_surface_unchanged() {
    setup();

    struct FailingSigner;

    impl AuthoritySigner for FailingSigner {
        fn sign(&self, _data: &[u8]) -> Result<Vec<u8>, SignerError> {
            Err(SignerError::Backend(anyhow::anyhow!("HSM offline")))
        }
    }

    let r = Registrar::new(FailingSigner).register_plugin(&descriptor());
    assert!(matches!(r, Err(Error::Signer(SignerError::Backend(_)))));

    let keys = Keychain::new();
    assert!(matches!(
        keys.signer("CAL"),
        Err(SignerError::KeyUnavailable(_))
    ));
}

#[test]
fn registry_resolution() -> Result<(), Error> {
    setup();

    let keys = authority();
    let signed = Registrar::new(keys.signer("CAL")?).register_plugin(&descriptor())?;

    let mut registry = PluginRegistry::new();
    registry.insert(&signed)?;
    assert_eq!(registry.len(), 1);

    let address = ContractAddress::new(ROUTER);

    // Bound call resolves to the registered plugin, whatever its arguments
    let mut call = vec![0u8; 68];
    rand::thread_rng().fill_bytes(&mut call);
    call[..4].copy_from_slice(&SWAP_SELECTOR);

    let binding = registry.resolve(&address, &call)?.expect("binding expected");
    assert_eq!(binding.plugin, "PluginBoilerplate");
    assert_eq!(binding.payload, signed.command_bytes()?);

    // Unbound selector resolves to nothing
    call[..4].copy_from_slice(&[0xa9, 0x05, 0x9c, 0xbb]);
    assert!(registry.resolve(&address, &call)?.is_none());

    // Payloads too short to carry a selector are rejected
    let r = registry.resolve(&address, &call[..3]);
    assert!(matches!(
        r,
        Err(Error::Descriptor(DescriptorError::InvalidPayload(3)))
    ));

    Ok(())
}

#[test]
fn registry_json_round_trip() -> Result<(), Error> {
    setup();

    let keys = authority();
    let registrar = Registrar::new(keys.signer("CAL")?);

    let mut registry = PluginRegistry::new();
    registry.insert(&registrar.register_plugin(&descriptor())?)?;
    registry.insert(&registrar.register_plugin_parts(
        "PluginBoilerplate",
        &ROUTER,
        &[0x18, 0xcb, 0xaf, 0xe5],
        &[1, 2, 3, 4],
    )?)?;

    let json = registry.to_json()?;
    let loaded = PluginRegistry::from_json(&json)?;

    assert_eq!(loaded.len(), registry.len());

    let address = ContractAddress::new(ROUTER);
    let selector = Selector::new(SWAP_SELECTOR);
    assert_eq!(
        loaded.get(&address, &selector),
        registry.get(&address, &selector)
    );

    Ok(())
}
