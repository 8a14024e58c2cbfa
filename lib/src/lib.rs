// Copyright (c) 2022-2023 The MobileCoin Foundation

//! External plugin descriptor library
//!
//! A hardware wallet can only render an opaque smart-contract call for the
//! user by delegating to an installed plugin, and it will only trust a plugin
//! for a given (contract address, selector) pair when handed a descriptor
//! signed by a known authority key. This library builds those descriptors:
//! deriving selectors from call payloads, validating and serializing the
//! binding, feeding the exact signable bytes to an [`AuthoritySigner`], and
//! assembling the final signed command the wallet parses.
//!
//! Wire encodings live in [`wallet_plugin_apdu`], re-exported as [`apdu`].
//!

// Re-export `wallet-plugin-apdu` for consumers
pub use wallet_plugin_apdu::{self as apdu};

mod error;
pub use error::Error;

mod signer;
pub use signer::{AuthoritySigner, Keychain, SignerError};

mod registrar;
pub use registrar::{
    unsigned_plugin_command, Registrar, SignedDescriptor, SignedTokenInfo, SIGNED_PAYLOAD_OFFSET,
};

mod registry;
pub use registry::{PluginBinding, PluginRegistry};
