// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Descriptor build / sign / assemble pipeline
//!
//! [`Registrar`] drives the full flow: serialize the unsigned command,
//! hand the signable slice to an [`AuthoritySigner`], then assemble the
//! framed command the wallet parses. Every validation failure aborts
//! before any bytes reach the signer.

use encdec::Encode;
use log::debug;

use wallet_plugin_apdu::{
    address::ContractAddress,
    frame_request,
    plugin::{PluginDescriptor, SetPluginReq},
    selector::Selector,
    token::{ProvideTokenInfoReq, TokenInfo},
    APDU_HEADER_LEN,
};

use crate::{signer::AuthoritySigner, Error};

/// Number of leading bytes of a framed command excluded from the signed
/// payload: the command header (CLA, INS, P1, P2, LEN).
///
/// This offset is a pinned protocol constant, applied identically by the
/// signing side here and by the wallet's verification code. The trailing
/// signature is likewise never part of the signed payload.
pub const SIGNED_PAYLOAD_OFFSET: usize = APDU_HEADER_LEN;

/// Serialize the unsigned (framed, signature-less) plugin registration
/// command.
///
/// The authority signature is computed over these bytes starting at
/// [`SIGNED_PAYLOAD_OFFSET`].
pub fn unsigned_plugin_command(descriptor: &PluginDescriptor) -> Result<Vec<u8>, Error> {
    let mut buff = vec![0u8; APDU_HEADER_LEN + descriptor.encode_len()?];

    let n = frame_request(descriptor, &mut buff)?;
    buff.truncate(n);

    Ok(buff)
}

/// Builds and signs registration commands via an [`AuthoritySigner`]
pub struct Registrar<S: AuthoritySigner> {
    signer: S,
}

impl<S: AuthoritySigner> Registrar<S> {
    /// Create a registrar backed by the provided authority signer
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    /// Build, sign and assemble a plugin registration command.
    ///
    /// The descriptor is serialized, the command body (header excluded) is
    /// signed, and the signature is appended to form the final artifact.
    pub fn register_plugin(&self, descriptor: &PluginDescriptor) -> Result<SignedDescriptor, Error> {
        let unsigned = unsigned_plugin_command(descriptor)?;

        // Sign the command body, excluding the transport header
        let signature = self.signer.sign(&unsigned[SIGNED_PAYLOAD_OFFSET..])?;

        debug!(
            "signed plugin binding '{}' for {} / {}",
            descriptor.name, descriptor.address, descriptor.selector
        );

        SignedDescriptor::new(descriptor, signature)
    }

    /// Validate raw binding parts and register the resulting descriptor.
    ///
    /// Malformed parts fail here, before the signer is ever invoked.
    pub fn register_plugin_parts(
        &self,
        name: &str,
        address: &[u8],
        selector: &[u8],
        metadata: &[u8],
    ) -> Result<SignedDescriptor, Error> {
        let descriptor = PluginDescriptor::from_parts(name, address, selector, metadata)?;
        self.register_plugin(&descriptor)
    }

    /// Build, sign and assemble a token information command.
    ///
    /// Token descriptors are signed over the whole body with no header
    /// offset, matching the asset registry format.
    pub fn register_token(&self, info: &TokenInfo) -> Result<SignedTokenInfo, Error> {
        let mut body = vec![0u8; info.encode_len()?];
        info.encode(&mut body)?;

        let signature = self.signer.sign(&body)?;

        debug!("signed token info '{}' for {}", info.ticker, info.address);

        SignedTokenInfo::new(info, signature)
    }
}

/// Signed plugin registration artifact.
///
/// Owns the descriptor fields and signature, immutable once assembled.
/// [`SignedDescriptor::command_bytes`] re-emits the identical framed
/// command on every call.
#[derive(Clone, PartialEq, Debug)]
pub struct SignedDescriptor {
    plugin: String,
    address: ContractAddress,
    selector: Selector,
    metadata: Vec<u8>,
    signature: Vec<u8>,
}

impl SignedDescriptor {
    fn new(descriptor: &PluginDescriptor, signature: Vec<u8>) -> Result<Self, Error> {
        // Signature length is checked by the wire type before assembly
        SetPluginReq::new(*descriptor, &signature)?;

        Ok(Self {
            plugin: descriptor.name.to_string(),
            address: descriptor.address,
            selector: descriptor.selector,
            metadata: descriptor.metadata.to_vec(),
            signature,
        })
    }

    /// Plugin identifier this binding names
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Bound contract address
    pub fn address(&self) -> ContractAddress {
        self.address
    }

    /// Bound function selector
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Opaque binding metadata
    pub fn metadata(&self) -> &[u8] {
        &self.metadata
    }

    /// Authority signature over the command body
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Reconstruct the borrowed wire request
    pub fn request(&self) -> Result<SetPluginReq<'_>, Error> {
        let descriptor =
            PluginDescriptor::new(&self.plugin, self.address, self.selector, &self.metadata)?;

        Ok(SetPluginReq::new(descriptor, &self.signature)?)
    }

    /// Serialize the final framed command for wallet consumption
    pub fn command_bytes(&self) -> Result<Vec<u8>, Error> {
        let req = self.request()?;

        let mut buff = vec![0u8; APDU_HEADER_LEN + req.encode_len()?];
        let n = frame_request(&req, &mut buff)?;
        buff.truncate(n);

        Ok(buff)
    }
}

/// Signed token information artifact
#[derive(Clone, PartialEq, Debug)]
pub struct SignedTokenInfo {
    ticker: String,
    address: ContractAddress,
    decimals: u32,
    chain_id: u32,
    signature: Vec<u8>,
}

impl SignedTokenInfo {
    fn new(info: &TokenInfo, signature: Vec<u8>) -> Result<Self, Error> {
        ProvideTokenInfoReq::new(*info, &signature)?;

        Ok(Self {
            ticker: info.ticker.to_string(),
            address: info.address,
            decimals: info.decimals,
            chain_id: info.chain_id,
            signature,
        })
    }

    /// Token ticker
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Token contract address
    pub fn address(&self) -> ContractAddress {
        self.address
    }

    /// Authority signature over the descriptor body
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Reconstruct the borrowed wire request
    pub fn request(&self) -> Result<ProvideTokenInfoReq<'_>, Error> {
        let info = TokenInfo::new(&self.ticker, self.address, self.decimals, self.chain_id)?;

        Ok(ProvideTokenInfoReq::new(info, &self.signature)?)
    }

    /// Serialize the final framed command for wallet consumption
    pub fn command_bytes(&self) -> Result<Vec<u8>, Error> {
        let req = self.request()?;

        let mut buff = vec![0u8; APDU_HEADER_LEN + req.encode_len()?];
        let n = frame_request(&req, &mut buff)?;
        buff.truncate(n);

        Ok(buff)
    }
}
