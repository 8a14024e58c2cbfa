// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Explicit plugin binding registry
//!
//! Resolution maps a contract call to the signed binding the wallet needs
//! before delegating to a plugin. The registry is a plain value owned and
//! passed by the caller, distribution and storage of its contents are a
//! loading concern outside this crate.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use wallet_plugin_apdu::{address::ContractAddress, selector::Selector};

use crate::{registrar::SignedDescriptor, Error};

/// Resolved plugin binding for one (contract, selector) pair
#[derive(Clone, PartialEq, Debug)]
pub struct PluginBinding {
    /// Installed plugin handling the call
    pub plugin: String,

    /// Framed registration command, ready for the wallet
    pub payload: Vec<u8>,

    /// Authority signature over the command body
    pub signature: Vec<u8>,
}

/// Registry of authority-signed plugin bindings, keyed by contract address
/// and selector
#[derive(Clone, Default, Debug)]
pub struct PluginRegistry {
    bindings: BTreeMap<(ContractAddress, Selector), PluginBinding>,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Insert the binding described by a signed descriptor
    pub fn insert(&mut self, signed: &SignedDescriptor) -> Result<(), Error> {
        let binding = PluginBinding {
            plugin: signed.plugin().to_string(),
            payload: signed.command_bytes()?,
            signature: signed.signature().to_vec(),
        };

        self.bindings
            .insert((signed.address(), signed.selector()), binding);

        Ok(())
    }

    /// Resolve the plugin for a contract call, deriving the selector from
    /// the raw call payload.
    ///
    /// Returns `None` for calls with no registered binding, an error only
    /// when the payload is too short to carry a selector.
    pub fn resolve(
        &self,
        address: &ContractAddress,
        call: &[u8],
    ) -> Result<Option<&PluginBinding>, Error> {
        let selector = Selector::from_payload(call)?;

        let r = self.bindings.get(&(*address, selector));
        match r {
            Some(b) => debug!("found plugin ({}) for selector {}", b.plugin, selector),
            None => debug!("no binding for selector {}", selector),
        }

        Ok(r)
    }

    /// Fetch a binding by exact (address, selector) pair
    pub fn get(&self, address: &ContractAddress, selector: &Selector) -> Option<&PluginBinding> {
        self.bindings.get(&(*address, *selector))
    }

    /// Iterate over registered bindings
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&(ContractAddress, Selector), &PluginBinding)> {
        self.bindings.iter()
    }

    /// Number of registered bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Serialize the registry to the JSON distribution format, a nested
    /// map of lowercase hex contract address to hex selector to binding.
    pub fn to_json(&self) -> Result<String, Error> {
        let mut out: JsonRegistry = BTreeMap::new();

        for ((address, selector), binding) in &self.bindings {
            out.entry(address.to_string()).or_default().insert(
                selector.to_string(),
                JsonBinding {
                    plugin: binding.plugin.clone(),
                    serialized_data: hex::encode(&binding.payload),
                    signature: hex::encode(&binding.signature),
                },
            );
        }

        Ok(serde_json::to_string_pretty(&out)?)
    }

    /// Load a registry from the JSON distribution format
    pub fn from_json(s: &str) -> Result<Self, Error> {
        let parsed: JsonRegistry = serde_json::from_str(s)?;

        let mut registry = Self::new();

        for (address, selectors) in parsed {
            let address = ContractAddress::try_from(hex::decode(strip_0x(&address))?.as_slice())?;

            for (selector, binding) in selectors {
                let selector = Selector::try_from(hex::decode(strip_0x(&selector))?.as_slice())?;

                registry.bindings.insert(
                    (address, selector),
                    PluginBinding {
                        plugin: binding.plugin,
                        payload: hex::decode(&binding.serialized_data)?,
                        signature: hex::decode(&binding.signature)?,
                    },
                );
            }
        }

        Ok(registry)
    }
}

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// On-disk binding entry, byte fields hex-encoded
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
struct JsonBinding {
    plugin: String,
    serialized_data: String,
    signature: String,
}

type JsonRegistry = BTreeMap<String, BTreeMap<String, JsonBinding>>;
