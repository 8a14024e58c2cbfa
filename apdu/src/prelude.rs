// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    address::{ContractAddress, ADDRESS_LEN},
    error::DescriptorError,
    frame_request,
    plugin::{
        PluginDescriptor, SetPluginReq, MAX_METADATA_LEN, MAX_PLUGIN_NAME_LEN, MAX_SIGNATURE_LEN,
        MIN_SIGNATURE_LEN,
    },
    selector::{Selector, SELECTOR_LEN},
    token::{ProvideTokenInfoReq, TokenInfo, MAX_TICKER_LEN},
    unframe_request, ApduError, ApduStatic, Instruction, APDU_BODY_LIMIT, APDU_HEADER_LEN,
    WALLET_APDU_CLA,
};
