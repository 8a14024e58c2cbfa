// Copyright (c) 2022-2023 The MobileCoin Foundation

use simplelog::{Config, LevelFilter, SimpleLogger};

/// Initialize test logging, ignoring re-registration between tests
pub fn setup() {
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());
}
