// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fairsem config` - Print the resolved configuration

use super::SemaphoreArgs;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub semaphore: SemaphoreArgs,
}

pub fn show(args: ConfigArgs) -> Result<()> {
    let config = args.semaphore.resolve()?;
    print!("{}", toml::to_string(&config)?);
    Ok(())
}
