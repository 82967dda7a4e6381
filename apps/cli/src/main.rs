// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: write the EHCAL tower mapping file
//!
//! Usage:
//!   make-tower-map [SETUP]
//!
//! Writes `towerMap_EHCAL_<SETUP>.txt` into the current directory.
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::Context;
use clap::Parser;
use std::env;

#[derive(Parser, Debug)]
#[command(name = "make-tower-map")]
#[command(about = "Generate the EHCAL tower mapping table")]
struct Args {
    /// Parameter set to use; also names the output file
    #[arg(default_value = towermap_core::DEFAULT_SETUP)]
    setup: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args = Args::parse();

    let dir = env::current_dir().context("cannot determine working directory")?;
    let summary = towermap_core::generate_mapping(&args.setup, &dir)
        .with_context(|| format!("failed to generate mapping for setup '{}'", args.setup))?;

    tracing::debug!(path = %summary.path.display(), "Done");
    Ok(())
}
