// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command line interface.

pub mod flags;
pub mod service;

use crate::config::Config;
pub use service::{CreateArgs, ServiceOperation};

#[derive(clap::Parser, Clone, Debug)]
#[clap(name = "kn", author, version, about = "Manage Knative Serving resources", long_about = None)]
pub struct KnCli {
    #[command(subcommand)]
    pub command: KnCommands,
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum KnCommands {
    /// Manage Knative services
    #[clap(aliases = &["services", "ksvc"])]
    Service {
        #[command(subcommand)]
        opt: ServiceOperation,
    },
}

pub async fn run(cli: &KnCli, config: &Config) -> anyhow::Result<()> {
    match &cli.command {
        KnCommands::Service { opt } => service::handle_service_command(opt, config).await,
    }
}
