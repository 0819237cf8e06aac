// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `kn service` subcommands

use crate::commands::flags::{EditFlags, WaitFlags};
use crate::config::Config;
use crate::error::{KnError, Result};
use crate::kubernetes::{resolve_namespace, KubeServingClient, ServingClient};
use crate::service::{construct_service, create_service, replace_service, service_exists};
use kube::Client;
use std::io::Write;
use tracing::info;

#[derive(clap::Subcommand, Clone, Debug)]
pub enum ServiceOperation {
    /// Create a service, or replace it with --force
    #[clap(aliases = &["c"])]
    Create(CreateArgs),
}

/// Arguments of `kn service create NAME --image IMAGE`
#[derive(clap::Args, Clone, Debug)]
pub struct CreateArgs {
    /// Name of the service
    pub name: String,
    /// Namespace to use instead of the configured or kubeconfig default
    #[arg(short, long)]
    pub namespace: Option<String>,
    #[clap(flatten)]
    pub edit: EditFlags,
    #[clap(flatten)]
    pub wait: WaitFlags,
}

impl CreateArgs {
    /// Checks that need no cluster access
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(KnError::Usage(
                "'service create' requires the service name given as single argument".to_string(),
            ));
        }
        if self.edit.image.as_deref().unwrap_or_default().is_empty() {
            return Err(KnError::Usage(
                "'service create' requires the image name to run provided with the --image option"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn handle_service_command(operation: &ServiceOperation, config: &Config) -> anyhow::Result<()> {
    match operation {
        ServiceOperation::Create(args) => handle_service_create(args, config).await,
    }
}

async fn handle_service_create(args: &CreateArgs, config: &Config) -> anyhow::Result<()> {
    args.validate()?;

    let client = Client::try_default().await?;
    let namespace = resolve_namespace(args.namespace.as_deref(), config, client.default_namespace());
    let serving = KubeServingClient::new(client, &namespace);

    let mut stdout = std::io::stdout();
    create_or_replace(args, &serving, config, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}

/// Create the service, or replace it when it exists and --force was given
pub async fn create_or_replace<C: ServingClient + ?Sized>(
    args: &CreateArgs,
    client: &C,
    config: &Config,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    args.validate()?;

    let mut service = construct_service(&args.edit, &args.name, client.namespace())?;
    let wait = args.wait.with_default_timeout(config.wait_timeout);

    if service_exists(client, &args.name).await? {
        if !args.edit.force {
            return Err(KnError::Usage(format!(
                "cannot create service '{}' in namespace '{}' because the service already exists and no --force option was given",
                args.name,
                client.namespace()
            )));
        }
        info!("Service {} exists, replacing it", args.name);
        replace_service(client, &mut service, &wait, out).await
    } else {
        create_service(client, &service, &wait, out).await
    }
}
