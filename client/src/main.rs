//! Command-line entry point: one authenticated call against the marketplace
//! backend, plus sign-in and sign-out of the stored credential pair.

use std::ffi::OsString;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use pagination::{IndexBase, PaginationState};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use client::config::ClientSettings;
use client::domain::{CallResult, CredentialPair, ExecuteError, TaskTracker};
use client::outbound::http::ApiRequest;
use client::session::ClientSession;

/// `client` command arguments. Connection settings come from `ATELIER_*`
/// variables and configuration files.
#[derive(Debug, Parser)]
#[command(
    name = "client",
    about = "Authenticated client for the bridal marketplace backend",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the first page of a path (defaults to the configured path).
    Get {
        /// Request path relative to the base URL.
        path: Option<String>,
    },
    /// Store a credential pair obtained from the login flow.
    SignIn {
        /// Access credential.
        #[arg(long)]
        access: String,
        /// Refresh credential.
        #[arg(long)]
        refresh: String,
    },
    /// Forget the stored credential pair.
    SignOut,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("client")])
        .map_err(|error| eyre!("failed to load settings: {error}"))?;
    let session =
        ClientSession::from_settings(&settings).wrap_err("failed to start client session")?;

    match args.command.unwrap_or(Command::Get { path: None }) {
        Command::Get { path } => {
            let path = path.unwrap_or_else(|| settings.path().to_owned());
            fetch(&session, &settings, path).await
        }
        Command::SignIn { access, refresh } => {
            let pair =
                CredentialPair::parse(access, refresh).wrap_err("refusing malformed credentials")?;
            session.sign_in(&pair);
            Ok(())
        }
        Command::SignOut => {
            session.sign_out();
            Ok(())
        }
    }
}

async fn fetch(session: &ClientSession, settings: &ClientSettings, path: String) -> Result<()> {
    if !session.is_signed_in() {
        warn!("no credential pair stored; the call goes out unauthenticated");
    }

    let mut paging = PaginationState::new(IndexBase::Zero, settings.page_size());
    let tracker: TaskTracker<CallResult<Value>, ExecuteError> = TaskTracker::new();
    let result = tracker
        .run(session.fetch_page(ApiRequest::get(path.as_str()), &mut paging))
        .await
        .wrap_err_with(|| format!("GET {path} failed"))?;

    info!(
        status = %result.status(),
        success = result.is_success(),
        "call finished"
    );
    println!("status={}", result.status());
    println!("message={}", result.message());
    match result {
        CallResult::Item { item, .. } => {
            if let Some(item) = item {
                println!("item={item}");
            }
        }
        CallResult::List { page, .. } => {
            println!("items={}", page.items.len());
            println!("page_index={}", paging.page_index());
            println!("total_pages={}", paging.cursor().total_pages);
            println!("has_next_page={}", paging.cursor().has_next_page);
        }
        CallResult::Failure { .. } => {}
    }
    Ok(())
}
