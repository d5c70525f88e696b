mod config;
mod contact;
mod filter;
mod logging;
mod remote;
mod route;
mod session;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use config::Config;
use remote::http::HttpContactSource;
use remote::{ContactSource, Scope};
use route::RouteMarker;
use session::ListKind;

#[derive(Parser, Debug)]
#[command(name = "teledex")]
struct Cli {
    /// Path to a configuration file (defaults to the platform config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Open a list popup on startup, as if following a modal deep link
    #[arg(long, value_enum)]
    modal: Option<ModalArg>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one page of contacts and print it (id<TAB>country<TAB>phone)
    List(ListArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Which collection to page through
    #[arg(long, value_enum, default_value = "all")]
    scope: ScopeArg,

    /// Page number to fetch
    #[arg(long, default_value_t = 1)]
    page: u32,
}

#[derive(Clone, Debug, ValueEnum)]
enum ScopeArg {
    All,
    Country,
}

/// Startup deep link: `A` opens the all-contacts popup, `B` the
/// country-scoped one, matching the route marker letters.
#[derive(Clone, Debug, ValueEnum)]
enum ModalArg {
    A,
    B,
}

impl From<ModalArg> for ListKind {
    fn from(arg: ModalArg) -> Self {
        match arg {
            ModalArg::A => ListKind::All,
            ModalArg::B => ListKind::Country,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    if let Some(command) = cli.command {
        match command {
            Command::List(args) => return handle_list(args, &config).await,
        }
    }

    logging::init(&config.data_dir)?;
    info!(path = %config.config_path.display(), "configuration loaded");

    // A marker left behind by an earlier run means that run did not exit
    // cleanly; the route must reflect this process only
    let route = RouteMarker::new(&config.data_dir);
    if let Some(kind) = route.read()? {
        info!(marker = %kind.marker_letter(), "clearing stale route marker");
        route.clear()?;
    }

    let source = HttpContactSource::new(config.api.base_url.clone(), config.api.timeout)?;
    let mut app = ui::app::App::new(source, config);
    if let Some(modal) = cli.modal {
        app.open_list(modal.into());
    }
    app.run().await
}

/// One-shot page fetch for scripting. Unlike the TUI, errors here are
/// reported and fail the process.
async fn handle_list(args: ListArgs, config: &Config) -> Result<()> {
    let source = HttpContactSource::new(config.api.base_url.clone(), config.api.timeout)?;
    let scope = match args.scope {
        ScopeArg::All => Scope::All,
        ScopeArg::Country => Scope::Country(config.ui.country.clone()),
    };

    let contacts = source
        .fetch_page(&scope, args.page)
        .await
        .with_context(|| format!("fetching page {} of {}", args.page, scope))?;

    if contacts.is_empty() {
        println!("No contacts on page {}", args.page);
        return Ok(());
    }

    // Results: id<TAB>country<TAB>phone
    for contact in contacts {
        println!(
            "{}\t{}\t{}",
            contact.id,
            contact.country_name().unwrap_or("-"),
            contact.phone
        );
    }

    Ok(())
}
