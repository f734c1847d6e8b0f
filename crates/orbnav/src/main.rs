use anyhow::Context;
use clap::Parser;
use orbkit::page::HOME_PAGE;
use orbkit::{IdleMotion, PageId, ThemeStore, ViewportState};
use orbnav::config;
use orbnav::gui::app::{AppInit, AppModel, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use orbnav::gui::orbs::Session;
use orbnav::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orbnav", version, about, long_about = None)]
struct Cli {
    /// Page to open first (file stem, e.g. `about`)
    #[arg(short, long, default_value = HOME_PAGE)]
    page: String,

    /// Seed for orb scatter and jitter, for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Idle motion style (`physics` or `bumble`), overriding the config file
    #[arg(long)]
    idle: Option<IdleMotion>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the default configuration file (to `--config` if given), print its path and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if cli.init_config {
        config::write_default_config(&config_path).context("Failed to write default config")?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let mut config = config::load_or_default(&config_path);
    if let Some(idle) = cli.idle {
        config.idle = idle;
    }

    let theme_store = ThemeStore::new(config::get_theme_path()?);
    let viewport = ViewportState::new(DEFAULT_WIDTH as f64, DEFAULT_HEIGHT as f64);
    let session = Session::new(
        &config,
        PageId::new(cli.page),
        viewport,
        theme_store.load(),
        cli.seed,
    )
    .context("Invalid navigation table")?;

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, config_path.clone());

    let app = RelmApp::new("org.orbnav.orbnav").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        session,
        config,
        config_path,
        seed: cli.seed,
        theme_store,
        events: rx,
    });
    Ok(())
}
