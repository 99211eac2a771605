//! `folioctl`: validate a site config, inspect thumbnail windows, preload
//! media, and drive a gallery session from the terminal.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use folio_config::{ConfigSource, SiteConfig};
use folio_contracts::locale::Localizer;
use folio_core::{
    Gallery, GalleryHandle, GalleryRuntime, MediaCache, PageScroll, ScrollLock,
    Translations, compute_window,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod fetch;
mod render;

use commands::ConsoleAction;
use fetch::AssetFetcher;
use render::StdoutSink;

#[derive(Parser)]
#[command(name = "folioctl", about = "Folio gallery console", version)]
struct Cli {
    /// Site config (TOML or JSON). Defaults to $FOLIO_CONFIG_PATH,
    /// $FOLIO_CONFIG_JSON, then ./folio.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the site config and list warnings
    Check,
    /// Print the thumbnail window for a catalogue size and focus
    Window {
        #[arg(long)]
        total: usize,
        #[arg(long)]
        focus: usize,
    },
    /// Fetch and decode every image of the catalogue
    Preload,
    /// Interactive session: commands on stdin, frames on stdout
    Run {
        /// Autoplay interval in milliseconds (0 disables)
        #[arg(long)]
        autoplay_ms: Option<u64>,
        /// Start in this locale instead of the detected one
        #[arg(long)]
        locale: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Window { total, focus } => {
            let window = compute_window(total, focus);
            let indices: Vec<String> =
                window.map(|index| index.to_string()).collect();
            println!("{}", indices.join(" "));
            Ok(())
        }
        Command::Check => {
            let config = load_config(cli.config)?;
            check(&config)
        }
        Command::Preload => {
            let config = load_config(cli.config)?;
            preload(&config).await
        }
        Command::Run {
            autoplay_ms,
            locale,
        } => {
            let mut config = load_config(cli.config)?;
            if autoplay_ms.is_some() {
                config.gallery.autoplay_interval_ms = autoplay_ms;
            }
            run(config, locale).await
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<SiteConfig> {
    let (config, source) = match path {
        Some(path) => {
            let config = SiteConfig::load_from_file(&path)?;
            (config, ConfigSource::File(path))
        }
        None => SiteConfig::load_from_env()?,
    };
    info!("site config source: {}", source);
    Ok(config)
}

fn check(config: &SiteConfig) -> Result<()> {
    let warnings = config.validate()?;
    let catalogue = config.catalogue()?;
    println!(
        "ok: {} projects ({:?}), locales: {}",
        catalogue.len(),
        catalogue.variant(),
        config.translations().available_locales().join(", ")
    );
    for warning in &warnings {
        println!("warning: {warning}");
    }
    Ok(())
}

async fn preload(config: &SiteConfig) -> Result<()> {
    let catalogue = config.catalogue()?;
    let fetcher = AssetFetcher::new(&config.assets)?;
    let cache = MediaCache::new(Arc::new(fetcher));

    let reports = futures::future::join_all(
        catalogue.iter().map(|project| cache.preload(project)),
    )
    .await;

    let mut failed = 0;
    for report in &reports {
        println!(
            "project {}: {} loaded, {} failed",
            report.project,
            report.loaded.len(),
            report.failed.len()
        );
        for uri in &report.failed {
            println!("  failed: {uri}");
        }
        failed += report.failed.len();
    }

    let stats = cache.stats();
    info!(
        "preload finished: fetches={}, ready={}, failed={}",
        stats.fetches_issued, stats.ready, stats.failed
    );
    if failed > 0 {
        bail!("{failed} media resources failed to load");
    }
    Ok(())
}

async fn run(config: SiteConfig, locale: Option<String>) -> Result<()> {
    let catalogue = Arc::new(config.catalogue()?);
    let translations = Arc::new(config.translations());
    if let Some(locale) = locale {
        translations
            .set_locale_silent(&locale)
            .with_context(|| format!("cannot start in locale {locale}"))?;
    }

    let fetcher = AssetFetcher::new(&config.assets)?;
    let cache = MediaCache::new(Arc::new(fetcher));
    let scroll = ScrollLock::new(Arc::new(PageScroll::new()));
    let localizer: Arc<dyn Localizer> = translations.clone();
    let gallery = Gallery::new(
        catalogue,
        cache,
        localizer,
        scroll,
        config.gallery.clone(),
    );

    let (runtime, handle) =
        GalleryRuntime::new(gallery, translations.subscribe(), StdoutSink);
    let (gallery, console) =
        tokio::join!(runtime.run(), console(handle, translations));

    let stats = gallery.cache().stats();
    info!(
        "session ended: project={}, fetches={}, joins={}",
        gallery.carousel().current_project(),
        stats.fetches_issued,
        stats.single_flight_joins
    );
    console
}

/// Reads console commands until `quit` or end of input. Dropping the handle
/// lets the runtime drain and stop.
async fn console(
    handle: GalleryHandle,
    translations: Arc<Translations>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read from stdin")?
    {
        match commands::parse(&line) {
            Ok(ConsoleAction::Events(events)) => {
                for event in events {
                    if !handle.send(event) {
                        return Ok(());
                    }
                }
            }
            Ok(ConsoleAction::Locale(code)) => {
                if let Err(err) = translations.set_locale(&code) {
                    warn!("{}", err);
                }
            }
            Ok(ConsoleAction::Help) => println!("{}", commands::HELP),
            Ok(ConsoleAction::Quit) => break,
            Ok(ConsoleAction::Nothing) => {}
            Err(message) => eprintln!("{message} (try 'help')"),
        }
    }
    Ok(())
}
