use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tintuc::app::AppContext;
use tintuc::cli::{commands, Cli, Commands};
use tintuc::config::Config;
use tintuc::render::links::LinkClassifier;
use tintuc::render::Renderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    init_tracing(matches!(command, Commands::Tui))?;

    if let Commands::Blocks { path, render } = &command {
        let renderer = if *render {
            let config = Config::load()?;
            Some(Renderer::new(LinkClassifier::new(&config.api.site_origin)))
        } else {
            None
        };
        commands::print_blocks(path, renderer.as_ref())?;
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(url) = cli.url {
        config.api.summary_url = url;
    }
    let (ctx, outcomes) = AppContext::new(config)?;

    match command {
        Commands::Home => {
            commands::print_home(&ctx).await?;
        }
        Commands::Article { id } => {
            commands::print_article(&ctx, &id).await?;
        }
        Commands::Tui => {
            tintuc::tui::run(Arc::new(ctx), outcomes).await?;
        }
        Commands::Blocks { .. } => {}
    }

    Ok(())
}

/// Logs go to stderr, except in the TUI where they would corrupt the screen
/// and go to `<cache dir>/tintuc/tintuc.log` instead.
fn init_tracing(tui: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env();

    if !tui {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
        return Ok(());
    }

    let Some(path) = log_path()? else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}

fn log_path() -> anyhow::Result<Option<PathBuf>> {
    let Some(cache_dir) = dirs::cache_dir() else {
        return Ok(None);
    };
    let dir = cache_dir.join("tintuc");
    fs::create_dir_all(&dir)?;
    Ok(Some(dir.join("tintuc.log")))
}
