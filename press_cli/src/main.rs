mod cli;
mod error_fmt;
mod run;

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};

fn main() {
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    match try_main(&args) {
        Ok(()) => {}
        Err(err) => {
            if *JSON_MODE.get().unwrap_or(&false) {
                eprintln!("{}", error_fmt::format_error_json(&err));
            } else {
                eprintln!("{}", error_fmt::humanize(&err));
            }
            std::process::exit(error_fmt::exit_code_for_error(&err));
        }
    }
}

fn try_main(args: &Cli) -> eyre::Result<()> {
    let text = fs::read_to_string(&args.config)
        .wrap_err_with(|| format!("read config file {}", args.config.display()))?;
    let cfg = toml::from_str::<press_config::Config>(&text).wrap_err("parse config TOML")?;
    cfg.validate()?;

    init_logging(args.json, &args.log_level, &cfg.logging)?;
    tracing::info!(config = %args.config.display(), "configuration loaded");

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::SeqCst);
        })
        .wrap_err("install Ctrl-C handler")?;
    }

    match args.cmd {
        Commands::Run { cycles } => {
            let mut core = run::build_core(&cfg)?;
            run::execute(&mut core, cycles, &shutdown)
        }
        Commands::SelfCheck => run::self_check(&cfg),
    }
}

/// Console logging to stderr (pretty or JSON lines) plus an optional JSON
/// file appender, rotated per the config. stdout stays clean for telemetry.
fn init_logging(
    json: bool,
    level: &str,
    logging: &press_config::Logging,
) -> eyre::Result<()> {
    let level = logging.level.as_deref().unwrap_or(level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let file = match &logging.file {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name"))?;
            let dir = dir.unwrap_or_else(|| std::path::Path::new("."));
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| eyre::eyre!("init logging: {e}"))?;
    Ok(())
}
