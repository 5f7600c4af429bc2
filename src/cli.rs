use crate::{
    config::Config,
    document::sample_value,
    fetch::{Fetcher, fetch_and_parse},
    loader::{self, PageContext, TerminalState},
    render,
    util::{default_page_address, ensure_dir, now_rfc3339, parse_page_address},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "probe-render")]
#[command(about = "Load independence probe results and render them as HTML cards")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./probe-render.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the page's probe data and write the rendered page.
    Run {
        /// Page address whose `data` query parameter picks the document.
        #[arg(long)]
        page: Option<String>,
        /// Set the page's `data` parameter.
        #[arg(long)]
        data: Option<String>,
        /// Output file. Defaults to output.path, then stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write only the region contents instead of a full page.
        #[arg(long)]
        fragment: bool,
    },
    /// Fetch and decode one document and print it with placeholders applied.
    Decode {
        #[arg(long)]
        locator: String,
        #[arg(long)]
        page: Option<String>,
    },
    /// Print the built-in sample document.
    Sample {},
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path),
        None => Ok(Config::default()),
    };
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(err) => {
            // Still get the failure onto the log.
            let _ = init_logging(&args, &Config::default());
            return Err(err);
        }
    };
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Run {
            page,
            data,
            out,
            fragment,
        } => run(&cfg, page.as_deref(), data.as_deref(), out.as_deref(), *fragment),
        Command::Decode { locator, page } => decode(&cfg, locator, page.as_deref()),
        Command::Sample {} => {
            println!("{}", serde_json::to_string_pretty(&sample_value())?);
            Ok(())
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("probe-render.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr; stdout carries the page and JSON output.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = Path::new(&cfg.logging.file_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn page_address(cfg: &Config, user: Option<&str>) -> Result<Url> {
    match user.or(Some(cfg.page.address.as_str()).filter(|a| !a.is_empty())) {
        Some(raw) => parse_page_address(raw),
        None => default_page_address(),
    }
}

/// Single-threaded, like the page event loop the loader was built for.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| "building tokio runtime")
}

fn run(
    cfg: &Config,
    page: Option<&str>,
    data: Option<&str>,
    out: Option<&Path>,
    fragment: bool,
) -> Result<()> {
    let mut address = page_address(cfg, page)?;
    if let Some(locator) = data {
        address = loader::with_data_param(&address, locator);
    }
    info!(page = %address, "page ready");

    let fetcher = Fetcher::new(cfg)?;
    let mut ctx = PageContext::new(address, &cfg.page.region_id);
    let state = runtime()?.block_on(loader::run(&mut ctx, &fetcher));
    info!(?state, cards = ctx.region.card_count(), "load finished");

    let rendered = if fragment {
        ctx.region.html().to_string()
    } else {
        render::page_document(&cfg.page.title, &ctx.region, &now_rfc3339())
    };

    let out_path = out
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from(&cfg.output.path)).filter(|p| !p.as_os_str().is_empty()));

    match out_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("writing page: {}", path.display()))?;
            if cfg.output.print_summary {
                print_summary(state, &ctx, &path)?;
            }
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn print_summary(state: TerminalState, ctx: &PageContext, path: &Path) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "state": state,
            "cards": ctx.region.card_count(),
            "region_writes": ctx.region.writes(),
            "out": path,
        }))?
    );
    Ok(())
}

fn decode(cfg: &Config, locator: &str, page: Option<&str>) -> Result<()> {
    let address = page_address(cfg, page)?;
    let fetcher = Fetcher::new(cfg)?;
    let doc = runtime()?
        .block_on(fetch_and_parse(&fetcher, &address, locator))
        .map_err(|e| anyhow!("Failed to load probe data: {}", e.message()))?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
