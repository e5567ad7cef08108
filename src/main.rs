//! facility-taskview - render facility task display info
//!
//! Reads task records as JSON and prints the labels and action flags a
//! task panel shows for them, or serves the same over HTTP.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};

use facility_taskview::{TaskRecord, TaskView, api, config::Config};

#[derive(Parser)]
#[command(name = "facility-taskview")]
#[command(about = "Display info for facility sync, removal and import tasks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render display info for task records read as JSON
    Render {
        /// File with one task record or an array of them (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Render every record as this kind instead of using its type
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Start the display-info server
    Serve {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Initialize a new config file
    Init {
        /// Output path for config file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Sync,
    Remove,
    Import,
}

impl From<KindArg> for TaskView {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Sync => TaskView::Sync,
            KindArg::Remove => TaskView::Remove,
            KindArg::Import => TaskView::Import,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("facility_taskview=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            kind,
            config,
            pretty,
        } => {
            let cfg = load_config(config.as_deref())?;
            render(&cfg, input.as_deref(), kind.map(TaskView::from), pretty)
        }

        Commands::Serve { config, port, bind } => {
            let mut cfg = load_config(config.as_deref())?;

            if let Some(p) = port {
                cfg.server.port = p;
            }
            if let Some(b) = bind {
                cfg.server.bind = b;
            }

            run_server(cfg).await
        }

        Commands::Init { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from("config.toml"));
            Config::default()
                .save_to(&path)
                .context("Failed to write config file")?;

            println!("Created config file: {}", path.display());
            println!();
            println!("Next steps:");
            println!("  1. Override message templates under [messages] if needed");
            println!(
                "  2. Render a task: facility-taskview render --config {} --input task.json",
                path.display()
            );

            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path).context("Failed to load config file"),
        None => Config::load().context("Failed to load config"),
    }
}

fn render(cfg: &Config, input: Option<&Path>, view: Option<TaskView>, pretty: bool) -> Result<()> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let output = render_json(cfg, &raw, view, pretty)?;
    println!("{}", output);

    Ok(())
}

/// Render raw JSON input (one record or an array) to JSON output of the same shape
fn render_json(cfg: &Config, raw: &str, view: Option<TaskView>, pretty: bool) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(raw).context("Input is not JSON")?;
    let single = !value.is_array();
    let tasks: Vec<TaskRecord> = if single {
        vec![serde_json::from_value(value).context("Invalid task record")?]
    } else {
        serde_json::from_value(value).context("Invalid task records")?
    };

    let mapper = cfg.mapper();
    let infos = tasks
        .iter()
        .map(|task| match view {
            Some(view) => Ok(mapper.render(view, task)),
            None => mapper.display_info(task),
        })
        .collect::<Result<Vec<_>, _>>()
        .context("Pass --kind to render records without a supported type")?;

    tracing::info!(tasks = infos.len(), "Rendered display info");

    let output = match (single, pretty) {
        (true, true) => serde_json::to_string_pretty(&infos[0])?,
        (true, false) => serde_json::to_string(&infos[0])?,
        (false, true) => serde_json::to_string_pretty(&infos)?,
        (false, false) => serde_json::to_string(&infos)?,
    };
    Ok(output)
}

async fn run_server(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let state = api::AppState::new(config);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("facility-taskview server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUED_SYNC: &str = r#"{
        "type": "SYNCPEERFULL",
        "status": "QUEUED",
        "sync_state": "PULLING",
        "facility": "abcd1234",
        "facility_name": "X"
    }"#;

    #[test]
    fn test_single_record_renders_object() {
        let out = render_json(&Config::default(), QUEUED_SYNC, None, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert!(value.is_object());
        assert_eq!(value["statusMsg"], "Step 3 of 7: Waiting");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_array_renders_array() {
        let raw = format!("[{}, {}]", QUEUED_SYNC, QUEUED_SYNC);
        let out = render_json(&Config::default(), &raw, None, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert!(out.contains('\n'));
    }

    #[test]
    fn test_kind_override() {
        let raw = r#"{"status": "REMOVING_FACILITY", "facility_id": "efgh5678", "facility_name": "X"}"#;

        assert!(render_json(&Config::default(), raw, None, false).is_err());

        let out = render_json(&Config::default(), raw, Some(TaskView::Remove), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["headingMsg"], "Remove 'X (efgh)'");
        assert_eq!(value["isRunning"], true);
    }

    #[test]
    fn test_invalid_input() {
        assert!(render_json(&Config::default(), "not json", None, false).is_err());
        assert!(render_json(&Config::default(), r#"{"type": "SYNCPEERFULL"}"#, None, false).is_err());
    }
}
