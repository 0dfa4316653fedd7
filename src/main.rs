//! CLI entry point for dagls

use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use dagls::{
    CancelScope, CidBase, ImportConfig, Importer, JsonSink, ListConfig, ListError, Lister,
    MemoryStore, OutputConfig, OutputFormat, StoreError, TableConfig, TextSink,
};
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // https://no-color.org/
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dagls")]
#[command(about = "List directory contents of a content-addressed filesystem")]
#[command(version)]
struct Args {
    /// Paths to list: `<cid>[/sub/path]`, `/ipfs/<cid>/...`, or relative to
    /// the store root. Read from stdin (one per line) when omitted.
    paths: Vec<String>,

    /// Print table headers (Hash, Size, Name)
    #[arg(short = 'v', long = "headers")]
    headers: bool,

    /// Resolve linked objects to find out their types
    #[arg(
        long = "resolve-type",
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    resolve_type: bool,

    /// Resolve linked objects to find out their file size
    #[arg(
        long = "size",
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    size: bool,

    /// Emit entries as they are traversed instead of sorted per path
    #[arg(short = 's', long = "stream")]
    stream: bool,

    /// Also show mode and modification time
    #[arg(short = 'l', long = "long")]
    long: bool,

    /// Show sizes in human-readable form (1.5K, 3.0M)
    #[arg(short = 'H', long = "human")]
    human: bool,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "text")]
    format: OutputFormat,

    /// Encoding used to print content identifiers
    #[arg(long = "cid-base", value_name = "BASE", default_value = "base32")]
    cid_base: CidBase,

    /// Local directory to import as the store root [default: .]
    #[arg(long = "root", value_name = "DIR", conflicts_with = "snapshot")]
    root: Option<PathBuf>,

    /// Load the store from a snapshot file instead of importing a directory
    #[arg(long = "snapshot", value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Write the store to a snapshot file before listing
    #[arg(long = "save-snapshot", value_name = "FILE")]
    save_snapshot: Option<PathBuf>,

    /// Import all files (ignore .gitignore and hidden-file filtering)
    #[arg(short, long)]
    all: bool,

    /// Ignore files matching pattern when importing (can be used multiple times)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// Number of parallel workers for hashing imported files
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Cancel the listing after DURATION (e.g. 30s, 5m)
    #[arg(long = "timeout", value_name = "DURATION", value_parser = parse_duration_string)]
    timeout: Option<Duration>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

/// Parse a duration string like "500ms", "30s" or "5m".
fn parse_duration_string(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Paths from the command line, else from piped stdin, else the root.
fn requested_paths(args: &[String]) -> io::Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args.to_vec());
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut paths = Vec::new();
        for line in stdin.lock().lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                paths.push(trimmed.to_string());
            }
        }
        if !paths.is_empty() {
            return Ok(paths);
        }
    }

    Ok(vec![".".to_string()])
}

fn open_store(args: &Args) -> Result<MemoryStore, StoreError> {
    if let Some(snapshot) = &args.snapshot {
        tracing::debug!(path = %snapshot.display(), "loading snapshot");
        return MemoryStore::load(snapshot);
    }

    let root = args.root.as_deref().unwrap_or(Path::new("."));
    let config = ImportConfig {
        show_all: args.all,
        ignore_patterns: args.ignore.clone(),
        parallel_workers: args.jobs,
    };
    Importer::new(config).import(root)
}

/// Cancel `scope` on Ctrl-C or once `timeout` elapses.
async fn cancel_on_interrupt(scope: Arc<CancelScope>, timeout: Option<Duration>) {
    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let deadline = async {
        match timeout {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = interrupt => tracing::info!("interrupted, cancelling listing"),
        _ = deadline => tracing::info!(?timeout, "timeout elapsed, cancelling listing"),
    }
    scope.cancel();
}

async fn list(
    lister: Lister,
    paths: Vec<String>,
    output: OutputConfig,
    timeout: Option<Duration>,
) -> Result<(), ListError> {
    let scope = Arc::new(CancelScope::new());
    let token = scope.token();
    let watcher = tokio::spawn(cancel_on_interrupt(Arc::clone(&scope), timeout));

    let result = match output.format {
        OutputFormat::Text => {
            let choice = if output.use_color {
                ColorChoice::Always
            } else {
                ColorChoice::Never
            };
            let mut sink = TextSink::new(StandardStream::stdout(choice), output.table);
            lister.run(&paths, &mut sink, &token).await
        }
        OutputFormat::Json => {
            let mut sink = JsonSink::new(io::stdout(), output.table.cid_base, output.table.streaming);
            lister.run(&paths, &mut sink, &token).await
        }
    };

    watcher.abort();
    result
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let paths = requested_paths(&args.paths).unwrap_or_else(|e| {
        eprintln!("dagls: error reading paths from stdin: {}", e);
        process::exit(1);
    });

    let store = open_store(&args).unwrap_or_else(|e| {
        eprintln!("dagls: cannot open store: {}", e);
        process::exit(1);
    });
    tracing::debug!(objects = store.len(), "store ready");

    if let Some(target) = &args.save_snapshot {
        if let Err(e) = store.save(target) {
            eprintln!("dagls: cannot save snapshot '{}': {}", target.display(), e);
            process::exit(1);
        }
    }

    let list_config = ListConfig {
        resolve_type: args.resolve_type,
        resolve_size: args.size,
        streaming: args.stream,
    };
    let output_config = OutputConfig {
        format: args.format,
        use_color: should_use_color(args.color),
        table: TableConfig {
            headers: args.headers,
            size_column: args.size,
            human_sizes: args.human,
            long: args.long,
            ignore_breaks: false,
            multiple_groups: paths.len() > 1,
            streaming: args.stream,
            cid_base: args.cid_base,
        },
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("dagls: cannot start runtime: {}", e);
            process::exit(1);
        });

    let lister = Lister::new(Arc::new(store), list_config);
    let result = runtime.block_on(list(lister, paths, output_config, args.timeout));

    if let Err(e) = result {
        eprintln!("dagls: {}", e);
        process::exit(1);
    }
}
