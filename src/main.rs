use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use roost::{NoopBootstrap, RoostConfig, Supervisor, TcpStore};

#[derive(Parser, Debug)]
#[command(name = "roost")]
#[command(about = "Process lifecycle supervisor for the Roost web service")]
#[command(version)]
#[command(long_about = "Runs one Roost process lifecycle: connects the external data store, \
binds the HTTP listener to the configured target (TCP port or Unix socket), and coordinates \
graceful shutdown on operator interrupt, unhandled faults and classified bind errors. \
Exit codes follow the service contract: 0 for an operator-requested shutdown, 1 for handled \
faults, a crash for anything unclassified.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "roost.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the service")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle special modes that don't require full initialization
    if args.print_config {
        print_default_config();
        return Ok(());
    }

    // Initialize logging
    init_logging(&args)?;

    // Synchronous-fault guard: log and exit immediately with code 1. This
    // path skips the shutdown sequence, so the data store is not released
    // on it.
    install_panic_guard();

    info!("Starting roost v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    // Load and validate configuration
    let config = match RoostConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Validate configuration if requested
    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    let store = Arc::new(TcpStore::new(config.store.addr.clone()));
    let supervisor = Supervisor::new(config, store, Arc::new(NoopBootstrap));

    match supervisor.run().await {
        Ok(code) => {
            info!("Roost exited with code: {}", code);
            std::process::exit(code);
        }
        Err(err) => {
            // Unclassified bind faults and other unrecoverable errors crash
            // rather than taking the handled exit-1 path.
            error!("Unrecoverable fault: {}", err);
            std::process::abort();
        }
    }
}

fn install_panic_guard() {
    std::panic::set_hook(Box::new(|info| {
        error!("Uncaught panic: {}", info);
        std::process::exit(1);
    }));
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Determine log level based on flags
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    // Create environment filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("roost={}", log_level)));

    // Configure format based on options
    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print default configuration in TOML format
fn print_default_config() {
    println!("# Roost Configuration File");
    println!("# This is the default configuration with all available options");
    println!();

    let default_config = r#"[listen]
# Interface to bind numeric port targets on
host = "0.0.0.0"
# Listen target: a TCP port number or a Unix socket path.
# Also settable via ROOST_LISTEN_TARGET.
target = "5051"

[store]
# Address of the external data store
addr = "127.0.0.1:5432"
# Upper bound on the startup connect attempt, in seconds
connect_timeout_secs = 5

[shutdown]
# Grace period for store disconnect and request drain, in seconds.
# Exit is forced once it elapses.
grace_secs = 10
"#;

    println!("{}", default_config);
}
