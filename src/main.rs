//! GitGotchi - a virtual plant that lives off your GitHub commits
//!
//! # Usage
//! ```bash
//! gitgotchi                  # Start server
//! gitgotchi --open           # Start and open browser
//! gitgotchi check octocat    # Print one user's plant and exit
//! gitgotchi status           # Check if running
//! gitgotchi kill             # Stop running instance
//! ```

mod activity;
mod error;
mod garden;
mod github;
mod instance;
mod models;
mod routes;
mod session;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use activity::Clock;
use garden::GardenService;
use github::{ActivitySource, GitHubClient, DEFAULT_API_BASE};
use instance::{terminate, InstanceFile, InstanceRecord};
use models::GardenSnapshot;
use session::SessionStore;

/// GitGotchi - Keep a plant alive by committing code
#[derive(Parser)]
#[command(name = "gitgotchi")]
#[command(about = "A virtual plant fed by your GitHub commit activity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Open browser automatically after starting
    #[arg(short, long)]
    open: bool,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// GitHub API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Seconds to reuse fetched activity before asking GitHub again
    #[arg(long, default_value = "60")]
    cache_ttl: u64,

    /// Use UTC day boundaries instead of the local clock
    #[arg(long)]
    utc: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one user's plant and print it
    Check {
        /// GitHub username
        login: String,

        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check if gitgotchi is currently running
    Status,
    /// Stop the running gitgotchi instance
    Kill,
}

/// What `status` and `kill` do with a live instance.
enum Control {
    Report,
    Stop,
}

fn control_instance(action: Control) {
    let file = InstanceFile::new(InstanceFile::default_path());
    let Some(running) = file.live() else {
        println!("✗ No gitgotchi server is running");
        return;
    };

    match action {
        Control::Report => {
            println!("✓ gitgotchi is serving {}", running.url());
            println!("  PID:     {}", running.pid);
            println!("  GitHub:  {}", running.api_base);
            println!(
                "  Started: {}",
                running.started_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
            );
        }
        Control::Stop if terminate(running.pid) => {
            file.forget();
            println!("✓ Asked gitgotchi (PID {}) to shut down", running.pid);
        }
        Control::Stop => {
            println!("✗ Could not signal gitgotchi (PID {})", running.pid);
        }
    }
}

fn init_tracing() {
    // Quiet by default; RUST_LOG=gitgotchi=debug for details
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_garden(cli: &Cli) -> anyhow::Result<GardenService> {
    let client = GitHubClient::new(&cli.api_base)?;
    tracing::debug!("Using GitHub API at {}", client.api_base());
    let source: Arc<dyn ActivitySource> = Arc::new(client);
    let clock = if cli.utc { Clock::Utc } else { Clock::Local };
    Ok(GardenService::new(
        source,
        Duration::from_secs(cli.cache_ttl),
        clock,
    ))
}

fn print_snapshot(snapshot: &GardenSnapshot) {
    let health = &snapshot.health;
    let stats = &snapshot.stats;

    println!();
    println!(
        "  {}  {} (@{})",
        health.state.emoji(),
        snapshot.user.display_name(),
        snapshot.user.login
    );
    println!("     \"{}\"", snapshot.message);
    println!();
    println!(
        "  Health:         {}/100 ({}, {})",
        health.current,
        health.state.as_str(),
        health.trend.as_str()
    );
    println!("  Commits (30d):  {}", stats.total_commits);
    println!(
        "  Current streak: {} day{}",
        stats.current_streak,
        if stats.current_streak == 1 { "" } else { "s" }
    );
    println!(
        "  Longest streak: {} day{}",
        stats.longest_streak,
        if stats.longest_streak == 1 { "" } else { "s" }
    );
    println!(
        "  Last commit:    {}",
        snapshot.last_commit_relative.as_deref().unwrap_or("none in 30 days")
    );
    println!();
}

async fn handle_check(cli: &Cli, login: &str, json: bool) -> anyhow::Result<()> {
    let garden = build_garden(cli)?;
    match garden.snapshot(login, true).await {
        Ok(snapshot) if json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Ok(snapshot) => print_snapshot(&snapshot),
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    match &cli.command {
        Some(Commands::Status) => {
            control_instance(Control::Report);
            return Ok(());
        }
        Some(Commands::Kill) => {
            control_instance(Control::Stop);
            return Ok(());
        }
        Some(Commands::Check { login, json }) => {
            init_tracing();
            return handle_check(&cli, login, *json).await;
        }
        None => {}
    }

    let instance_file = InstanceFile::new(InstanceFile::default_path());
    if let Some(running) = instance_file.live() {
        eprintln!("✗ Another gitgotchi (PID {}) is serving {}", running.pid, running.url());
        eprintln!("  Stop it with 'gitgotchi kill' or pick another --port.");
        std::process::exit(1);
    }

    init_tracing();

    let garden = Arc::new(build_garden(&cli)?);
    let session = Arc::new(SessionStore::new(SessionStore::default_path()));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(garden, session))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Bind to the port
    let addr = format!("127.0.0.1:{}", cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", cli.port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    instance_file.record(&InstanceRecord::current(cli.port, &cli.api_base))?;

    let url = format!("http://127.0.0.1:{}", cli.port);
    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │                 GitGotchi 🌱                │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Server:     {}", url);
    println!("  GitHub:     {}", cli.api_base);
    println!("  Days:       {}", if cli.utc { "UTC" } else { "local time" });
    println!();
    println!("  Commands:");
    println!("    gitgotchi status  - Check if running");
    println!("    gitgotchi kill    - Stop the server");
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    if cli.open {
        if let Err(e) = open::that(&url) {
            eprintln!("  Warning: Could not open browser: {}", e);
        }
    }

    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n  Shutting down...");
        instance_file.forget();
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
