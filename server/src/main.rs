use clap::Parser;
use log::{error, info, warn};
use server::network::{Server, ServerConfig};
use shared::config::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Worker threads for the particle pass (0 = one per core)
    #[arg(short, long, default_value = "0")]
    threads: usize,

    /// Largest particle count a driver may request
    #[arg(long, default_value = "1000000")]
    max_particles: u32,

    /// Maximum concurrent sessions
    #[arg(short = 'm', long, default_value = "4")]
    max_sessions: usize,

    /// Serve a single session, then exit
    #[arg(long)]
    once: bool,
}

/// Parses command-line arguments, sizes the worker pool and runs the accept
/// loop until Ctrl+C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()?;
    }
    info!("Particle pass uses {} workers", rayon::current_num_threads());

    let config = ServerConfig {
        max_particles: args.max_particles,
        max_sessions: args.max_sessions.max(1),
        once: args.once,
    };

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, config).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Received Ctrl+C, shutting down...");
        }
    }

    let sessions = server.sessions();
    let sessions = sessions.read().await;
    if !sessions.is_empty() {
        info!(
            "Dropping {} open sessions ({} particles)",
            sessions.len(),
            sessions.total_particles()
        );
    }

    Ok(())
}
