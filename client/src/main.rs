use clap::Parser;
use client::network::Client;
use client::script::InputScript;
use log::info;
use shared::config::DEFAULT_PORT;
use shared::InitMsg;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
    server: String,

    /// Arena width
    #[arg(short = 'w', long, default_value = "800")]
    width: u32,

    /// Arena height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "600")]
    height: u32,

    /// Number of particles to simulate
    #[arg(short = 'n', long, default_value = "20000")]
    particles: u32,

    /// Ticks to run (0 = until the server closes)
    #[arg(short = 't', long, default_value = "0")]
    ticks: u64,

    /// Simulate network latency in milliseconds
    #[arg(short = 'l', long, default_value = "0")]
    fake_ping: u64,

    /// Seed for the scripted aim
    #[arg(long, default_value = "1")]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting driver...");
    info!("Connecting to: {}", args.server);
    if args.fake_ping > 0 {
        info!("Simulating {}ms latency", args.fake_ping);
    }

    let init = InitMsg::new(args.width, args.height, args.particles);
    let script = InputScript::new(args.width, args.height, args.seed);
    let mut client = Client::connect(&args.server, init, script, args.fake_ping).await?;

    let ticks = client.run(args.ticks).await?;
    info!("Finished after {} ticks", ticks);

    Ok(())
}
