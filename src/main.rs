use clap::Parser;
use plugrpc::cli::{self, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Cli::parse();
    if let Err(e) = cli::run(args).await {
        eprintln!("plugrpc: {e}");
        std::process::exit(1);
    }
}
