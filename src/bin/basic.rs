use clap::Parser;
use plugrpc::server::PluginServer;

/// Builtin plugin binary speaking line-delimited JSON-RPC on stdio.
#[derive(Parser)]
#[command(name = "plugrpc-basic")]
#[command(author, version, about = "Builtin plugrpc plugin (string.reverse)")]
struct Args {
    /// Read requests from stdin and serve until shutdown or EOF
    #[arg(long)]
    serve: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    if !args.serve {
        // No action without --serve, exit 0.
        return;
    }

    let server = PluginServer::builtin();
    if let Err(e) = server.run_stdio().await {
        eprintln!("plugrpc-basic: fatal error: {e}");
        std::process::exit(1);
    }
}
