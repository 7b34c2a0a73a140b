// sessctl - Agent gateway session CLI
use clap::Parser;
use sessctl::cli::{execute_command, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match execute_command(args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
