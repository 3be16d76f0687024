//! smartloc CLI entry point
//!
//! AI place search and simulated GPS teleport - CLI + web API

use smartloc::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
