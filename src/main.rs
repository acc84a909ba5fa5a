//! # del-socials
//!
//! Deletes your old Reddit posts and comments, or Twitter/X tweets and
//! replies, created before a date you choose.
//!
//! ## Usage
//!
//! ```bash
//! # Credentials are read from ./config.json
//! cargo run --release
//!
//! # Use a different credentials file
//! DEL_SOCIALS_CONFIG=/path/to/config.json cargo run --release
//!
//! # Show request-level diagnostics
//! RUST_LOG=debug cargo run --release
//! ```

use log::error;
use std::io;
use std::process;

use del_socials::cli::Cli;
use del_socials::config::config_path;

/// Entry point: initialise logging, run one interactive session, map the outcome to an exit status.
///
/// All requests are awaited one after another on a single-threaded runtime.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdin = io::stdin();
    let mut cli = Cli::new(stdin.lock(), io::stdout());

    match cli.run(&config_path()).await {
        Ok(Some(summary)) => {
            println!("\n{}", summary);
        }
        Ok(None) => {}
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
