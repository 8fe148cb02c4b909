//! Sternhalma driver.
//!
//! Reads one command per line from stdin and writes one response line per
//! command to stdout. Logs go to stderr, filtered by `RUST_LOG`.
//!
//! An optional first argument names a JSON game configuration that is loaded
//! before any command is read.

use std::fs;
use std::io::{self, BufRead, Write};

use sternhalma::board::GameConfig;
use sternhalma::engine::{Engine, Flow};
use sternhalma::protocol::parse_command;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    if let Some(path) = std::env::args().nth(1) {
        match load_config(&path) {
            Ok(config) => match engine.load(config) {
                Ok(()) => info!(path = %path, "loaded configuration"),
                Err(e) => error!(path = %path, error = %e, "configuration rejected"),
            },
            Err(e) => error!(path = %path, error = %e, "cannot read configuration"),
        }
    }

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let Some(cmd) = parse_command(&line) else {
            continue;
        };

        if engine.handle(cmd, &mut out)? == Flow::Quit {
            break;
        }
    }

    out.flush()
}

fn load_config(path: &str) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(GameConfig::from_json(&json)?)
}
