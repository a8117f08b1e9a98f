//! lumen CLI - standalone binary
//!
//! Thin wrapper around [`lumen_cli::run_cli`]; all command logic lives in
//! the library crate for testability.

fn main() {
    env_logger::init();
    if let Err(e) = lumen_cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
