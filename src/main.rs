//! Xzar CLI entry point.

#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = xzar::run() {
        // Interrupted runs and closed pipes exit quietly.
        if !e.is_interruption() {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}
