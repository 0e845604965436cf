use std::process;

fn main() {
    if let Err(err) = noboros_core::cli::run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
