//! Binary entrypoint for faceserve-cli

fn main() {
    if let Err(err) = faceserve_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
