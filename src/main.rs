// src/main.rs

use tracing::error;

#[tokio::main]
async fn main() {
    let args = docwatch::cli::parse();

    if let Err(e) = docwatch::logging::init_logging(args.log_level) {
        eprintln!("failed to initialise logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = docwatch::run(args).await {
        error!(error = %e, "docwatch failed");
        std::process::exit(1);
    }
}
