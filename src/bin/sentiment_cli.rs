// src/bin/sentiment_cli.rs
use rust_sentiment_cnn::cli;
use rust_sentiment_cnn::logging::init_logging;

fn main() {
    init_logging();

    if let Err(e) = cli::run_cli() {
        eprintln!("Application error: {}", e);
        let mut current_err: Option<&(dyn std::error::Error + 'static)> = e.source();
        while let Some(source) = current_err {
            eprintln!("Caused by: {}", source);
            current_err = source.source();
        }
        std::process::exit(1);
    }
}
