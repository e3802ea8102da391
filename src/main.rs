use clap::Parser;

use rust_sentiment_cnn::config::ServerConfig;
use rust_sentiment_cnn::logging::init_logging;
use rust_sentiment_cnn::ui::routes::run_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    let config = ServerConfig::parse();
    run_server(config).await
}
