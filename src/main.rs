use env_logger::Env;
use log::error;
use qbay::config::{Config, DEFAULT_LOG_FILTER};
use qbay::web::app::run_app;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, err.to_string()));
        }
    };

    run_app(config).await
}
