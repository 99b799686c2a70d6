use flatwiki::{logger::Logger, Config, StartupError};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    Logger::init().map_err(|e| StartupError::Logger(e.to_string()))?;

    let config = Config::from_env()?;
    let result = flatwiki::serve(&config).await;
    if let Err(e) = &result {
        log::error!("{}", e);
    }
    result
}
