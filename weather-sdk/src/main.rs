use common::tracing::init_tracing;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use weather_sdk::{ClientRegistry, Config, OpenWeatherFetcher, WeatherError};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Weather lookup failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), WeatherError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| WeatherError::config("OPENWEATHER_API_KEY is not set"))?;

    let mut cities: Vec<String> = std::env::args().skip(1).collect();
    if cities.is_empty() {
        cities.push("London".to_string());
    }

    let fetcher = Arc::new(OpenWeatherFetcher::from_config(&config)?);
    let registry = ClientRegistry::new(fetcher, config.client);
    let client = registry
        .get_instance(&api_key, config.polling_enabled)
        .await?;

    for city in &cities {
        let weather = client.get_weather(city).await?;
        info!(city = %city, "Weather lookup complete");
        println!("{}: {}", city, weather);
    }

    registry.remove_instance(&api_key).await;
    Ok(())
}
