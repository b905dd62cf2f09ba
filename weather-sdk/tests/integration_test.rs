use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use weather_sdk::{
    ClientOptions, ClientRegistry, HttpClient, OpenWeatherFetcher, WeatherError, WeatherRecord,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const WEATHER_PATH: &str = "/data/2.5/weather";

fn london_body() -> serde_json::Value {
    json!({
        "weather": [{ "id": 802, "main": "Clouds", "description": "scattered clouds" }],
        "main": { "temp": 280.32, "feels_like": 278.5, "humidity": 81 },
        "name": "London"
    })
}

fn fetcher_for(mock_server: &MockServer) -> Arc<OpenWeatherFetcher> {
    let http_client = HttpClient::new(Duration::from_millis(500), 0).expect("client builds");
    Arc::new(OpenWeatherFetcher::new(
        format!("{}{}", mock_server.uri(), WEATHER_PATH),
        http_client,
    ))
}

/// Successful lookups are parsed and served from cache afterwards
#[tokio::test]
async fn test_get_weather_reads_through_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "London"))
        .and(query_param("appid", "good-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let registry = ClientRegistry::new(fetcher_for(&mock_server), ClientOptions::default());
    let client = registry.get_instance("good-key", false).await.unwrap();

    let first = client.get_weather("London").await.unwrap();
    let second = client.get_weather("London").await.unwrap();

    assert_eq!(first, WeatherRecord::new("Clouds", "scattered clouds", 280.32, 278.5));
    assert_eq!(first, second);
    assert_eq!(
        first.to_string(),
        "Weather: Clouds, Description: scattered clouds, Temp: 7.17°C, Feels Like: 5.35°C"
    );
}

/// HTTP 401 surfaces as an invalid credential and nothing is cached
#[tokio::test]
async fn test_unauthorized_maps_to_invalid_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let registry = ClientRegistry::new(fetcher_for(&mock_server), ClientOptions::default());
    let client = registry.get_instance("bad-key", false).await.unwrap();

    for _ in 0..2 {
        assert_eq!(
            client.get_weather("London").await,
            Err(WeatherError::InvalidCredential)
        );
    }
    assert!(client.cached_cities().await.is_empty());
}

/// HTTP 404 surfaces as city not found with the cache unaffected
#[tokio::test]
async fn test_not_found_maps_to_city_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Nowhereville"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let registry = ClientRegistry::new(fetcher_for(&mock_server), ClientOptions::default());
    let client = registry.get_instance("good-key", false).await.unwrap();
    client.get_weather("London").await.unwrap();

    assert_eq!(
        client.get_weather("Nowhereville").await,
        Err(WeatherError::CityNotFound("Nowhereville".to_string()))
    );
    assert_eq!(client.cached_cities().await, vec!["London".to_string()]);
}

/// Any other failure is a transport error
#[tokio::test]
async fn test_server_error_maps_to_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let registry = ClientRegistry::new(fetcher_for(&mock_server), ClientOptions::default());
    let client = registry.get_instance("good-key", false).await.unwrap();

    assert!(matches!(
        client.get_weather("London").await,
        Err(WeatherError::Transport(_))
    ));
}

/// A 200 without any weather condition is rejected rather than cached
#[tokio::test]
async fn test_empty_conditions_are_transport_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "weather": [],
            "main": { "temp": 280.0, "feels_like": 279.0 }
        })))
        .mount(&mock_server)
        .await;

    let registry = ClientRegistry::new(fetcher_for(&mock_server), ClientOptions::default());
    let client = registry.get_instance("good-key", false).await.unwrap();

    assert!(matches!(
        client.get_weather("London").await,
        Err(WeatherError::Transport(_))
    ));
    assert!(client.cached_cities().await.is_empty());
}

/// A refresh pass re-fetches cached cities and reports partial failures
#[tokio::test]
async fn test_refresh_pass_against_live_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "weather": [{ "main": "Rain", "description": "light rain" }],
            "main": { "temp": 285.0, "feels_like": 284.0 }
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let registry = ClientRegistry::new(fetcher_for(&mock_server), ClientOptions::default());
    let client = registry.get_instance("good-key", false).await.unwrap();
    client.get_weather("London").await.unwrap();
    let paris = client.get_weather("Paris").await.unwrap();

    let report = client.refresh_now().await;

    assert_eq!(report.refreshed, vec!["London".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].city, "Paris");
    assert_eq!(client.get_weather("Paris").await.unwrap(), paris);
}
