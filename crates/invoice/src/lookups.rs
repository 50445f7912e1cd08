//! Best-effort enrichment for invoices: vehicle class, price in USD and
//! weather at the dropoff. Every lookup may come back empty; the invoice
//! shows "—" in that case.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::order::Order;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub kind: String,
    pub max_weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub temperature_c: f64,
    pub description: Option<String>,
}

#[async_trait]
pub trait VehicleLookup: Send + Sync {
    async fn pick_vehicle(&self, weight_kg: f64) -> Option<Vehicle>;
}

#[async_trait]
pub trait CurrencyLookup: Send + Sync {
    /// US dollars per hryvnia.
    async fn usd_per_uah(&self) -> Option<f64>;
}

#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn weather_at(&self, lat: f64, lng: f64) -> Option<Weather>;
}

/// Picks a vehicle class from the cargo weight alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightClassVehicles;

impl WeightClassVehicles {
    const CLASSES: [(&'static str, f64); 4] = [
        ("Passenger car", 50.0),
        ("Minibus", 200.0),
        ("Light truck", 500.0),
        ("Medium truck", 2000.0),
    ];
    const HEAVY: (&'static str, f64) = ("Heavy truck", 20000.0);

    pub fn classify(weight_kg: f64) -> Vehicle {
        let (kind, max) = Self::CLASSES
            .into_iter()
            .find(|(_, max)| weight_kg <= *max)
            .unwrap_or(Self::HEAVY);
        Vehicle {
            kind: kind.to_string(),
            max_weight_kg: max,
        }
    }
}

#[async_trait]
impl VehicleLookup for WeightClassVehicles {
    async fn pick_vehicle(&self, weight_kg: f64) -> Option<Vehicle> {
        weight_kg.is_finite().then(|| Self::classify(weight_kg))
    }
}

fn lookup_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("route-map/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to a default HTTP client for lookups");
            Client::new()
        })
}

/// National Bank of Ukraine exchange rate feed.
#[derive(Debug, Clone)]
pub struct NbuCurrency {
    client: Client,
    url: String,
}

impl NbuCurrency {
    pub const DEFAULT_URL: &'static str =
        "https://bank.gov.ua/NBUStatService/v1/statdirectory/exchange?valcode=USD&json";

    pub fn new(timeout: Duration) -> Self {
        Self::with_url(lookup_client(timeout), Self::DEFAULT_URL)
    }

    pub fn with_url(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[derive(Deserialize)]
struct NbuRate {
    rate: f64,
}

#[async_trait]
impl CurrencyLookup for NbuCurrency {
    async fn usd_per_uah(&self) -> Option<f64> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let rates: Vec<NbuRate> = match response {
            Ok(response) => response.json().await.ok()?,
            Err(e) => {
                warn!(error = %e, "Exchange rate request failed");
                return None;
            }
        };
        // rate is hryvnias per dollar
        let rate = rates.first()?.rate;
        (rate.is_finite() && rate > 0.0).then(|| 1.0 / rate)
    }
}

/// Current conditions from the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeather {
    pub const DEFAULT_URL: &'static str = "https://api.open-meteo.com/v1/forecast";

    pub fn new(timeout: Duration) -> Self {
        Self::with_url(lookup_client(timeout), Self::DEFAULT_URL)
    }

    pub fn with_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
}

#[async_trait]
impl WeatherLookup for OpenMeteoWeather {
    async fn weather_at(&self, lat: f64, lng: f64) -> Option<Weather> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let body: ForecastResponse = match response {
            Ok(response) => response.json().await.ok()?,
            Err(e) => {
                warn!(error = %e, "Weather request failed");
                return None;
            }
        };
        let current = body.current_weather?;
        Some(Weather {
            temperature_c: current.temperature,
            description: Some("Open-Meteo".to_string()),
        })
    }
}

/// Results of the lookups for one order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceExtras {
    pub vehicle: Option<Vehicle>,
    pub price_usd: Option<f64>,
    pub weather: Option<Weather>,
    /// Whether a route map is attached to the message
    pub route_attached: bool,
}

/// The lookups an assembler consults; any of them may be absent.
#[derive(Clone, Default)]
pub struct Lookups {
    pub vehicle: Option<Arc<dyn VehicleLookup>>,
    pub currency: Option<Arc<dyn CurrencyLookup>>,
    pub weather: Option<Arc<dyn WeatherLookup>>,
}

impl Lookups {
    pub fn none() -> Self {
        Self::default()
    }

    /// Offline vehicle classing plus the public currency and weather APIs.
    pub fn online(timeout: Duration) -> Self {
        Self {
            vehicle: Some(Arc::new(WeightClassVehicles)),
            currency: Some(Arc::new(NbuCurrency::new(timeout))),
            weather: Some(Arc::new(OpenMeteoWeather::new(timeout))),
        }
    }

    /// Run every configured lookup concurrently.
    pub async fn gather(&self, order: &Order) -> InvoiceExtras {
        let vehicle = async {
            match (&self.vehicle, order.weight) {
                (Some(lookup), Some(weight)) => lookup.pick_vehicle(weight).await,
                _ => None,
            }
        };
        let price_usd = async {
            match (&self.currency, order.price) {
                (Some(lookup), Some(price)) => lookup.usd_per_uah().await.map(|rate| price * rate),
                _ => None,
            }
        };
        let weather = async {
            match (&self.weather, order.dropoff()) {
                (Some(lookup), Some(at)) => lookup.weather_at(at.lat, at.lng).await,
                _ => None,
            }
        };

        let (vehicle, price_usd, weather) = tokio::join!(vehicle, price_usd, weather);
        debug!(
            vehicle = vehicle.is_some(),
            price_usd = price_usd.is_some(),
            weather = weather.is_some(),
            "Invoice lookups finished"
        );

        InvoiceExtras {
            vehicle,
            price_usd,
            weather,
            route_attached: false,
        }
    }
}

impl std::fmt::Debug for Lookups {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookups")
            .field("vehicle", &self.vehicle.is_some())
            .field("currency", &self.currency.is_some())
            .field("weather", &self.weather.is_some())
            .finish()
    }
}
