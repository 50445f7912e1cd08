//! Invoice assembly, dispatch and lookup tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use invoice::{
    CurrencyLookup, InvoiceAssembler, InvoiceError, InvoiceMessage, InvoiceResult, Lookups,
    MailConfig, MailTransport, NbuCurrency, OpenMeteoWeather, Order, OrderStatus, OutboxTransport,
    WeatherLookup, WeightClassVehicles,
};
use renderer::{RenderConfig, RouteMapRenderer};
use test_utils::decode_png;
use test_utils::orders::{FULL_ORDER_JSON, MINIMAL_ORDER_JSON};
use tile_source::NullTileSource;

// ============================================================================
// Helper functions
// ============================================================================

fn mail_config() -> MailConfig {
    MailConfig {
        carrier: "carrier@example.com".to_string(),
        from: Some("orders@example.com".to_string()),
        ..Default::default()
    }
}

fn renderer(config: RenderConfig) -> RouteMapRenderer {
    RouteMapRenderer::new(Arc::new(NullTileSource), config).unwrap()
}

fn assembler() -> InvoiceAssembler {
    InvoiceAssembler::new(mail_config()).with_renderer(renderer(RenderConfig::default()))
}

/// Keeps sent messages in memory.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<InvoiceMessage>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &InvoiceMessage) -> InvoiceResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct RejectingTransport;

#[async_trait]
impl MailTransport for RejectingTransport {
    async fn send(&self, _message: &InvoiceMessage) -> InvoiceResult<()> {
        Err(InvoiceError::Transport("mailbox full".to_string()))
    }

    fn name(&self) -> &str {
        "rejecting"
    }
}

async fn spawn_lookup_server() -> String {
    let app = Router::new()
        .route(
            "/rate",
            get(|| async { Json(serde_json::json!([{ "r030": 840, "rate": 40.0, "cc": "USD" }])) }),
        )
        .route("/rate-empty", get(|| async { Json(serde_json::json!([])) }))
        .route(
            "/forecast",
            get(|| async {
                Json(serde_json::json!({ "current_weather": { "temperature": 11.5 } }))
            }),
        )
        .route("/forecast-bare", get(|| async { Json(serde_json::json!({ "latitude": 50.4 })) }))
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// ============================================================================
// Assembly tests
// ============================================================================

#[tokio::test]
async fn test_full_order_gets_escaped_html_and_route_map() {
    let order = Order::from_json(FULL_ORDER_JSON).unwrap();
    assert_eq!(order.order_status, OrderStatus::Accepted);

    let message = assembler().assemble(&order).await.unwrap();

    assert_eq!(message.to, "carrier@example.com");
    assert_eq!(message.from.as_deref(), Some("orders@example.com"));
    assert_eq!(message.subject, "New delivery invoice #42");
    assert_eq!(message.order_id, Some(42));

    assert!(message.html.contains("<p><b>Receiver:</b> Taras &lt;Shevchenko&gt;</p>"));
    assert!(message.html.contains("<p><b>Comment:</b> Fragile &amp; heavy</p>"));
    assert!(message.html.contains("<p><b>Delivery date:</b> 2026-10-20</p>"));
    assert!(message.html.contains("<p><b>Delivery time:</b> 14:30</p>"));
    assert!(message.html.contains("<p><b>Weight:</b> 12.5 kg</p>"));
    assert!(message.html.contains("<p><b>Distance:</b> 8.3 km</p>"));
    assert!(message.html.contains("<p><b>Price:</b> 240 UAH</p>"));
    assert!(message.html.contains("<p><b>Status:</b> Accepted</p>"));
    assert!(message.html.contains("PNG map"));

    let map = message.attachment("route.png").expect("route map attached");
    assert_eq!(map.content_type, "image/png");
    assert_eq!(decode_png(&map.content).dimensions(), (800, 600));
}

#[tokio::test]
async fn test_minimal_order_has_no_attachment() {
    let order = Order::from_json(MINIMAL_ORDER_JSON).unwrap();
    let message = assembler().assemble(&order).await.unwrap();

    assert!(message.attachments.is_empty());
    assert!(message.html.contains("<p><b>Sender:</b> —</p>"));
    assert!(message.html.contains("<p><b>Comment:</b> —</p>"));
    assert!(!message.html.contains("PNG map"));
}

#[tokio::test]
async fn test_single_route_point_skips_renderer() {
    let mut order = Order::from_json(MINIMAL_ORDER_JSON).unwrap();
    order.route = Some(vec![[50.45, 30.52]]);

    let message = assembler().assemble(&order).await.unwrap();
    assert!(message.attachments.is_empty());
}

#[tokio::test]
async fn test_intercity_route_is_still_attached() {
    let mut order = Order::from_json(FULL_ORDER_JSON).unwrap();
    order.route = Some(vec![[50.45, 30.52], [49.80, 30.11]]);

    let message = assembler().assemble(&order).await.unwrap();
    let map = message.attachment("route.png").expect("route map attached");
    assert_eq!(decode_png(&map.content).dimensions(), (800, 600));
    assert!(message.html.contains("PNG map"));
}

#[tokio::test]
async fn test_invalid_route_coordinates_are_not_fatal() {
    let mut order = Order::from_json(FULL_ORDER_JSON).unwrap();
    order.route = Some(vec![[50.45, 30.52], [95.0, 30.60]]);

    let message = assembler().assemble(&order).await.unwrap();
    assert!(message.attachments.is_empty());
}

#[tokio::test]
async fn test_without_renderer_no_map_is_attached() {
    let order = Order::from_json(FULL_ORDER_JSON).unwrap();
    let message = InvoiceAssembler::new(mail_config()).assemble(&order).await.unwrap();
    assert!(message.attachments.is_empty());
}

#[tokio::test]
async fn test_invalid_order_is_rejected() {
    let json = r#"{"pointA_lat": 50.45, "pointA_lng": 30.52, "weight": 1}"#;
    let order = Order::from_json(json).unwrap();
    let transport = RecordingTransport::default();

    let result = assembler().dispatch(&order, &transport).await;
    assert!(matches!(result, Err(InvoiceError::InvalidOrder(_))));
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_vehicle_lookup_adds_lines() {
    let order = Order::from_json(FULL_ORDER_JSON).unwrap();
    let lookups = Lookups {
        vehicle: Some(Arc::new(WeightClassVehicles)),
        ..Default::default()
    };
    let message = InvoiceAssembler::new(mail_config())
        .with_lookups(lookups)
        .assemble(&order)
        .await
        .unwrap();

    assert!(message.html.contains("<p><b>Recommended vehicle:</b> Passenger car</p>"));
    assert!(message.html.contains("<p><b>Vehicle capacity:</b> 50 kg</p>"));
}

// ============================================================================
// Dispatch tests
// ============================================================================

#[tokio::test]
async fn test_dispatch_hands_message_to_transport() {
    let order = Order::from_json(FULL_ORDER_JSON).unwrap();
    let transport = RecordingTransport::default();

    let message = assembler().dispatch(&order, &transport).await.unwrap();

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, message.id);
    assert_eq!(sent[0].attachments.len(), 1);
}

#[tokio::test]
async fn test_transport_errors_propagate() {
    let order = Order::from_json(MINIMAL_ORDER_JSON).unwrap();
    let result = assembler().dispatch(&order, &RejectingTransport).await;
    assert!(matches!(result, Err(InvoiceError::Transport(_))));
}

#[tokio::test]
async fn test_outbox_writes_body_envelope_and_attachments() {
    let outbox_dir = tempfile::tempdir().unwrap();
    let outbox = OutboxTransport::new(outbox_dir.path());
    let order = Order::from_json(FULL_ORDER_JSON).unwrap();

    let message = assembler().dispatch(&order, &outbox).await.unwrap();
    let dir = outbox.message_dir(&message);

    let html = std::fs::read_to_string(dir.join("message.html")).unwrap();
    assert_eq!(html, message.html);

    let envelope: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("message.json")).unwrap()).unwrap();
    assert_eq!(envelope["id"], message.id.to_string());
    assert_eq!(envelope["orderId"], 42);
    assert_eq!(envelope["subject"], "New delivery invoice #42");
    assert_eq!(envelope["attachments"][0]["filename"], "route.png");

    let png = std::fs::read(dir.join("route.png")).unwrap();
    assert_eq!(decode_png(&png).dimensions(), (800, 600));
}

// ============================================================================
// HTTP lookup tests
// ============================================================================

#[tokio::test]
async fn test_nbu_rate_is_inverted() {
    let base = spawn_lookup_server().await;
    let client = reqwest::Client::new();

    let nbu = NbuCurrency::with_url(client.clone(), format!("{}/rate", base));
    let rate = nbu.usd_per_uah().await.unwrap();
    assert!((rate - 0.025).abs() < 1e-12);

    let empty = NbuCurrency::with_url(client.clone(), format!("{}/rate-empty", base));
    assert!(empty.usd_per_uah().await.is_none());

    let broken = NbuCurrency::with_url(client, format!("{}/broken", base));
    assert!(broken.usd_per_uah().await.is_none());
}

#[tokio::test]
async fn test_open_meteo_current_weather() {
    let base = spawn_lookup_server().await;
    let client = reqwest::Client::new();

    let weather = OpenMeteoWeather::with_url(client.clone(), format!("{}/forecast", base));
    let current = weather.weather_at(50.4, 30.6).await.unwrap();
    assert_eq!(current.temperature_c, 11.5);

    let bare = OpenMeteoWeather::with_url(client.clone(), format!("{}/forecast-bare", base));
    assert!(bare.weather_at(50.4, 30.6).await.is_none());

    let broken = OpenMeteoWeather::with_url(client, format!("{}/broken", base));
    assert!(broken.weather_at(50.4, 30.6).await.is_none());
}

#[tokio::test]
async fn test_unreachable_lookups_leave_dashes() {
    let order = Order::from_json(FULL_ORDER_JSON).unwrap();
    let client = reqwest::Client::builder().timeout(Duration::from_secs(2)).build().unwrap();
    let lookups = Lookups {
        vehicle: None,
        currency: Some(Arc::new(NbuCurrency::with_url(client.clone(), "http://127.0.0.1:1/rate"))),
        weather: Some(Arc::new(OpenMeteoWeather::with_url(client, "http://127.0.0.1:1/forecast"))),
    };

    let message = InvoiceAssembler::new(mail_config())
        .with_lookups(lookups)
        .assemble(&order)
        .await
        .unwrap();
    assert!(message.html.contains("<p><b>Price:</b> 240 UAH</p>"));
    assert!(!message.html.contains("Weather at destination"));
}
