//! Common test fixtures for route-map tests.
//!
//! Coordinates are `[lat, lng]` pairs, matching order payloads.

/// Routes with known tile footprints at zoom 14.
pub mod routes {
    /// Two points across central Kyiv; spans tiles x 9580..=9584, y 5524..=5528.
    pub const KYIV_TWO_POINT: [[f64; 2]; 2] = [[50.45, 30.52], [50.40, 30.60]];

    /// Three points through Kyiv; spans tiles x 9581..=9583, y 5524..=5526.
    pub const KYIV_MULTI: [[f64; 2]; 3] = [
        [50.4547, 30.5238],
        [50.4390, 30.5430],
        [50.4265, 30.5665],
    ];

    /// About 80 km from Kyiv to Bila Tserkva; spans 19 x 47 tiles.
    pub const KYIV_BILA_TSERKVA: [[f64; 2]; 2] = [[50.45, 30.52], [49.80, 30.11]];

    /// Two points inside tile 14/9581/5524.
    pub const SINGLE_TILE: [[f64; 2]; 2] = [[50.4501, 30.5201], [50.4502, 30.5203]];

    /// The same point twice.
    pub const REPEATED_POINT: [[f64; 2]; 2] = [[50.0, 30.0], [50.0, 30.0]];

    /// Close to the equator/prime meridian crossing.
    pub const NULL_ISLAND: [[f64; 2]; 2] = [[0.001, -0.001], [-0.001, 0.001]];
}

/// Order payloads as the order API receives them.
pub mod orders {
    /// Only the required fields.
    pub const MINIMAL_ORDER_JSON: &str = r#"{
        "pointA_lat": 50.45,
        "pointA_lng": 30.52,
        "pointB_lat": 50.40,
        "pointB_lng": 30.60,
        "weight": 12.5
    }"#;

    /// Every field, including a route.
    pub const FULL_ORDER_JSON: &str = r#"{
        "id": 42,
        "firstName": "Olena",
        "lastName": "Koval",
        "pointA_lat": 50.45,
        "pointA_lng": 30.52,
        "pointB_lat": 50.40,
        "pointB_lng": 30.60,
        "weight": 12.5,
        "distance": 8.3,
        "price": 240.0,
        "addressA": "Khreshchatyk St, 1",
        "addressB": "Holosiivskyi Ave, 50",
        "senderName": "Olena Koval",
        "senderAddress": "Khreshchatyk St, 1",
        "receiverName": "Taras <Shevchenko>",
        "receiverAddress": "Holosiivskyi Ave, 50",
        "comment": "Fragile & heavy",
        "deliveryDate": "2026-10-20",
        "deliveryTime": "14:30",
        "orderStatus": "accepted",
        "route": [[50.45, 30.52], [50.43, 30.55], [50.40, 30.60]]
    }"#;
}
