//! The delivery order as submitted by clients.
//!
//! Keys are camelCase, with the older spellings (`firstname`, `addressa`,
//! `pointALat`, `delivery_date`, `order_status`, ...) accepted as aliases.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use route_common::{Route, RouteError, Waypoint};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{InvoiceError, InvoiceResult};

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Created,
    Accepted,
    OnWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Created,
        OrderStatus::Accepted,
        OrderStatus::OnWay,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Accepted => "accepted",
            OrderStatus::OnWay => "on_way",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Human-readable form for invoices.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::OnWay => "On the way",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Couriers may move an order to any status except back to `created`.
    pub fn courier_settable(&self) -> bool {
        !matches!(self, OrderStatus::Created)
    }

    /// Orders still waiting for or in delivery.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Created | OrderStatus::Accepted | OrderStatus::OnWay)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| InvoiceError::InvalidOrder(format!("unknown order status '{}'", s)))
    }
}

/// Accepts `12.5`, `"12.5"`, `""` or null.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("not a number: {:?}", s))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, alias = "firstname")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastname")]
    pub last_name: Option<String>,

    #[serde(
        rename = "pointA_lat",
        alias = "pointALat",
        default,
        deserialize_with = "lenient_number"
    )]
    pub point_a_lat: Option<f64>,
    #[serde(
        rename = "pointA_lng",
        alias = "pointALng",
        default,
        deserialize_with = "lenient_number"
    )]
    pub point_a_lng: Option<f64>,
    #[serde(
        rename = "pointB_lat",
        alias = "pointBLat",
        default,
        deserialize_with = "lenient_number"
    )]
    pub point_b_lat: Option<f64>,
    #[serde(
        rename = "pointB_lng",
        alias = "pointBLng",
        default,
        deserialize_with = "lenient_number"
    )]
    pub point_b_lng: Option<f64>,

    /// Kilograms
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
    /// Kilometres
    #[serde(default, deserialize_with = "lenient_number")]
    pub distance: Option<f64>,
    /// Hryvnias
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,

    #[serde(default, alias = "addressa")]
    pub address_a: Option<String>,
    #[serde(default, alias = "addressb")]
    pub address_b: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub receiver_address: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,

    /// `[lat, lng]` pairs from pickup to dropoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<[f64; 2]>>,

    /// `YYYY-MM-DD`
    #[serde(default, alias = "delivery_date")]
    pub delivery_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`
    #[serde(default, alias = "delivery_time")]
    pub delivery_time: Option<String>,

    #[serde(default, alias = "order_status")]
    pub order_status: OrderStatus,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Order {
    pub fn from_json(json: &str) -> InvoiceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pickup and dropoff coordinates and the weight are required.
    pub fn validate(&self) -> InvoiceResult<()> {
        let pair_ok = |lat: Option<f64>, lng: Option<f64>| {
            matches!((lat, lng), (Some(a), Some(b)) if a.is_finite() && b.is_finite())
        };

        if !pair_ok(self.point_a_lat, self.point_a_lng) {
            return Err(InvoiceError::InvalidOrder("pointA coordinates required".to_string()));
        }
        if !pair_ok(self.point_b_lat, self.point_b_lng) {
            return Err(InvoiceError::InvalidOrder("pointB coordinates required".to_string()));
        }
        match self.weight {
            Some(w) if w.is_finite() && w >= 0.0 => {}
            Some(w) => {
                return Err(InvoiceError::InvalidOrder(format!(
                    "weight must be a non-negative number, got {}",
                    w
                )))
            }
            None => return Err(InvoiceError::InvalidOrder("weight required".to_string())),
        }

        if present(&self.delivery_date).is_some() && self.delivery_date().is_none() {
            return Err(InvoiceError::InvalidOrder(format!(
                "deliveryDate must be YYYY-MM-DD, got {:?}",
                self.delivery_date.as_deref().unwrap_or_default()
            )));
        }
        if present(&self.delivery_time).is_some() && self.delivery_time().is_none() {
            return Err(InvoiceError::InvalidOrder(format!(
                "deliveryTime must be HH:MM or HH:MM:SS, got {:?}",
                self.delivery_time.as_deref().unwrap_or_default()
            )));
        }
        Ok(())
    }

    pub fn pickup(&self) -> Option<Waypoint> {
        Some(Waypoint::new(self.point_a_lat?, self.point_a_lng?))
    }

    pub fn dropoff(&self) -> Option<Waypoint> {
        Some(Waypoint::new(self.point_b_lat?, self.point_b_lng?))
    }

    /// Route points, only when there are enough to draw a map.
    pub fn route_points(&self) -> Option<&[[f64; 2]]> {
        self.route
            .as_deref()
            .filter(|points| points.len() >= Route::MIN_WAYPOINTS)
    }

    /// The route as a validated [`Route`], if the order carries one.
    pub fn route(&self) -> Option<Result<Route, RouteError>> {
        self.route_points().map(Route::from_pairs)
    }

    pub fn delivery_date(&self) -> Option<NaiveDate> {
        present(&self.delivery_date).and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    pub fn delivery_time(&self) -> Option<NaiveTime> {
        let s = present(&self.delivery_time)?;
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
    }

    pub fn sender_name(&self) -> Option<&str> {
        present(&self.sender_name)
    }

    pub fn sender_address(&self) -> Option<&str> {
        present(&self.sender_address).or_else(|| present(&self.address_a))
    }

    pub fn receiver_name(&self) -> Option<&str> {
        present(&self.receiver_name)
    }

    pub fn receiver_address(&self) -> Option<&str> {
        present(&self.receiver_address).or_else(|| present(&self.address_b))
    }

    pub fn comment(&self) -> Option<&str> {
        present(&self.comment)
    }
}
