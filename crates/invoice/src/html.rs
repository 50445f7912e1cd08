//! Invoice body rendering.

use std::fmt::Write;

use crate::lookups::InvoiceExtras;
use crate::order::Order;

/// Placeholder for values the order does not carry.
pub const MISSING: &str = "—";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn text_or_missing(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_else(|| MISSING.to_string())
}

/// Numbers print without trailing zeros: `12.5`, `8`, `240.75`.
fn number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let s = format!("{:.2}", v);
            match s.trim_end_matches('0').trim_end_matches('.') {
                "" | "-" => "0".to_string(),
                trimmed => trimmed.to_string(),
            }
        }
        _ => MISSING.to_string(),
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{} {}", number(Some(v)), unit),
        _ => MISSING.to_string(),
    }
}

fn row(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(html, "<p><b>{}:</b> {}</p>", label, value);
}

/// Render the HTML body of an order's invoice. All order text is escaped.
pub fn render_invoice_html(order: &Order, extras: &InvoiceExtras) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<h2>New delivery invoice</h2>\n");

    row(&mut html, "Sender", &text_or_missing(order.sender_name()));
    row(&mut html, "Sender address", &text_or_missing(order.sender_address()));
    html.push_str("<br/>\n");
    row(&mut html, "Receiver", &text_or_missing(order.receiver_name()));
    row(&mut html, "Receiver address", &text_or_missing(order.receiver_address()));
    html.push_str("<hr/>\n");

    let date = order.delivery_date().map(|d| d.format("%Y-%m-%d").to_string());
    let time = order.delivery_time().map(|t| t.format("%H:%M").to_string());
    row(&mut html, "Delivery date", &text_or_missing(date.as_deref()));
    row(&mut html, "Delivery time", &text_or_missing(time.as_deref()));
    row(&mut html, "Status", order.order_status.label());
    html.push_str("<hr/>\n");

    if let Some(vehicle) = &extras.vehicle {
        row(&mut html, "Recommended vehicle", &escape(&vehicle.kind));
        row(&mut html, "Vehicle capacity", &with_unit(Some(vehicle.max_weight_kg), "kg"));
    }
    row(&mut html, "Weight", &with_unit(order.weight, "kg"));
    row(&mut html, "Distance", &with_unit(order.distance, "km"));

    let price = match (order.price, extras.price_usd) {
        (Some(_), Some(usd)) => format!("{} ({:.2} USD)", with_unit(order.price, "UAH"), usd),
        _ => with_unit(order.price, "UAH"),
    };
    row(&mut html, "Price", &price);

    if let Some(weather) = &extras.weather {
        let mut line = format!("{:.1}°C", weather.temperature_c);
        if let Some(desc) = &weather.description {
            let _ = write!(line, " ({})", escape(desc));
        }
        row(&mut html, "Weather at destination", &line);
    }

    row(&mut html, "Comment", &text_or_missing(order.comment()));

    if extras.route_attached {
        html.push_str("<br/>\n<p>The route is attached as a PNG map.</p>\n");
    }

    let id = order.id.map(|id| id.to_string());
    let _ = writeln!(html, "<p>Order ID: {}</p>", id.as_deref().unwrap_or("n/a"));

    html
}
