//! Delivery invoices.
//!
//! An [`Order`] is validated, enriched by optional lookups, rendered to an
//! HTML body and, when it carries a route, given a `route.png` map from the
//! renderer. The result is handed to a [`MailTransport`].

pub mod assembler;
pub mod error;
pub mod html;
pub mod lookups;
pub mod mail;
pub mod order;

pub use assembler::InvoiceAssembler;
pub use error::{InvoiceError, InvoiceResult};
pub use html::render_invoice_html;
pub use lookups::{
    CurrencyLookup, InvoiceExtras, Lookups, NbuCurrency, OpenMeteoWeather, Vehicle, VehicleLookup,
    Weather, WeatherLookup, WeightClassVehicles,
};
pub use mail::{Attachment, InvoiceMessage, MailConfig, MailTransport, OutboxTransport};
pub use order::{Order, OrderStatus};
