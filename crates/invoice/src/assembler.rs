//! Turning an order into an invoice message.

use metrics::counter;
use renderer::{RouteMap, RouteMapRenderer};
use tracing::{info, instrument, warn};

use crate::error::InvoiceResult;
use crate::html::render_invoice_html;
use crate::lookups::Lookups;
use crate::mail::{Attachment, InvoiceMessage, MailConfig, MailTransport};
use crate::order::Order;

/// Builds invoice messages for orders.
///
/// A route map is rendered only for orders carrying at least two route
/// points. Rendering problems never fail the invoice; the message goes
/// out without the map.
#[derive(Debug, Clone)]
pub struct InvoiceAssembler {
    mail: MailConfig,
    renderer: Option<RouteMapRenderer>,
    lookups: Lookups,
}

impl InvoiceAssembler {
    pub fn new(mail: MailConfig) -> Self {
        Self {
            mail,
            renderer: None,
            lookups: Lookups::none(),
        }
    }

    pub fn with_renderer(mut self, renderer: RouteMapRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_lookups(mut self, lookups: Lookups) -> Self {
        self.lookups = lookups;
        self
    }

    pub fn mail_config(&self) -> &MailConfig {
        &self.mail
    }

    #[instrument(skip_all, fields(order_id = ?order.id))]
    pub async fn assemble(&self, order: &Order) -> InvoiceResult<InvoiceMessage> {
        order.validate()?;

        let (mut extras, route_map) =
            tokio::join!(self.lookups.gather(order), self.route_map(order));
        extras.route_attached = route_map.is_some();

        let html = render_invoice_html(order, &extras);
        let mut message = InvoiceMessage::new(&self.mail, order, html);
        if let Some(map) = route_map {
            message.attach(Attachment::png(RouteMap::FILENAME, map.into_bytes()));
        }

        counter!("route_map_invoices_total").increment(1);
        Ok(message)
    }

    /// Assemble and hand the message to `transport`.
    pub async fn dispatch(
        &self,
        order: &Order,
        transport: &dyn MailTransport,
    ) -> InvoiceResult<InvoiceMessage> {
        let message = self.assemble(order).await?;
        transport.send(&message).await?;
        info!(
            order_id = ?order.id,
            transport = transport.name(),
            to = %message.to,
            "Invoice dispatched"
        );
        Ok(message)
    }

    async fn route_map(&self, order: &Order) -> Option<RouteMap> {
        let renderer = self.renderer.as_ref()?;
        let points = order.route_points()?;

        match renderer.render_pairs(points).await {
            Ok(map) => {
                if !map.is_complete() {
                    warn!(missing = map.missing_tiles, "Route map has missing tiles");
                }
                Some(map)
            }
            Err(e) => {
                counter!("route_map_invoice_attachment_failures_total").increment(1);
                warn!(error = %e, "Sending invoice without a route map");
                None
            }
        }
    }
}
