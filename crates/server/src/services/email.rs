//! Order confirmation email to the restaurant inbox.
//!
//! Sending is strictly fire-and-forget: the checkout response never waits on
//! SMTP and a delivery failure is logged, not surfaced to the customer.

use std::fmt::Write as _;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Order;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for the new-order notification.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    order_inbox: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay parameters are invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            order_inbox: config.order_inbox.clone(),
        })
    }

    /// Send the new-order notification to the restaurant inbox.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or the relay rejects it.
    pub async fn send_order_notification(&self, order: &Order) -> Result<(), EmailError> {
        let subject = format!("New Order Received - {}", order.display_id);
        let body = order_email_body(order);

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .order_inbox
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.order_inbox.clone()))?)
            .subject(&subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(order = %order.display_id, "Order notification sent");
        Ok(())
    }

    /// Spawn the notification in the background, swallowing failures.
    pub fn spawn_order_notification(&self, order: Order) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.send_order_notification(&order).await {
                tracing::error!(
                    error = %e,
                    order = %order.display_id,
                    "Failed to send order notification"
                );
            }
        });
    }
}

/// Render the plain-text notification body.
fn order_email_body(order: &Order) -> String {
    let mut body = String::new();

    let _ = writeln!(body, "Order {}", order.display_id);
    let _ = writeln!(body, "Placed: {}", order.order_date);
    let _ = writeln!(body, "Type: {}", order.order_type.as_str());
    let _ = writeln!(body, "Payment: {}", order.payment_method.as_str());
    let _ = writeln!(body);

    let _ = writeln!(body, "Customer: {} ({})", order.user_name, order.user_phone);
    if let Some(address) = &order.delivery_address {
        let _ = writeln!(body, "Address: {address}");
    }
    match (order.delivery_time.asap, &order.delivery_time.scheduled_time) {
        (true, _) => {
            let _ = writeln!(body, "When: as soon as possible");
        }
        (false, Some(slot)) => {
            let _ = writeln!(body, "When: {slot}");
        }
        (false, None) => {}
    }
    if !order.delivery_note.is_empty() {
        let _ = writeln!(body, "Note: {}", order.delivery_note);
    }
    let _ = writeln!(body);

    let _ = writeln!(body, "Items:");
    for item in &order.items {
        let _ = writeln!(body, "  {}x {} - {} EUR", item.quantity, item.item_name, item.price);
        if let Some(custom) = &item.customization {
            for option in &custom.options {
                let _ = writeln!(body, "     + {option}");
            }
            if let Some(level) = custom.spicy_level {
                let _ = writeln!(body, "     + spice: {}", level.as_str());
            }
            if let Some(notes) = &custom.notes {
                let _ = writeln!(body, "     note: {notes}");
            }
        }
    }
    let _ = writeln!(body);

    let amount = &order.amount;
    let _ = writeln!(body, "Subtotal:     {} EUR", amount.order_total);
    let _ = writeln!(body, "Delivery fee: {} EUR", amount.delivery_fee);
    let _ = writeln!(body, "Service fee:  {} EUR", amount.service_fee);
    if !amount.tip_amount.is_zero() {
        let _ = writeln!(body, "Tip:          {} EUR", amount.tip_amount);
    }
    if let Some(discount) = &amount.discount {
        let _ = writeln!(body, "Discount ({}): -{} EUR", discount.code, discount.amount);
    }
    let _ = writeln!(
        body,
        "Total:        {} EUR",
        amount.order_total + amount.delivery_fee + amount.service_fee + amount.tip_amount
            - amount.discount.as_ref().map_or(rust_decimal::Decimal::ZERO, |d| d.amount)
    );

    body
}
