//! Booking event publisher backed by tracing and metrics
//!
//! Stands in for the realtime push channel: every booking change is logged
//! with the ids both UIs subscribe on and counted by kind. Delivery is
//! fire-and-forget by contract, so there is nothing to retry here.

use async_trait::async_trait;

use hearth_booking_core::{BookingEvent, BookingEventKind, BookingEventPublisher};

/// Publisher that emits booking events as structured logs and counters
pub struct TracingEventPublisher;

#[async_trait]
impl BookingEventPublisher for TracingEventPublisher {
    async fn publish(&self, event: BookingEvent) {
        let kind = match event.kind {
            BookingEventKind::Created => "created",
            BookingEventKind::StatusChanged { .. } => "status_changed",
            BookingEventKind::FeedbackSubmitted => "feedback_submitted",
        };

        match event.kind {
            BookingEventKind::StatusChanged { to } => {
                tracing::info!(
                    booking_id = %event.booking_id,
                    customer_id = %event.customer_id,
                    provider_id = %event.provider_id,
                    status = %to,
                    "Booking event: status changed"
                );
            }
            _ => {
                tracing::info!(
                    booking_id = %event.booking_id,
                    customer_id = %event.customer_id,
                    provider_id = %event.provider_id,
                    kind,
                    "Booking event"
                );
            }
        }

        metrics::counter!("booking_events_total", "kind" => kind).increment(1);
    }
}
