//! The pricing engine
//!
//! One pure function computes the discounted price for a service given the
//! customer's subscription plan. Display paths and the checkout path both
//! call it; the checkout path feeds the result straight to the payment
//! processor, so the plan must come from the profile row, never the client.
//!
//! Prices stay at full decimal precision internally; rounding to the
//! currency's minor unit happens only in `charge_amount_cents`, at the
//! point of transmission to the processor.

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::Serialize;

use hearth_types::SubscriptionPlan;

/// A priced service for one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Undiscounted service price
    pub list_price: BigDecimal,
    /// Price after the plan discount, full precision
    pub final_price: BigDecimal,
    /// `list_price - final_price`
    pub savings: BigDecimal,
}

/// Compute the discounted price for a service
pub fn quote(list_price: &BigDecimal, plan: SubscriptionPlan) -> Quote {
    let percent_off = BigDecimal::from(plan.discount_percent());
    let hundred = BigDecimal::from(100u32);

    let final_price = list_price * (&hundred - &percent_off) / &hundred;
    let savings = list_price - &final_price;

    Quote {
        list_price: list_price.clone(),
        final_price,
        savings,
    }
}

/// Round a quote to minor units (cents) for the payment processor
///
/// Half-up to two decimal places, then scaled to an integer amount. This is
/// the only place a price is rounded.
pub fn charge_amount_cents(quote: &Quote) -> i64 {
    let cents = (&quote.final_price * BigDecimal::from(100u32))
        .with_scale_round(0, bigdecimal::RoundingMode::HalfUp);
    // Prices are non-negative decimals with bounded scale; this cannot
    // exceed i64 for any realistic amount.
    cents.to_i64().unwrap_or(i64::MAX)
}

/// Totals across a customer's outstanding payments
///
/// Presentation derivative only: each booking is still charged through its
/// own checkout session.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    /// Sum of final prices
    pub total_due: BigDecimal,
    /// Sum of (list - final)
    pub total_savings: BigDecimal,
}

/// Sum quotes for a multi-booking payment page
pub fn summarize<'a>(quotes: impl IntoIterator<Item = &'a Quote>) -> PaymentSummary {
    let mut total_due = BigDecimal::zero();
    let mut total_savings = BigDecimal::zero();

    for q in quotes {
        total_due += &q.final_price;
        total_savings += &q.savings;
    }

    PaymentSummary {
        total_due,
        total_savings,
    }
}
