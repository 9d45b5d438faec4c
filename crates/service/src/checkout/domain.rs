use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::errors::CheckoutError;

/// What to do when a cart line asks for more units than are in stock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum OversellPolicy {
    /// Sell what is left and floor the stock at zero.
    #[default]
    ClampToZero,
    /// Abort the checkout for oversold lines.
    Reject,
}

impl OversellPolicy {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => OversellPolicy::Reject,
            _ => OversellPolicy::ClampToZero,
        }
    }
}

/// A cart line joined with live product data, input to plan building.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub stock: i32,
}

/// One purchase-time snapshot line. The repository decrements stock by
/// `quantity` against the live row, so the plan carries no absolute level.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub total_price: Decimal,
}

/// Everything phase 2 writes, computed up front so the transaction body is
/// pure bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPlan {
    pub lines: Vec<OrderLine>,
    pub total_amount: Decimal,
}

/// Build the purchase plan from the current cart.
///
/// Under `ClampToZero` a line asking for more than the stock sells the
/// remainder; lines with nothing left to sell are dropped. Under `Reject`
/// any oversold line aborts the whole plan.
pub fn build_checkout_plan(
    cart: &[CartLine],
    policy: OversellPolicy,
) -> Result<CheckoutPlan, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(cart.len());
    let mut total = Decimal::ZERO;
    for item in cart {
        let sold = match policy {
            OversellPolicy::ClampToZero => item.quantity.min(item.stock),
            OversellPolicy::Reject => {
                if item.quantity > item.stock {
                    return Err(CheckoutError::Oversold(item.product_id));
                }
                item.quantity
            }
        };
        if sold <= 0 {
            continue;
        }
        let line_total = item.unit_price * Decimal::from(sold);
        total += line_total;
        lines.push(OrderLine {
            product_id: item.product_id,
            quantity: sold,
            price_per_unit: item.unit_price,
            total_price: line_total,
        });
    }

    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    Ok(CheckoutPlan { lines, total_amount: total })
}

/// Amount in minor units (e.g. rupees to paise), truncated.
pub fn minor_units(amount: Decimal) -> Result<i64, CheckoutError> {
    (amount * Decimal::from(100))
        .trunc()
        .to_i64()
        .ok_or_else(|| CheckoutError::Amount(format!("amount out of range: {}", amount)))
}

/// Receipt id sent to the provider with each order.
pub fn receipt_id() -> String {
    format!("txn_{}", Utc::now().timestamp_millis())
}
