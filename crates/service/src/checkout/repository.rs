use async_trait::async_trait;
use models::order::OrderStatus;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::domain::{CartLine, CheckoutPlan};
use super::errors::CheckoutError;

/// Local view of an order row.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalOrder {
    pub order_id: String,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
}

/// Persistence boundary of the checkout flow.
///
/// `commit_checkout` is the only mutation of phase 2 and must be atomic:
/// either the order flips to SUCCESS, every plan line is snapshotted, stock
/// is decremented (floored at zero) against the live rows, and the cart is
/// cleared, or nothing happened at all. The flip only applies while the
/// order is still PENDING; anything else is `AlreadyProcessed`, so a
/// concurrent second commit of the same order cannot double-decrement.
#[async_trait]
pub trait CheckoutRepository: Send + Sync {
    async fn cart_items_with_products(&self, user_id: Uuid)
        -> Result<Vec<CartLine>, CheckoutError>;

    async fn insert_pending_order(
        &self,
        order_id: &str,
        user_id: Uuid,
        total_amount: Decimal,
    ) -> Result<LocalOrder, CheckoutError>;

    async fn find_order(&self, order_id: &str) -> Result<Option<LocalOrder>, CheckoutError>;

    async fn commit_checkout(
        &self,
        order_id: &str,
        user_id: Uuid,
        plan: &CheckoutPlan,
    ) -> Result<(), CheckoutError>;
}

/// In-memory repository for orchestrator tests. `fail_commit` injects a
/// failure into `commit_checkout` before any state is touched, which is how
/// the atomicity tests observe "no partial effects".
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct MockOrderItem {
        pub product_id: Uuid,
        pub quantity: i32,
        pub price_per_unit: Decimal,
        pub total_price: Decimal,
    }

    #[derive(Default)]
    pub struct MockCheckoutRepository {
        pub carts: Mutex<HashMap<Uuid, Vec<CartLine>>>,
        pub stock: Mutex<HashMap<Uuid, i32>>,
        pub orders: Mutex<HashMap<String, LocalOrder>>,
        pub order_items: Mutex<HashMap<String, Vec<MockOrderItem>>>,
        pub fail_commit: AtomicBool,
    }

    impl MockCheckoutRepository {
        pub fn seed_cart(&self, user_id: Uuid, lines: Vec<CartLine>) {
            let mut stock = self.stock.lock().unwrap();
            for l in &lines {
                stock.insert(l.product_id, l.stock);
            }
            self.carts.lock().unwrap().insert(user_id, lines);
        }

        pub fn stock_of(&self, product_id: Uuid) -> Option<i32> {
            self.stock.lock().unwrap().get(&product_id).copied()
        }
    }

    #[async_trait]
    impl CheckoutRepository for MockCheckoutRepository {
        async fn cart_items_with_products(
            &self,
            user_id: Uuid,
        ) -> Result<Vec<CartLine>, CheckoutError> {
            let carts = self.carts.lock().unwrap();
            let stock = self.stock.lock().unwrap();
            let mut lines = carts.get(&user_id).cloned().unwrap_or_default();
            for l in &mut lines {
                if let Some(s) = stock.get(&l.product_id) {
                    l.stock = *s;
                }
            }
            Ok(lines)
        }

        async fn insert_pending_order(
            &self,
            order_id: &str,
            user_id: Uuid,
            total_amount: Decimal,
        ) -> Result<LocalOrder, CheckoutError> {
            let order = LocalOrder {
                order_id: order_id.to_string(),
                user_id,
                total_amount,
                status: OrderStatus::Pending,
            };
            self.orders.lock().unwrap().insert(order_id.to_string(), order.clone());
            Ok(order)
        }

        async fn find_order(&self, order_id: &str) -> Result<Option<LocalOrder>, CheckoutError> {
            Ok(self.orders.lock().unwrap().get(order_id).cloned())
        }

        async fn commit_checkout(
            &self,
            order_id: &str,
            user_id: Uuid,
            plan: &CheckoutPlan,
        ) -> Result<(), CheckoutError> {
            if self.fail_commit.load(Ordering::SeqCst) {
                return Err(CheckoutError::Repository("injected commit failure".into()));
            }
            {
                let mut orders = self.orders.lock().unwrap();
                let order = orders
                    .get_mut(order_id)
                    .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;
                if order.status != OrderStatus::Pending {
                    return Err(CheckoutError::AlreadyProcessed(order_id.to_string()));
                }
                order.status = OrderStatus::Success;
            }
            let items = plan
                .lines
                .iter()
                .map(|l| MockOrderItem {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price_per_unit: l.price_per_unit,
                    total_price: l.total_price,
                })
                .collect();
            self.order_items.lock().unwrap().insert(order_id.to_string(), items);
            {
                let mut stock = self.stock.lock().unwrap();
                for l in &plan.lines {
                    let s = stock.entry(l.product_id).or_insert(0);
                    *s = (*s - l.quantity).max(0);
                }
            }
            self.carts.lock().unwrap().remove(&user_id);
            Ok(())
        }
    }
}
