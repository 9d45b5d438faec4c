use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use models::{cart_item, order, order_item, product};

use crate::checkout::domain::{CartLine, CheckoutPlan};
use crate::checkout::errors::CheckoutError;
use crate::checkout::repository::{CheckoutRepository, LocalOrder};

pub struct SeaOrmCheckoutRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: impl std::fmt::Display) -> CheckoutError {
    CheckoutError::Repository(e.to_string())
}

#[async_trait]
impl CheckoutRepository for SeaOrmCheckoutRepository {
    async fn cart_items_with_products(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CartLine>, CheckoutError> {
        let rows = cart_item::find_with_products(&self.db, user_id)
            .await
            .map_err(db_err)?;
        let mut lines = Vec::with_capacity(rows.len());
        for (line, prod) in rows {
            let prod = prod.ok_or_else(|| {
                db_err(format!("cart references missing product {}", line.product_id))
            })?;
            lines.push(CartLine {
                product_id: prod.id,
                name: prod.name,
                unit_price: prod.price,
                quantity: line.quantity,
                stock: prod.stock,
            });
        }
        Ok(lines)
    }

    async fn insert_pending_order(
        &self,
        order_id: &str,
        user_id: Uuid,
        total_amount: Decimal,
    ) -> Result<LocalOrder, CheckoutError> {
        let created = order::insert_pending(&self.db, order_id, user_id, total_amount)
            .await
            .map_err(db_err)?;
        Ok(LocalOrder {
            order_id: created.order_id,
            user_id: created.user_id,
            total_amount: created.total_amount,
            status: created.status,
        })
    }

    async fn find_order(&self, order_id: &str) -> Result<Option<LocalOrder>, CheckoutError> {
        let found = order::find(&self.db, order_id).await.map_err(db_err)?;
        Ok(found.map(|o| LocalOrder {
            order_id: o.order_id,
            user_id: o.user_id,
            total_amount: o.total_amount,
            status: o.status,
        }))
    }

    /// One transaction for the whole phase-2 write set. A rollback leaves the
    /// order PENDING and the cart and stock untouched.
    ///
    /// The status flip is guarded with `WHERE status = 'PENDING'`, so a
    /// replayed commit (or a concurrent one racing this transaction) matches
    /// zero rows and aborts. Stock is decremented in place with a floor at
    /// zero rather than written as an absolute value, so two checkouts of
    /// different orders touching the same product cannot lose an update.
    async fn commit_checkout(
        &self,
        order_id: &str,
        user_id: Uuid,
        plan: &CheckoutPlan,
    ) -> Result<(), CheckoutError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now().into();

        let flipped = order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(order::OrderStatus::Success))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::OrderId.eq(order_id))
            .filter(order::Column::Status.eq(order::OrderStatus::Pending))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if flipped.rows_affected == 0 {
            let exists = order::Entity::find_by_id(order_id.to_string())
                .one(&txn)
                .await
                .map_err(db_err)?;
            return Err(match exists {
                Some(_) => CheckoutError::AlreadyProcessed(order_id.to_string()),
                None => CheckoutError::OrderNotFound(order_id.to_string()),
            });
        }

        for line in &plan.lines {
            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id.to_string()),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                price_per_unit: Set(line.price_per_unit),
                total_price: Set(line.total_price),
                created_at: Set(now),
            };
            item.insert(&txn).await.map_err(db_err)?;

            let updated = product::Entity::update_many()
                .col_expr(
                    product::Column::Stock,
                    Expr::cust_with_values("GREATEST(stock - ?, 0)", [line.quantity]),
                )
                .col_expr(product::Column::UpdatedAt, Expr::value(now))
                .filter(product::Column::Id.eq(line.product_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            if updated.rows_affected == 0 {
                return Err(db_err(format!("product {} vanished", line.product_id)));
            }
        }

        cart_item::Entity::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}
