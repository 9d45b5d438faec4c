use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use models::{cart_item, product};

use crate::errors::ServiceError;

/// A cart line joined with its product, ready for API serialization.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: Uuid,
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// Add a product to a user's cart, merging into an existing line.
///
/// Rejects unknown products so the cart never references dangling rows.
pub async fn add_item(
    db: &DatabaseConnection,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> Result<cart_item::Model, ServiceError> {
    product::find(db, product_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("product"))?;
    let line = cart_item::upsert(db, user_id, product_id, quantity).await?;
    Ok(line)
}

/// Set the quantity of an existing cart line.
pub async fn update_quantity(
    db: &DatabaseConnection,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> Result<cart_item::Model, ServiceError> {
    let line = cart_item::set_quantity(db, user_id, product_id, quantity).await?;
    Ok(line)
}

/// Remove a product from a user's cart. Removing an absent line is a no-op.
pub async fn remove_item(
    db: &DatabaseConnection,
    user_id: Uuid,
    product_id: Uuid,
) -> Result<(), ServiceError> {
    cart_item::remove(db, user_id, product_id).await?;
    Ok(())
}

/// List a user's cart lines with product details and per-line totals.
pub async fn list_items(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<CartLineView>, ServiceError> {
    let rows = cart_item::find_with_products(db, user_id).await?;
    let mut out = Vec::with_capacity(rows.len());
    for (line, prod) in rows {
        // A missing product here means the row was deleted underneath the
        // cart; surface it as an inconsistency instead of silently skipping.
        let prod = prod.ok_or_else(|| {
            ServiceError::Db(format!("cart references missing product {}", line.product_id))
        })?;
        let quantity = line.quantity;
        out.push(CartLineView {
            product_id: prod.id,
            name: prod.name,
            description: prod.description,
            unit_price: prod.price,
            quantity,
            line_total: prod.price * Decimal::from(quantity),
        });
    }
    Ok(out)
}

/// Total item count across the cart (sum of quantities, not line count).
pub async fn total_quantity(db: &DatabaseConnection, user_id: Uuid) -> Result<i64, ServiceError> {
    let total = cart_item::count_total_items(db, user_id).await?;
    Ok(total)
}

/// Sum of line totals over the whole cart.
pub async fn cart_total(db: &DatabaseConnection, user_id: Uuid) -> Result<Decimal, ServiceError> {
    let lines = list_items(db, user_id).await?;
    Ok(lines.iter().map(|l| l.line_total).sum())
}

/// Empty the cart; returns the number of removed lines.
pub async fn clear(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, ServiceError> {
    let removed = cart_item::delete_all_for_user(db, user_id).await?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::user::{self, Role};
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn cart_lifecycle() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let uname = format!("cart_svc_{}", Uuid::new_v4());
        let u = user::create(&db, &uname, Role::Customer).await?;
        let p1 = product::create(&db, "Keyboard", "mech", Decimal::new(10000, 2), 10).await?;
        let p2 = product::create(&db, "Mouse", "optical", Decimal::new(5000, 2), 10).await?;

        add_item(&db, u.id, p1.id, 2).await?;
        add_item(&db, u.id, p2.id, 1).await?;
        // merging bump
        add_item(&db, u.id, p2.id, 2).await?;

        assert_eq!(total_quantity(&db, u.id).await?, 5);
        assert_eq!(cart_total(&db, u.id).await?, Decimal::new(35000, 2));

        let lines = list_items(&db, u.id).await?;
        assert_eq!(lines.len(), 2);
        let kb = lines.iter().find(|l| l.product_id == p1.id).unwrap();
        assert_eq!(kb.line_total, Decimal::new(20000, 2));

        update_quantity(&db, u.id, p2.id, 1).await?;
        assert_eq!(total_quantity(&db, u.id).await?, 3);

        remove_item(&db, u.id, p1.id).await?;
        assert_eq!(total_quantity(&db, u.id).await?, 1);

        let removed = clear(&db, u.id).await?;
        assert_eq!(removed, 1);
        assert_eq!(total_quantity(&db, u.id).await?, 0);

        cart_item::delete_all_for_user(&db, u.id).await?;
        user::Entity::delete_by_id(u.id).exec(&db).await?;
        product::Entity::delete_by_id(p1.id).exec(&db).await?;
        product::Entity::delete_by_id(p2.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_product_fails() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let uname = format!("cart_svc_{}", Uuid::new_v4());
        let u = user::create(&db, &uname, Role::Customer).await?;
        let err = add_item(&db, u.id, Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }
}
