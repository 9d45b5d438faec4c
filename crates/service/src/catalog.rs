use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use models::product;

use crate::errors::ServiceError;

/// Create a product in the catalog.
pub async fn create_product(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    price: Decimal,
    stock: i32,
) -> Result<product::Model, ServiceError> {
    let created = product::create(db, name, description, price, stock).await?;
    Ok(created)
}

/// Get a product by id.
pub async fn get_product(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<product::Model>, ServiceError> {
    let found = product::find(db, id).await?;
    Ok(found)
}

/// List the whole catalog, newest first.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>, ServiceError> {
    let products = product::Entity::find()
        .order_by_desc(product::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(products)
}

/// Replace a product's price.
pub async fn update_price(
    db: &DatabaseConnection,
    id: Uuid,
    price: Decimal,
) -> Result<product::Model, ServiceError> {
    if price < Decimal::ZERO {
        return Err(ServiceError::Validation("price must be non-negative".into()));
    }
    let mut am: product::ActiveModel = product::find(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("product"))?
        .into();
    am.price = Set(price);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Replace a product's stock level.
pub async fn update_stock(
    db: &DatabaseConnection,
    id: Uuid,
    stock: i32,
) -> Result<product::Model, ServiceError> {
    if stock < 0 {
        return Err(ServiceError::Validation("stock must be non-negative".into()));
    }
    let mut am: product::ActiveModel = product::find(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("product"))?
        .into();
    am.stock = Set(stock);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a product.
pub async fn delete_product(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    product::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn product_crud_service() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let p = create_product(&db, "Lamp", "desk lamp", Decimal::new(2500, 2), 7).await?;
        assert_eq!(p.stock, 7);

        let found = get_product(&db, p.id).await?.unwrap();
        assert_eq!(found.name, "Lamp");

        let repriced = update_price(&db, p.id, Decimal::new(1999, 2)).await?;
        assert_eq!(repriced.price, Decimal::new(1999, 2));

        let restocked = update_stock(&db, p.id, 3).await?;
        assert_eq!(restocked.stock, 3);

        let err = update_stock(&db, p.id, -1).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        delete_product(&db, p.id).await?;
        assert!(get_product(&db, p.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_product_not_found() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };

        let err = update_price(&db, Uuid::new_v4(), Decimal::new(100, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
