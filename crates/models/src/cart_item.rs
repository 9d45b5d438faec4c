use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, product, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::Id)
                .into(),
        }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_quantity(quantity: i32) -> Result<(), errors::ModelError> {
    if quantity <= 0 {
        return Err(errors::ModelError::Validation("quantity must be positive".into()));
    }
    Ok(())
}

pub async fn find_by_user_and_product(
    db: &DatabaseConnection,
    user_id: Uuid,
    product_id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::ProductId.eq(product_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Insert a new line or bump the quantity of an existing (user, product) line.
pub async fn upsert(
    db: &DatabaseConnection,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> Result<Model, errors::ModelError> {
    validate_quantity(quantity)?;
    let now = Utc::now().into();
    if let Some(existing) = find_by_user_and_product(db, user_id, product_id).await? {
        let new_quantity = existing.quantity + quantity;
        let mut am: ActiveModel = existing.into();
        am.quantity = Set(new_quantity);
        am.updated_at = Set(now);
        am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
    } else {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
    }
}

pub async fn set_quantity(
    db: &DatabaseConnection,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> Result<Model, errors::ModelError> {
    validate_quantity(quantity)?;
    let existing = find_by_user_and_product(db, user_id, product_id)
        .await?
        .ok_or_else(|| errors::ModelError::Validation("cart item not found".into()))?;
    let mut am: ActiveModel = existing.into();
    am.quantity = Set(quantity);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn remove(
    db: &DatabaseConnection,
    user_id: Uuid,
    product_id: Uuid,
) -> Result<(), errors::ModelError> {
    Entity::delete_many()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::ProductId.eq(product_id))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

/// Cart lines joined with their product rows, for price/stock lookups.
pub async fn find_with_products(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<(Model, Option<product::Model>)>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .find_also_related(product::Entity)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// SUM(quantity) over a user's cart; 0 when the cart is empty.
pub async fn count_total_items(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<i64, errors::ModelError> {
    let sum: Option<Option<i64>> = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .select_only()
        .column_as(Column::Quantity.sum(), "total")
        .into_tuple()
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(sum.flatten().unwrap_or(0))
}

pub async fn delete_all_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
