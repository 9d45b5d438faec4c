use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::order::OrderStatus;
use crate::tests::test_db;
use crate::user::Role;
use crate::{cart_item, order, order_item, product, user};

/// Committing an order row inside a transaction makes it visible afterwards.
#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };

    let u = user::create(&db, &format!("tx_commit_{}", Uuid::new_v4()), Role::Customer).await?;
    let order_id = format!("order_tx_{}", Uuid::new_v4());

    let txn = db.begin().await?;
    let now = Utc::now().into();
    let am = order::ActiveModel {
        order_id: Set(order_id.clone()),
        user_id: Set(u.id),
        total_amount: Set(Decimal::new(15000, 2)),
        status: Set(OrderStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(&txn).await?;
    txn.commit().await?;

    let found = order::find(&db, &order_id).await?;
    assert_eq!(found.map(|o| o.status), Some(OrderStatus::Pending));

    order::Entity::delete_by_id(order_id).exec(&db).await?;
    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}

/// A rolled-back checkout leaves order status, order items, stock, and cart
/// exactly as they were — the atomicity contract the checkout phase relies on.
#[tokio::test]
async fn test_checkout_style_rollback() -> Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };

    let u = user::create(&db, &format!("tx_rollback_{}", Uuid::new_v4()), Role::Customer).await?;
    let p = product::create(&db, "Rollback Widget", "", Decimal::new(10000, 2), 5).await?;
    cart_item::upsert(&db, u.id, p.id, 2).await?;
    let o = order::insert_pending(&db, &format!("order_rb_{}", Uuid::new_v4()), u.id, Decimal::new(20000, 2)).await?;

    // Apply every checkout mutation, then roll back instead of committing
    let txn = db.begin().await?;
    let now = Utc::now().into();

    let mut om: order::ActiveModel = order::Entity::find_by_id(o.order_id.clone())
        .one(&txn)
        .await?
        .expect("order in txn")
        .into();
    om.status = Set(OrderStatus::Success);
    om.updated_at = Set(now);
    om.update(&txn).await?;

    let item = order_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(o.order_id.clone()),
        product_id: Set(p.id),
        quantity: Set(2),
        price_per_unit: Set(Decimal::new(10000, 2)),
        total_price: Set(Decimal::new(20000, 2)),
        created_at: Set(now),
    };
    item.insert(&txn).await?;

    let mut pm: product::ActiveModel = product::Entity::find_by_id(p.id)
        .one(&txn)
        .await?
        .expect("product in txn")
        .into();
    pm.stock = Set(3);
    pm.updated_at = Set(now);
    pm.update(&txn).await?;

    cart_item::Entity::delete_many()
        .filter(cart_item::Column::UserId.eq(u.id))
        .exec(&txn)
        .await?;

    txn.rollback().await?;

    // Nothing above may be observable
    let after_order = order::find(&db, &o.order_id).await?.expect("order");
    assert_eq!(after_order.status, OrderStatus::Pending);
    assert!(order_item::find_by_order(&db, &o.order_id).await?.is_empty());
    let after_product = product::find(&db, p.id).await?.expect("product");
    assert_eq!(after_product.stock, 5);
    assert_eq!(cart_item::count_total_items(&db, u.id).await?, 2);

    cart_item::delete_all_for_user(&db, u.id).await?;
    order::Entity::delete_by_id(o.order_id).exec(&db).await?;
    product::Entity::delete_by_id(p.id).exec(&db).await?;
    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}
