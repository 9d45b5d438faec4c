use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

/// Denylist entry for a logged-out token, keyed by its `jti` claim.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revoked_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub jti: String,
    pub expires_at: DateTimeWithTimeZone,
    pub revoked_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn revoke(
    db: &DatabaseConnection,
    jti: &str,
    expires_at: DateTimeWithTimeZone,
) -> Result<(), errors::ModelError> {
    if jti.trim().is_empty() {
        return Err(errors::ModelError::Validation("jti required".into()));
    }
    // Revoking twice is a no-op
    if Entity::find_by_id(jti.to_string())
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .is_some()
    {
        return Ok(());
    }
    let am = ActiveModel {
        jti: Set(jti.to_string()),
        expires_at: Set(expires_at),
        revoked_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

pub async fn is_revoked(db: &DatabaseConnection, jti: &str) -> Result<bool, errors::ModelError> {
    let found = Entity::find_by_id(jti.to_string())
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(found.is_some())
}

/// Drop entries whose token has expired anyway.
pub async fn purge_expired(db: &DatabaseConnection) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::ExpiresAt.lt(Utc::now()))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
