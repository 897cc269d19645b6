use sea_orm::entity::prelude::*;
use rust_decimal::Decimal;

/// Requested limit change for one channel. Status moves `pending` to
/// `completed` or `cancelled`, only through explicit approval/cancellation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "limit_upgrade_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub channel: String,
    pub single: Decimal,
    pub daily: Decimal,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
