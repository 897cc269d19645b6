use sea_orm::entity::prelude::*;
use rust_decimal::Decimal;

/// One row per transfer attempt. Written once; never mutated after the
/// terminal status (`success` or `failed`) is recorded.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(column_name = "type")]
    pub transaction_type: String,
    pub source: String,
    pub narration: String,
    pub account_number: String,
    pub request_id: String,
    pub internal_reference: String,
    pub external_reference: Option<String>,
    pub amount: Decimal,
    pub status: String,
    pub commission: Option<Decimal>,
    pub balance_after: Option<Decimal>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
