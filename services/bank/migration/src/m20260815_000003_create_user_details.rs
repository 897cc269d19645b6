use sea_orm_migration::prelude::*;

const DEFAULT_LIMITS: &str = r#"{"transfers":{"single":200000,"daily":600000},"bills":{"single":100000,"daily":200000},"ussd":{"single":10000,"daily":20000}}"#;
const DEFAULT_COUNTER: &str = r#"{"transfers":0,"bills":0,"ussd":0}"#;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserDetails::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserDetails::AccountNumber)
                            .char_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UserDetails::TransactionPin).string())
                    .col(
                        ColumnDef::new(UserDetails::Limits)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust(format!("'{DEFAULT_LIMITS}'::jsonb"))),
                    )
                    .col(
                        ColumnDef::new(UserDetails::Counter)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust(format!("'{DEFAULT_COUNTER}'::jsonb"))),
                    )
                    .col(
                        ColumnDef::new(UserDetails::CounterDate)
                            .date()
                            .not_null()
                            .default(Expr::cust("CURRENT_DATE")),
                    )
                    .col(
                        ColumnDef::new(UserDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserDetails::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserDetails::Table, UserDetails::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserDetails::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserDetails {
    Table,
    UserId,
    AccountNumber,
    TransactionPin,
    Limits,
    Counter,
    CounterDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
