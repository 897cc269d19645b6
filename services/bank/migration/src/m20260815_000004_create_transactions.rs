use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).uuid().not_null())
                    .col(ColumnDef::new(Transactions::Type).string().not_null())
                    .col(ColumnDef::new(Transactions::Source).string().not_null())
                    .col(ColumnDef::new(Transactions::Narration).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AccountNumber)
                            .char_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::RequestId).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::InternalReference)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::ExternalReference).string())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .decimal_len(20, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Status).string().not_null())
                    .col(ColumnDef::new(Transactions::Commission).decimal_len(20, 2))
                    .col(ColumnDef::new(Transactions::BalanceAfter).decimal_len(20, 2))
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // History is read by account number, newest first.
        manager
            .create_index(
                Index::create()
                    .table(Transactions::Table)
                    .col(Transactions::AccountNumber)
                    .col(Transactions::CreatedAt)
                    .name("idx_transactions_account_number_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Type,
    Source,
    Narration,
    AccountNumber,
    RequestId,
    InternalReference,
    ExternalReference,
    Amount,
    Status,
    Commission,
    BalanceAfter,
    CreatedAt,
    UpdatedAt,
}
