use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LimitUpgradeRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LimitUpgradeRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LimitUpgradeRequests::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(LimitUpgradeRequests::Channel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LimitUpgradeRequests::Single)
                            .decimal_len(20, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LimitUpgradeRequests::Daily)
                            .decimal_len(20, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LimitUpgradeRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(LimitUpgradeRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LimitUpgradeRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LimitUpgradeRequests::Table, LimitUpgradeRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(LimitUpgradeRequests::Table)
                    .col(LimitUpgradeRequests::UserId)
                    .name("idx_limit_upgrade_requests_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LimitUpgradeRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LimitUpgradeRequests {
    Table,
    Id,
    UserId,
    Channel,
    Single,
    Daily,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
