//! Migration: Create sublocations table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sublocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sublocations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sublocations::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Sublocations::LocationId).integer().not_null())
                    .col(
                        ColumnDef::new(Sublocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Sublocations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sublocations_location_id")
                            .from(Sublocations::Table, Sublocations::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sublocations_location_id")
                    .table(Sublocations::Table)
                    .col(Sublocations::LocationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sublocations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sublocations {
    Table,
    Id,
    Name,
    LocationId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
}
