//! Migration: Create permits table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Permits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Permits::Vplate).string_len(20).not_null())
                    .col(ColumnDef::new(Permits::Vmake).string_len(20).null())
                    .col(ColumnDef::new(Permits::Vmodel).string_len(20).null())
                    .col(ColumnDef::new(Permits::Vcolor).string_len(20).null())
                    .col(ColumnDef::new(Permits::UserId).integer().null())
                    .col(ColumnDef::new(Permits::LocationId).integer().not_null())
                    .col(ColumnDef::new(Permits::SublocationId).integer().null())
                    .col(ColumnDef::new(Permits::Unit).string_len(20).null())
                    .col(ColumnDef::new(Permits::Email).string_len(255).null())
                    .col(ColumnDef::new(Permits::Phone).string_len(20).null())
                    .col(ColumnDef::new(Permits::FirstName).string_len(100).null())
                    .col(ColumnDef::new(Permits::LastName).string_len(100).null())
                    .col(ColumnDef::new(Permits::Duration).integer().not_null())
                    .col(ColumnDef::new(Permits::ExpDate).timestamp().not_null())
                    .col(
                        ColumnDef::new(Permits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Permits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permits_user_id")
                            .from(Permits::Table, Permits::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permits_location_id")
                            .from(Permits::Table, Permits::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permits_sublocation_id")
                            .from(Permits::Table, Permits::SublocationId)
                            .to(Sublocations::Table, Sublocations::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Eligibility reads every permit of a plate, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_permits_vplate_created_at")
                    .table(Permits::Table)
                    .col(Permits::Vplate)
                    .col(Permits::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_permits_user_id")
                    .table(Permits::Table)
                    .col(Permits::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Permits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Permits {
    Table,
    Id,
    Vplate,
    Vmake,
    Vmodel,
    Vcolor,
    UserId,
    LocationId,
    SublocationId,
    Unit,
    Email,
    Phone,
    FirstName,
    LastName,
    Duration,
    ExpDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
}

#[derive(Iden)]
enum Sublocations {
    Table,
    Id,
}
