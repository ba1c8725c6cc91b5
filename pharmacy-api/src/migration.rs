//! Schema migrations, run at startup and by the test suite.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateCatalogTables),
            Box::new(CreateUserTables),
        ]
    }
}

pub struct CreateCatalogTables;

impl MigrationName for CreateCatalogTables {
    fn name(&self) -> &'static str {
        "m20250101_000001_create_catalog_tables"
    }
}

/// Columns shared by both catalogs
fn catalog_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Catalog::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Catalog::Name).string().not_null())
        .col(ColumnDef::new(Catalog::Description).text().not_null())
        .col(ColumnDef::new(Catalog::GenericName).string().null())
        .col(ColumnDef::new(Catalog::Price).double().not_null())
        .col(ColumnDef::new(Catalog::Category).string().not_null())
        .col(ColumnDef::new(Catalog::Tags).json().not_null())
        .col(ColumnDef::new(Catalog::ImageUrl).string().null())
        .col(ColumnDef::new(Catalog::InStock).boolean().not_null().default(true))
        .col(ColumnDef::new(Catalog::Stock).integer().not_null().default(0))
        .col(ColumnDef::new(Catalog::Rating).double().not_null().default(0.0))
        .col(ColumnDef::new(Catalog::CreatedAt).timestamp_with_time_zone().not_null())
        .col(ColumnDef::new(Catalog::UpdatedAt).timestamp_with_time_zone().not_null())
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCatalogTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut products = Table::create();
        products.table(Products::Table).if_not_exists();
        catalog_columns(&mut products)
            .col(ColumnDef::new(Products::Kind).string().not_null().default("medicine"))
            .col(ColumnDef::new(Products::Prescription).boolean().not_null().default(false));
        manager.create_table(products).await?;

        let mut health_products = Table::create();
        health_products.table(HealthProducts::Table).if_not_exists();
        catalog_columns(&mut health_products);
        manager.create_table(health_products).await?;

        for (name, table) in [
            ("idx_products_category", Products::Table.into_iden()),
            ("idx_health_products_category", HealthProducts::Table.into_iden()),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(table)
                        .col(Catalog::Category)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HealthProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateUserTables;

impl MigrationName for CreateUserTables {
    fn name(&self) -> &'static str {
        "m20250101_000002_create_user_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateUserTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Prescriptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Prescriptions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Prescriptions::UserId).uuid().not_null())
                    .col(ColumnDef::new(Prescriptions::Name).string().not_null())
                    .col(ColumnDef::new(Prescriptions::Doctor).string().not_null())
                    .col(ColumnDef::new(Prescriptions::RxNumber).string().not_null())
                    .col(
                        ColumnDef::new(Prescriptions::PrescribedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Prescriptions::NextRefillAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Prescriptions::ExpiredAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Prescriptions::RefillsLeft).integer().not_null().default(0))
                    .col(ColumnDef::new(Prescriptions::Status).string().not_null())
                    .col(ColumnDef::new(Prescriptions::Note).text().null())
                    .col(ColumnDef::new(Prescriptions::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Prescriptions::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prescriptions_user")
                            .from(Prescriptions::Table, Prescriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_prescriptions_user_id", Prescriptions::UserId),
            ("idx_prescriptions_status", Prescriptions::Status),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Prescriptions::Table)
                        .col(column)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prescriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Catalog {
    Id,
    Name,
    Description,
    GenericName,
    Price,
    Category,
    Tags,
    ImageUrl,
    InStock,
    Stock,
    Rating,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Kind,
    Prescription,
}

#[derive(DeriveIden)]
enum HealthProducts {
    Table,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Prescriptions {
    Table,
    Id,
    UserId,
    Name,
    Doctor,
    RxNumber,
    PrescribedAt,
    NextRefillAt,
    ExpiredAt,
    RefillsLeft,
    Status,
    Note,
    CreatedAt,
    UpdatedAt,
}
