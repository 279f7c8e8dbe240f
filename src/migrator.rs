use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_orders_tables::Migration),
            Box::new(m20240101_000004_create_inventory_tables::Migration),
            Box::new(m20240101_000005_create_production_tables::Migration),
            Box::new(m20240101_000006_create_settings_tables::Migration),
        ]
    }
}

fn id_column<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    IsStaff,
    IsSuperuser,
    IsActive,
    LastLogin,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    Action,
    Timestamp,
    UserId,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    CustomerId,
    Name,
    ContactNumber,
    Email,
    Address,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    ServiceId,
    Name,
}

#[derive(DeriveIden)]
enum CustomizationOptions {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum ServiceCustomizationOptions {
    Table,
    ServiceId,
    CustomizationOptionId,
}

#[derive(DeriveIden)]
enum PricingOptions {
    Table,
    Id,
    ServiceId,
    CustomizationOptionId,
    Description,
    Price,
}

#[derive(DeriveIden)]
enum PaymentMethods {
    Table,
    Id,
    MethodName,
    Details,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    OrderId,
    OrderQueue,
    CustomerId,
    ServiceId,
    JobSpecifications,
    Status,
    Deadline,
    PaymentId,
    CreatedAt,
    CompletedOrCancelled,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    PaymentId,
    OrderId,
    Amount,
    AmountPaid,
    PaymentMethodId,
    Discount,
    DiscountType,
    DiscountName,
    Status,
    PaymentDate,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    SupplierName,
    ContactPerson,
    PhoneNumber,
    Email,
    Address,
    AdditionalInfo,
}

#[derive(DeriveIden)]
enum InventoryCategories {
    Table,
    Id,
    CategoryName,
}

#[derive(DeriveIden)]
enum Equipment {
    Table,
    EquipmentId,
    Name,
    Description,
    Condition,
}

#[derive(DeriveIden)]
enum CategoryEquipment {
    Table,
    CategoryId,
    EquipmentId,
}

#[derive(DeriveIden)]
enum Inventory {
    Table,
    MaterialId,
    Name,
    CategoryId,
    StockLevel,
    ReorderThreshold,
    SupplierId,
    UnitOfMeasurement,
}

#[derive(DeriveIden)]
enum Productions {
    Table,
    JobId,
    OrderId,
    EquipmentAssigned,
    QualityChecks,
    Status,
    Priority,
}

#[derive(DeriveIden)]
enum ProductionMaterials {
    Table,
    ProductionId,
    MaterialId,
}

#[derive(DeriveIden)]
enum BusinessDetails {
    Table,
    Id,
    Name,
    Address,
    ContactNumber,
    Email,
    TaxIdentificationNumber,
    Logo,
}

#[derive(DeriveIden)]
enum SystemSettings {
    Table,
    Id,
    Currency,
    Timezone,
    DateFormat,
    Language,
    SmtpServer,
    SmtpPort,
    SmtpEmail,
    SmtpPassword,
}

mod m20240101_000001_create_users_table {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(id_column(Users::Id))
                        .col(
                            ColumnDef::new(Users::Username)
                                .string_len(150)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string().not_null().default(""))
                        .col(ColumnDef::new(Users::FirstName).string().not_null().default(""))
                        .col(ColumnDef::new(Users::LastName).string().not_null().default(""))
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(ColumnDef::new(Users::IsStaff).boolean().not_null().default(false))
                        .col(ColumnDef::new(Users::IsSuperuser).boolean().not_null().default(false))
                        .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                        .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AuditLogs::Table)
                        .if_not_exists()
                        .col(id_column(AuditLogs::Id))
                        .col(ColumnDef::new(AuditLogs::Action).text().not_null())
                        .col(
                            ColumnDef::new(AuditLogs::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AuditLogs::UserId).integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_audit_logs_user_id")
                                .from(AuditLogs::Table, AuditLogs::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000002_create_catalog_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(id_column(Customers::CustomerId))
                        .col(ColumnDef::new(Customers::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Customers::ContactNumber).string_len(15).not_null())
                        .col(ColumnDef::new(Customers::Email).string().null())
                        .col(ColumnDef::new(Customers::Address).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Services::Table)
                        .if_not_exists()
                        .col(id_column(Services::ServiceId))
                        .col(ColumnDef::new(Services::Name).string_len(100).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CustomizationOptions::Table)
                        .if_not_exists()
                        .col(id_column(CustomizationOptions::Id))
                        .col(
                            ColumnDef::new(CustomizationOptions::Name)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ServiceCustomizationOptions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceCustomizationOptions::ServiceId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceCustomizationOptions::CustomizationOptionId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(ServiceCustomizationOptions::ServiceId)
                                .col(ServiceCustomizationOptions::CustomizationOptionId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_service_options_service_id")
                                .from(
                                    ServiceCustomizationOptions::Table,
                                    ServiceCustomizationOptions::ServiceId,
                                )
                                .to(Services::Table, Services::ServiceId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_service_options_option_id")
                                .from(
                                    ServiceCustomizationOptions::Table,
                                    ServiceCustomizationOptions::CustomizationOptionId,
                                )
                                .to(CustomizationOptions::Table, CustomizationOptions::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PricingOptions::Table)
                        .if_not_exists()
                        .col(id_column(PricingOptions::Id))
                        .col(ColumnDef::new(PricingOptions::ServiceId).integer().not_null())
                        .col(
                            ColumnDef::new(PricingOptions::CustomizationOptionId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PricingOptions::Description).string_len(255).not_null())
                        .col(ColumnDef::new(PricingOptions::Price).decimal_len(10, 2).not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_pricing_options_service_id")
                                .from(PricingOptions::Table, PricingOptions::ServiceId)
                                .to(Services::Table, Services::ServiceId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_pricing_options_option_id")
                                .from(PricingOptions::Table, PricingOptions::CustomizationOptionId)
                                .to(CustomizationOptions::Table, CustomizationOptions::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PaymentMethods::Table)
                        .if_not_exists()
                        .col(id_column(PaymentMethods::Id))
                        .col(
                            ColumnDef::new(PaymentMethods::MethodName)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PaymentMethods::Details).text().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PaymentMethods::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PricingOptions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ServiceCustomizationOptions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CustomizationOptions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Services::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000003_create_orders_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_orders_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(id_column(Orders::OrderId))
                        .col(ColumnDef::new(Orders::OrderQueue).integer().null())
                        .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
                        .col(ColumnDef::new(Orders::ServiceId).integer().not_null())
                        .col(ColumnDef::new(Orders::JobSpecifications).json().null())
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string_len(32)
                                .not_null()
                                .default("PENDING"),
                        )
                        .col(ColumnDef::new(Orders::Deadline).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Orders::PaymentId).integer().null())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::CompletedOrCancelled)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_customer_id")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Customers::Table, Customers::CustomerId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_service_id")
                                .from(Orders::Table, Orders::ServiceId)
                                .to(Services::Table, Services::ServiceId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status_queue")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .col(Orders::OrderQueue)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(id_column(Payments::PaymentId))
                        .col(ColumnDef::new(Payments::OrderId).integer().not_null())
                        .col(ColumnDef::new(Payments::Amount).decimal_len(10, 2).not_null())
                        .col(
                            ColumnDef::new(Payments::AmountPaid)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Payments::PaymentMethodId).integer().null())
                        .col(ColumnDef::new(Payments::Discount).decimal_len(10, 2).null())
                        .col(ColumnDef::new(Payments::DiscountType).string_len(16).null())
                        .col(ColumnDef::new(Payments::DiscountName).string_len(100).null())
                        .col(
                            ColumnDef::new(Payments::Status)
                                .string_len(32)
                                .not_null()
                                .default("PENDING"),
                        )
                        .col(
                            ColumnDef::new(Payments::PaymentDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payments_order_id")
                                .from(Payments::Table, Payments::OrderId)
                                .to(Orders::Table, Orders::OrderId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payments_payment_method_id")
                                .from(Payments::Table, Payments::PaymentMethodId)
                                .to(PaymentMethods::Table, PaymentMethods::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000004_create_inventory_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(id_column(Suppliers::Id))
                        .col(
                            ColumnDef::new(Suppliers::SupplierName)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Suppliers::ContactPerson).string_len(100).null())
                        .col(ColumnDef::new(Suppliers::PhoneNumber).string_len(15).null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Address).text().null())
                        .col(ColumnDef::new(Suppliers::AdditionalInfo).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryCategories::Table)
                        .if_not_exists()
                        .col(id_column(InventoryCategories::Id))
                        .col(
                            ColumnDef::new(InventoryCategories::CategoryName)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Equipment::Table)
                        .if_not_exists()
                        .col(id_column(Equipment::EquipmentId))
                        .col(ColumnDef::new(Equipment::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Equipment::Description).text().null())
                        .col(
                            ColumnDef::new(Equipment::Condition)
                                .string_len(16)
                                .not_null()
                                .default("working"),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CategoryEquipment::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(CategoryEquipment::CategoryId).integer().not_null())
                        .col(ColumnDef::new(CategoryEquipment::EquipmentId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(CategoryEquipment::CategoryId)
                                .col(CategoryEquipment::EquipmentId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_category_equipment_category_id")
                                .from(CategoryEquipment::Table, CategoryEquipment::CategoryId)
                                .to(InventoryCategories::Table, InventoryCategories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_category_equipment_equipment_id")
                                .from(CategoryEquipment::Table, CategoryEquipment::EquipmentId)
                                .to(Equipment::Table, Equipment::EquipmentId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Inventory::Table)
                        .if_not_exists()
                        .col(id_column(Inventory::MaterialId))
                        .col(ColumnDef::new(Inventory::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Inventory::CategoryId).integer().null())
                        .col(ColumnDef::new(Inventory::StockLevel).integer().not_null().default(0))
                        .col(
                            ColumnDef::new(Inventory::ReorderThreshold)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Inventory::SupplierId).integer().null())
                        .col(
                            ColumnDef::new(Inventory::UnitOfMeasurement)
                                .string_len(16)
                                .not_null()
                                .default("qty"),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_category_id")
                                .from(Inventory::Table, Inventory::CategoryId)
                                .to(InventoryCategories::Table, InventoryCategories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_supplier_id")
                                .from(Inventory::Table, Inventory::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Inventory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CategoryEquipment::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Equipment::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryCategories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000005_create_production_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_production_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Productions::Table)
                        .if_not_exists()
                        .col(id_column(Productions::JobId))
                        .col(ColumnDef::new(Productions::OrderId).integer().not_null())
                        .col(ColumnDef::new(Productions::EquipmentAssigned).json().null())
                        .col(ColumnDef::new(Productions::QualityChecks).json().not_null())
                        .col(
                            ColumnDef::new(Productions::Status)
                                .string_len(32)
                                .not_null()
                                .default("NOT_STARTED"),
                        )
                        .col(
                            ColumnDef::new(Productions::Priority)
                                .string_len(16)
                                .not_null()
                                .default("MODERATE"),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_productions_order_id")
                                .from(Productions::Table, Productions::OrderId)
                                .to(Orders::Table, Orders::OrderId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductionMaterials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionMaterials::ProductionId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductionMaterials::MaterialId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(ProductionMaterials::ProductionId)
                                .col(ProductionMaterials::MaterialId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_production_materials_production_id")
                                .from(ProductionMaterials::Table, ProductionMaterials::ProductionId)
                                .to(Productions::Table, Productions::JobId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_production_materials_material_id")
                                .from(ProductionMaterials::Table, ProductionMaterials::MaterialId)
                                .to(Inventory::Table, Inventory::MaterialId)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductionMaterials::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Productions::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000006_create_settings_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_settings_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BusinessDetails::Table)
                        .if_not_exists()
                        .col(id_column(BusinessDetails::Id))
                        .col(ColumnDef::new(BusinessDetails::Name).string_len(255).not_null())
                        .col(ColumnDef::new(BusinessDetails::Address).text().not_null())
                        .col(ColumnDef::new(BusinessDetails::ContactNumber).string_len(20).null())
                        .col(ColumnDef::new(BusinessDetails::Email).string().null())
                        .col(
                            ColumnDef::new(BusinessDetails::TaxIdentificationNumber)
                                .string_len(50)
                                .null(),
                        )
                        .col(ColumnDef::new(BusinessDetails::Logo).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SystemSettings::Table)
                        .if_not_exists()
                        .col(id_column(SystemSettings::Id))
                        .col(
                            ColumnDef::new(SystemSettings::Currency)
                                .string_len(10)
                                .not_null()
                                .default("USD"),
                        )
                        .col(
                            ColumnDef::new(SystemSettings::Timezone)
                                .string_len(50)
                                .not_null()
                                .default("UTC"),
                        )
                        .col(
                            ColumnDef::new(SystemSettings::DateFormat)
                                .string_len(20)
                                .not_null()
                                .default("YYYY-MM-DD"),
                        )
                        .col(
                            ColumnDef::new(SystemSettings::Language)
                                .string_len(20)
                                .not_null()
                                .default("en"),
                        )
                        .col(ColumnDef::new(SystemSettings::SmtpServer).string_len(255).null())
                        .col(ColumnDef::new(SystemSettings::SmtpPort).integer().null())
                        .col(ColumnDef::new(SystemSettings::SmtpEmail).string().null())
                        .col(ColumnDef::new(SystemSettings::SmtpPassword).string_len(255).null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BusinessDetails::Table).to_owned())
                .await
        }
    }
}
