//! Services with their customization and pricing options, equipment and
//! suppliers.
//!
//! The `upsert_*` helpers take any connection so the wizard commit can run
//! them inside its transaction. Each one inserts with
//! `ON CONFLICT DO NOTHING` against the unique natural key and then reads
//! the row back.

use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::settle;
use crate::dto::{EquipmentInput, PricingOptionsQuery, ServiceInput, StagedService, SupplierInput};
use crate::entities::{
    category_equipment, customization_option, equipment, equipment::EquipmentCondition,
    inventory_category, pricing_option, service, service_customization_option, supplier,
};
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRow {
    pub id: i32,
    pub description: String,
    /// Decimal rendered as text, e.g. `"150.00"`.
    pub price: String,
}

/// Option id to its pricing rows.
pub type GroupedPricing = BTreeMap<i32, Vec<PricingRow>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub service_id: i32,
    pub name: String,
    pub customization_options: Vec<OptionRow>,
    pub pricing_options: GroupedPricing,
}

fn group_pricing(rows: Vec<pricing_option::Model>) -> GroupedPricing {
    let mut grouped = GroupedPricing::new();
    for row in rows {
        grouped
            .entry(row.customization_option_id)
            .or_default()
            .push(PricingRow {
                id: row.id,
                description: row.description,
                price: row.price.to_string(),
            });
    }
    grouped
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.trim().is_empty())
}

/// Id of the option named `name` (case-insensitive), created when missing.
pub async fn upsert_customization_option<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<i32, ServiceError> {
    let name = name.trim().to_lowercase();
    customization_option::Entity::insert(customization_option::ActiveModel {
        name: Set(name.clone()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(customization_option::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    customization_option::Entity::find()
        .filter(customization_option::Column::Name.eq(name.as_str()))
        .one(db)
        .await?
        .map(|option| option.id)
        .ok_or_else(|| {
            ServiceError::InternalError(format!("customization option '{}' vanished", name))
        })
}

/// Id of the inventory category named `name`, created when missing.
pub async fn upsert_category<C: ConnectionTrait>(db: &C, name: &str) -> Result<i32, ServiceError> {
    let name = name.trim();
    inventory_category::Entity::insert(inventory_category::ActiveModel {
        category_name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(inventory_category::Column::CategoryName)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    inventory_category::Entity::find()
        .filter(inventory_category::Column::CategoryName.eq(name))
        .one(db)
        .await?
        .map(|category| category.id)
        .ok_or_else(|| ServiceError::InternalError(format!("category '{}' vanished", name)))
}

/// Supplier named like `input`, created with its details when missing. An
/// existing supplier only has its empty fields filled in.
pub async fn upsert_supplier<C: ConnectionTrait>(
    db: &C,
    input: &SupplierInput,
) -> Result<supplier::Model, ServiceError> {
    let name = input.supplier_name.trim();
    supplier::Entity::insert(supplier::ActiveModel {
        supplier_name: Set(name.to_string()),
        contact_person: Set(input.contact_person.clone()),
        phone_number: Set(input.phone_number.clone()),
        email: Set(input.email.clone()),
        address: Set(input.address.clone()),
        additional_info: Set(input.additional_info.clone()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(supplier::Column::SupplierName)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    let existing = supplier::Entity::find()
        .filter(supplier::Column::SupplierName.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::InternalError(format!("supplier '{}' vanished", name)))?;

    let mut active: supplier::ActiveModel = existing.clone().into();
    let mut changed = false;
    for (current, incoming, slot) in [
        (&existing.contact_person, &input.contact_person, &mut active.contact_person),
        (&existing.phone_number, &input.phone_number, &mut active.phone_number),
        (&existing.email, &input.email, &mut active.email),
        (&existing.address, &input.address, &mut active.address),
        (&existing.additional_info, &input.additional_info, &mut active.additional_info),
    ] {
        if !has_text(current) && has_text(incoming) {
            *slot = Set(incoming.clone());
            changed = true;
        }
    }

    if changed {
        Ok(active.update(db).await?)
    } else {
        Ok(existing)
    }
}

/// Supplier looked up, or created bare, by name.
pub async fn upsert_supplier_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<supplier::Model, ServiceError> {
    upsert_supplier(
        db,
        &SupplierInput {
            supplier_name: name.to_string(),
            contact_person: None,
            phone_number: None,
            email: None,
            address: None,
            additional_info: None,
        },
    )
    .await
}

/// Create a service with its option set and any staged pricing.
pub async fn create_service_in<C: ConnectionTrait>(
    db: &C,
    staged: &StagedService,
) -> Result<service::Model, ServiceError> {
    let created = service::ActiveModel {
        name: Set(staged.name.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut option_ids: Vec<i32> = Vec::with_capacity(staged.customization_options.len());
    for option in &staged.customization_options {
        let option_id = upsert_customization_option(db, &option.name).await?;
        for pricing in &option.pricing_options {
            pricing_option::ActiveModel {
                service_id: Set(created.service_id),
                customization_option_id: Set(option_id),
                description: Set(pricing.description.clone()),
                price: Set(pricing.price),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        if !option_ids.contains(&option_id) {
            option_ids.push(option_id);
        }
    }

    if !option_ids.is_empty() {
        service_customization_option::Entity::insert_many(option_ids.into_iter().map(|option_id| {
            service_customization_option::ActiveModel {
                service_id: Set(created.service_id),
                customization_option_id: Set(option_id),
            }
        }))
        .exec_without_returning(db)
        .await?;
    }

    Ok(created)
}

/// Create equipment and link it to its categories.
pub async fn create_equipment_in<C: ConnectionTrait>(
    db: &C,
    input: &EquipmentInput,
) -> Result<equipment::Model, ServiceError> {
    let condition: EquipmentCondition = input
        .condition
        .parse()
        .map_err(|_| ServiceError::field("condition", "Select a valid choice."))?;

    let created = equipment::ActiveModel {
        name: Set(input.name.trim().to_string()),
        description: Set(Some(input.description.clone()).filter(|d| !d.trim().is_empty())),
        condition: Set(condition),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut category_ids = Vec::with_capacity(input.categories.len());
    for category in &input.categories {
        let category_id = upsert_category(db, category).await?;
        if !category_ids.contains(&category_id) {
            category_ids.push(category_id);
        }
    }
    if !category_ids.is_empty() {
        category_equipment::Entity::insert_many(category_ids.into_iter().map(|category_id| {
            category_equipment::ActiveModel {
                category_id: Set(category_id),
                equipment_id: Set(created.equipment_id),
            }
        }))
        .exec_without_returning(db)
        .await?;
    }

    Ok(created)
}

fn parse_service_id(raw: Option<&str>) -> Result<i32, ServiceError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::BadRequest("Service ID is required.".to_string()))?;
    raw.parse()
        .map_err(|_| ServiceError::BadRequest("Invalid service ID.".to_string()))
}

#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn summarize(&self, found: service::Model) -> Result<ServiceSummary, ServiceError> {
        let db = &*self.db;
        let options = found
            .find_related(customization_option::Entity)
            .order_by_asc(customization_option::Column::Id)
            .all(db)
            .await?;
        let pricing = found
            .find_related(pricing_option::Entity)
            .order_by_asc(pricing_option::Column::Id)
            .all(db)
            .await?;

        Ok(ServiceSummary {
            service_id: found.service_id,
            name: found.name,
            customization_options: options
                .into_iter()
                .map(|o| OptionRow { id: o.id, name: o.name })
                .collect(),
            pricing_options: group_pricing(pricing),
        })
    }

    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<Vec<ServiceSummary>, ServiceError> {
        let services = service::Entity::find()
            .order_by_asc(service::Column::Name)
            .all(&*self.db)
            .await?;

        let mut summaries = Vec::with_capacity(services.len());
        for found in services {
            summaries.push(self.summarize(found).await?);
        }
        Ok(summaries)
    }

    /// Create a service and its customization options. Prices are added later.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_service(
        &self,
        input: ServiceInput,
    ) -> Result<ServiceSummary, ServiceError> {
        input.validate()?;
        let staged = StagedService::from(input);

        let txn = self.db.begin().await?;
        let result = create_service_in(&txn, &staged).await;
        let created = settle(txn, result).await?;

        info!(service_id = created.service_id, "Service created");
        self.summarize(created).await
    }

    /// Options offered by a service.
    pub async fn customization_options(
        &self,
        raw_service_id: Option<&str>,
    ) -> Result<Vec<OptionRow>, ServiceError> {
        let service_id = parse_service_id(raw_service_id)?;
        let found = service::Entity::find_by_id(service_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Service not found.".to_string()))?;

        Ok(found
            .find_related(customization_option::Entity)
            .order_by_asc(customization_option::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|o| OptionRow { id: o.id, name: o.name })
            .collect())
    }

    /// Pricing of a service for the selected options, grouped by option id.
    pub async fn pricing_options(
        &self,
        query: &PricingOptionsQuery,
    ) -> Result<GroupedPricing, ServiceError> {
        let missing =
            || ServiceError::BadRequest("Missing service_id or customization_ids.".to_string());
        let service_id = parse_service_id(query.service_id.as_deref()).map_err(|_| missing())?;
        let option_ids = query.ids();
        if option_ids.is_empty() {
            return Err(missing());
        }

        let rows = pricing_option::Entity::find()
            .filter(pricing_option::Column::ServiceId.eq(service_id))
            .filter(pricing_option::Column::CustomizationOptionId.is_in(option_ids))
            .order_by_asc(pricing_option::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(group_pricing(rows))
    }

    pub async fn list_equipment(&self) -> Result<Vec<equipment::Model>, ServiceError> {
        Ok(equipment::Entity::find()
            .order_by_asc(equipment::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_equipment(
        &self,
        input: EquipmentInput,
    ) -> Result<equipment::Model, ServiceError> {
        input.validate()?;
        let txn = self.db.begin().await?;
        let result = create_equipment_in(&txn, &input).await;
        settle(txn, result).await
    }

    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        Ok(supplier::Entity::find()
            .order_by_asc(supplier::Column::SupplierName)
            .all(&*self.db)
            .await?)
    }

    /// Create a supplier. A duplicate name is a form error.
    #[instrument(skip(self, input), fields(name = %input.supplier_name))]
    pub async fn create_supplier(
        &self,
        input: SupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;
        let exists = supplier::Entity::find()
            .filter(supplier::Column::SupplierName.eq(input.supplier_name.trim()))
            .one(&*self.db)
            .await?
            .is_some();
        if exists {
            return Err(ServiceError::field(
                "supplier_name",
                "Supplier with this Supplier name already exists.",
            ));
        }
        upsert_supplier(&*self.db, &input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pricing_groups_by_option_and_renders_price_text() {
        let rows = vec![
            pricing_option::Model {
                id: 1,
                service_id: 1,
                customization_option_id: 4,
                description: "Small".into(),
                price: dec!(150.00),
            },
            pricing_option::Model {
                id: 2,
                service_id: 1,
                customization_option_id: 4,
                description: "Large".into(),
                price: dec!(220.50),
            },
            pricing_option::Model {
                id: 3,
                service_id: 1,
                customization_option_id: 7,
                description: "Matte".into(),
                price: dec!(30),
            },
        ];
        let grouped = group_pricing(rows);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&4].len(), 2);
        assert_eq!(grouped[&4][0].price, "150.00");
        assert_eq!(grouped[&7][0].description, "Matte");
    }

    #[test]
    fn service_id_parsing() {
        assert!(matches!(parse_service_id(None), Err(ServiceError::BadRequest(_))));
        assert!(matches!(parse_service_id(Some("x")), Err(ServiceError::BadRequest(_))));
        assert_eq!(parse_service_id(Some(" 12 ")).unwrap(), 12);
    }
}
