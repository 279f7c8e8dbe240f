use sea_orm::{
    prelude::Expr, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::dto::ContactSupplierInput;
use crate::entities::{
    equipment, inventory, inventory::UnitOfMeasurement, inventory_category, supplier,
};
use crate::errors::ServiceError;

const NO_SUPPLIER: &str = "No Supplier";
const NOT_AVAILABLE: &str = "N/A";
const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRow {
    pub material_id: i32,
    pub name: String,
    pub stock_level: i32,
    pub reorder_threshold: i32,
    pub unit_of_measurement: UnitOfMeasurement,
    pub needs_reorder: bool,
    pub supplier_name: String,
    pub supplier_contact: String,
    pub supplier_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub materials: Vec<MaterialRow>,
}

fn material_row(
    material: inventory::Model,
    suppliers: &HashMap<i32, supplier::Model>,
) -> MaterialRow {
    let found = material.supplier_id.and_then(|id| suppliers.get(&id));
    let or_na =
        |value: Option<&String>| value.cloned().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    MaterialRow {
        material_id: material.material_id,
        needs_reorder: material.needs_reorder(),
        name: material.name,
        stock_level: material.stock_level,
        reorder_threshold: material.reorder_threshold,
        unit_of_measurement: material.unit_of_measurement,
        supplier_name: found
            .map(|s| s.supplier_name.clone())
            .unwrap_or_else(|| NO_SUPPLIER.to_string()),
        supplier_contact: or_na(found.and_then(|s| s.phone_number.as_ref())),
        supplier_email: or_na(found.and_then(|s| s.email.as_ref())),
    }
}

#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn suppliers(&self) -> Result<HashMap<i32, supplier::Model>, ServiceError> {
        Ok(supplier::Entity::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect())
    }

    /// Every material grouped under its category, with supplier details.
    #[instrument(skip(self))]
    pub async fn management(&self) -> Result<Vec<CategoryGroup>, ServiceError> {
        let db = &*self.db;
        let suppliers = self.suppliers().await?;
        let categories = inventory_category::Entity::find()
            .order_by_asc(inventory_category::Column::CategoryName)
            .all(db)
            .await?;
        let mut by_category: HashMap<Option<i32>, Vec<inventory::Model>> = HashMap::new();
        for material in inventory::Entity::find()
            .order_by_asc(inventory::Column::Name)
            .all(db)
            .await?
        {
            by_category.entry(material.category_id).or_default().push(material);
        }

        let mut groups: Vec<CategoryGroup> = categories
            .into_iter()
            .map(|category| CategoryGroup {
                materials: by_category
                    .remove(&Some(category.id))
                    .unwrap_or_default()
                    .into_iter()
                    .map(|m| material_row(m, &suppliers))
                    .collect(),
                category: category.category_name,
            })
            .collect();

        if let Some(loose) = by_category.remove(&None) {
            groups.push(CategoryGroup {
                category: UNCATEGORIZED.to_string(),
                materials: loose.into_iter().map(|m| material_row(m, &suppliers)).collect(),
            });
        }
        Ok(groups)
    }

    /// Materials whose stock fell below their reorder threshold.
    pub async fn alerts(&self) -> Result<Vec<MaterialRow>, ServiceError> {
        let suppliers = self.suppliers().await?;
        let low = inventory::Entity::find()
            .filter(
                Expr::col(inventory::Column::StockLevel)
                    .lt(Expr::col(inventory::Column::ReorderThreshold)),
            )
            .order_by_asc(inventory::Column::StockLevel)
            .all(&*self.db)
            .await?;
        Ok(low.into_iter().map(|m| material_row(m, &suppliers)).collect())
    }

    /// Materials in the categories an equipment draws from.
    pub async fn materials_for_equipment(
        &self,
        equipment_name: Option<&str>,
    ) -> Result<Vec<MaterialRow>, ServiceError> {
        let db = &*self.db;
        let name = equipment_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ServiceError::BadRequest("Equipment name is required.".to_string()))?;

        let found = equipment::Entity::find()
            .filter(equipment::Column::Name.eq(name))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Equipment not found.".to_string()))?;

        let category_ids: Vec<i32> = found
            .find_related(inventory_category::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let suppliers = self.suppliers().await?;
        let materials = inventory::Entity::find()
            .filter(inventory::Column::CategoryId.is_in(category_ids))
            .order_by_asc(inventory::Column::Name)
            .all(db)
            .await?;
        Ok(materials.into_iter().map(|m| material_row(m, &suppliers)).collect())
    }

    /// Record a restock request for a supplier. Delivery is left to staff.
    #[instrument(skip(self, input), fields(supplier = %input.supplier_name))]
    pub async fn contact_supplier(
        &self,
        input: &ContactSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let found = supplier::Entity::find()
            .filter(supplier::Column::SupplierName.eq(input.supplier_name.trim()))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Supplier not found.".to_string()))?;

        info!(
            supplier_id = found.id,
            material = input.material_name.as_deref().unwrap_or(NOT_AVAILABLE),
            message = input.message.as_deref().unwrap_or(""),
            "Supplier contact requested"
        );
        Ok(found)
    }
}
