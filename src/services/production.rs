use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::settle;
use crate::dto::{ProductionInput, QualityCheckInput};
use crate::entities::{
    customer, inventory, order, production, production::QualityCheck, production_material,
    ProductionPriority, ProductionStatus,
};
use crate::errors::ServiceError;
use crate::services::order_queue::mark_in_progress;

const SEARCH_LIMIT: usize = 10;

/// Whether a saved quality check replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum SaveType {
    Modified,
    Added,
}

/// Replace the check named `parameter`, or append a new one.
pub fn upsert_check(
    checks: &mut Vec<QualityCheck>,
    parameter: &str,
    input: QualityCheckInput,
) -> SaveType {
    let parameter_name = if input.parameter.trim().is_empty() {
        parameter.to_string()
    } else {
        input.parameter
    };
    let replacement = QualityCheck {
        parameter: parameter_name,
        result: input.result,
        notes: input.notes,
    };

    match checks.iter_mut().find(|check| check.parameter == parameter) {
        Some(existing) => {
            *existing = replacement;
            SaveType::Modified
        }
        None => {
            checks.push(replacement);
            SaveType::Added
        }
    }
}

pub fn parse_priority(raw: &str) -> Result<ProductionPriority, ServiceError> {
    raw.trim()
        .to_uppercase()
        .parse()
        .map_err(|_| {
            ServiceError::BadRequest("Invalid priority. Use HIGH, MODERATE or LOW.".to_string())
        })
}

pub fn parse_status(raw: &str) -> Result<ProductionStatus, ServiceError> {
    raw.trim()
        .to_uppercase()
        .replace(' ', "_")
        .parse()
        .map_err(|_| ServiceError::BadRequest(format!("Invalid production status '{}'.", raw)))
}

/// `{id, name}` pair used by the production pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionLabel {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityChecks {
    pub job_id: i32,
    pub quality_checks: Vec<QualityCheck>,
}

#[derive(Clone)]
pub struct ProductionService {
    db: Arc<DatabaseConnection>,
}

impl ProductionService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_job(&self, job_id: i32) -> Result<production::Model, ServiceError> {
        production::Entity::find_by_id(job_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Production job not found.".to_string()))
    }

    /// Start a production job for an order and move the order to IN PROGRESS.
    #[instrument(skip(self, input), fields(order_id = input.order))]
    pub async fn submit(&self, input: ProductionInput) -> Result<production::Model, ServiceError> {
        let priority = match input.priority.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(raw) => parse_priority(raw)
                .map_err(|_| ServiceError::field("priority", "Select a valid choice."))?,
            None => ProductionPriority::default(),
        };

        let txn = self.db.begin().await?;
        let result: Result<production::Model, ServiceError> = async {
            order::Entity::find_by_id(input.order)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound("Order not found.".to_string()))?;

            let mut material_ids = input.materials.clone();
            material_ids.sort_unstable();
            material_ids.dedup();
            let known = inventory::Entity::find()
                .filter(inventory::Column::MaterialId.is_in(material_ids.clone()))
                .count(&txn)
                .await?;
            if known != material_ids.len() as u64 {
                return Err(ServiceError::field("materials", "Select a valid choice."));
            }

            let created = production::ActiveModel {
                order_id: Set(input.order),
                equipment_assigned: Set(input.equipment_assigned.clone()),
                quality_checks: Set(serde_json::to_value(&input.quality_checks)?),
                status: Set(ProductionStatus::InProgress),
                priority: Set(priority),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            if !material_ids.is_empty() {
                let links = material_ids.into_iter().map(|material_id| {
                    production_material::ActiveModel {
                        production_id: Set(created.job_id),
                        material_id: Set(material_id),
                    }
                });
                production_material::Entity::insert_many(links)
                    .exec_without_returning(&txn)
                    .await?;
            }

            mark_in_progress(&txn, input.order).await?;
            Ok(created)
        }
        .await;

        let created = settle(txn, result).await?;
        info!(job_id = created.job_id, "Production started");
        Ok(created)
    }

    pub async fn by_priority(
        &self,
        raw: Option<&str>,
    ) -> Result<Vec<production::Model>, ServiceError> {
        let priority = parse_priority(raw.unwrap_or_default())?;
        Ok(production::Entity::find()
            .filter(production::Column::Priority.eq(priority))
            .order_by_asc(production::Column::JobId)
            .all(&*self.db)
            .await?)
    }

    /// Jobs matching an optional status and priority, labelled with their customer.
    pub async fn by_status(
        &self,
        status: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Vec<ProductionLabel>, ServiceError> {
        let db = &*self.db;
        let mut select = production::Entity::find().order_by_asc(production::Column::JobId);
        if let Some(raw) = status.map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(production::Column::Status.eq(parse_status(raw)?));
        }
        if let Some(raw) = priority.map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(production::Column::Priority.eq(parse_priority(raw)?));
        }

        let jobs = select.find_also_related(order::Entity).all(db).await?;
        let customer_ids: Vec<i32> = jobs
            .iter()
            .filter_map(|(_, o)| o.as_ref().map(|o| o.customer_id))
            .collect();
        let names: HashMap<i32, String> = customer::Entity::find()
            .filter(customer::Column::CustomerId.is_in(customer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.customer_id, c.name))
            .collect();

        Ok(jobs
            .into_iter()
            .map(|(job, o)| {
                let customer = o
                    .and_then(|o| names.get(&o.customer_id).cloned())
                    .unwrap_or_default();
                ProductionLabel {
                    id: job.job_id,
                    name: format!("Job #{} - {}", job.job_id, customer),
                }
            })
            .collect())
    }

    pub async fn quality_checks(&self, job_id: i32) -> Result<QualityChecks, ServiceError> {
        let job = self.find_job(job_id).await?;
        Ok(QualityChecks {
            job_id: job.job_id,
            quality_checks: job.checks(),
        })
    }

    pub async fn quality_check(
        &self,
        job_id: i32,
        parameter: &str,
    ) -> Result<QualityCheck, ServiceError> {
        self.find_job(job_id)
            .await?
            .checks()
            .into_iter()
            .find(|check| check.parameter == parameter)
            .ok_or_else(|| ServiceError::NotFound("Quality check not found.".to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn save_quality_check(
        &self,
        job_id: i32,
        parameter: &str,
        input: QualityCheckInput,
    ) -> Result<SaveType, ServiceError> {
        if input.result.trim().is_empty() {
            return Err(ServiceError::field("result", "This field is required."));
        }
        let job = self.find_job(job_id).await?;
        let mut checks = job.checks();
        let save_type = upsert_check(&mut checks, parameter, input);

        let mut active: production::ActiveModel = job.into();
        active.quality_checks = Set(serde_json::to_value(&checks)?);
        active.update(&*self.db).await?;

        info!(job_id, %save_type, "Quality check saved");
        Ok(save_type)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        job_id: i32,
        raw_status: &str,
    ) -> Result<production::Model, ServiceError> {
        let status = parse_status(raw_status)?;
        let job = self.find_job(job_id).await?;
        let mut active: production::ActiveModel = job.into();
        active.status = Set(status);
        Ok(active.update(&*self.db).await?)
    }

    /// Job ids whose decimal form contains `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<i32>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = production::Entity::find()
            .select_only()
            .column(production::Column::JobId)
            .order_by_asc(production::Column::JobId)
            .into_tuple()
            .all(&*self.db)
            .await?;
        Ok(ids
            .into_iter()
            .filter(|id| id.to_string().contains(query))
            .take(SEARCH_LIMIT)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(parameter: &str, result: &str) -> QualityCheck {
        QualityCheck {
            parameter: parameter.into(),
            result: result.into(),
            notes: String::new(),
        }
    }

    fn input(parameter: &str, result: &str) -> QualityCheckInput {
        QualityCheckInput {
            parameter: parameter.into(),
            result: result.into(),
            notes: "rechecked".into(),
        }
    }

    #[test]
    fn saving_an_existing_parameter_modifies_it() {
        let mut checks = vec![check("Color accuracy", "Fail"), check("Alignment", "Pass")];
        let save_type =
            upsert_check(&mut checks, "Color accuracy", input("Color accuracy", "Pass"));
        assert_eq!(save_type, SaveType::Modified);
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].result, "Pass");
        assert_eq!(checks[0].notes, "rechecked");
    }

    #[test]
    fn saving_a_new_parameter_appends_it() {
        let mut checks = vec![check("Alignment", "Pass")];
        let save_type = upsert_check(&mut checks, "Lamination", input("", "Pass"));
        assert_eq!(save_type, SaveType::Added);
        assert_eq!(checks[1].parameter, "Lamination");
        assert_eq!(save_type.to_string(), "Added");
    }

    #[test]
    fn filters_parse_loosely() {
        assert_eq!(parse_priority("high").unwrap(), ProductionPriority::High);
        assert!(parse_priority("urgent").is_err());
        assert_eq!(parse_status("in progress").unwrap(), ProductionStatus::InProgress);
        assert_eq!(parse_status("ON_HOLD").unwrap(), ProductionStatus::OnHold);
        assert!(parse_status("done").is_err());
    }
}
