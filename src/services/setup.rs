//! Setup wizard: per-screen staging into the session and the one-shot commit.
//!
//! Screens only ever touch the [`WizardSession`]. [`SetupService::commit`]
//! re-validates everything that was staged and writes it inside a single
//! transaction, so a bad record leaves the database untouched.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::{Validate, ValidationErrors};

use crate::db::settle;
use crate::dto::{
    BusinessDetailsInput, CustomerInput, EquipmentInput, InventoryInput, PricingOptionInput,
    ServicesAction, StagedPricing, StagedService, SupplierInput, SystemSettingsInput,
};
use crate::entities::{
    business_details, customer, inventory, inventory::UnitOfMeasurement, system_settings,
};
use crate::errors::{field_errors, FieldErrors, ServiceError};
use crate::services::{audit, catalog};
use crate::session::{SessionStore, StagedMaterial, WizardSession};

pub const COMMIT_SUCCESS_MESSAGE: &str = "All data has been successfully saved to the database.";
pub const COMMIT_FAILURE_MESSAGE: &str = "An error occurred while saving the data.";
pub const DASHBOARD_URL: &str = "/dashboard";

pub fn stage_business_details(
    session: &mut WizardSession,
    input: BusinessDetailsInput,
) -> Result<String, ServiceError> {
    input.validate()?;
    let message = format!("Business details for '{}' saved.", input.business_name);
    session.business_details = Some(input);
    Ok(message)
}

fn add_pricing_option(
    session: &mut WizardSession,
    input: PricingOptionInput,
) -> Result<String, ServiceError> {
    let index = input
        .parsed_index()
        .ok_or_else(|| ServiceError::InvalidInput("Invalid service index provided.".to_string()))?;
    if index >= session.services_data.len() {
        return Err(ServiceError::InvalidInput("Service index out of range.".to_string()));
    }
    let price = input.price.unwrap_or(Decimal::ZERO);
    if price.is_sign_negative() {
        return Err(ServiceError::field(
            "price",
            "Ensure this value is greater than or equal to 0.",
        ));
    }

    // Matched the way the commit stores option names.
    let option_name = input
        .customization_option
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let pricing = StagedPricing {
        description: input.description,
        price,
    };

    // A current service staged from this entry follows it, so save_service
    // still recognises it as already present.
    let tracks_current = session.current_service.as_ref() == Some(&session.services_data[index]);
    let target = &mut session.services_data[index];
    let option = target
        .customization_options
        .iter_mut()
        .find(|option| option.name.trim().to_lowercase() == option_name)
        .ok_or_else(|| ServiceError::InvalidInput("Customization option not found.".to_string()))?;
    option.pricing_options.push(pricing);

    if tracks_current {
        session.current_service = Some(target.clone());
    }
    Ok("Pricing option added successfully!".to_string())
}

/// Apply one services-and-pricing action.
pub fn apply_services_action(
    session: &mut WizardSession,
    action: ServicesAction,
) -> Result<String, ServiceError> {
    match action {
        ServicesAction::AddService(input) => {
            input.validate()?;
            let staged = StagedService::from(input);
            let message = format!("Service: '{}' added successfully!", staged.name);
            session.services_data.push(staged.clone());
            session.current_service = Some(staged);
            Ok(message)
        }
        ServicesAction::AddPricingOption(input) => add_pricing_option(session, input),
        ServicesAction::SaveService => {
            if let Some(current) = session.current_service.take() {
                if !session.services_data.contains(&current) {
                    session.services_data.push(current);
                }
            }
            Ok("Services confirmed.".to_string())
        }
        ServicesAction::RevertToService => Ok("Ready for another service.".to_string()),
    }
}

pub fn stage_equipment(
    session: &mut WizardSession,
    input: EquipmentInput,
) -> Result<String, ServiceError> {
    input.validate()?;
    let message = format!("Equipment '{}' added successfully!", input.name);
    session.equipment.push(input);
    Ok(message)
}

pub fn stage_inventory(
    session: &mut WizardSession,
    input: InventoryInput,
) -> Result<String, ServiceError> {
    input.validate()?;
    let (category, material) = StagedMaterial::from_input(input);
    let message = format!("{} added successfully to {}!", material.name, category);
    session.inventory.entry(category).or_default().push(material);
    Ok(message)
}

pub fn stage_supplier(
    session: &mut WizardSession,
    input: SupplierInput,
) -> Result<String, ServiceError> {
    input.validate()?;
    session.supplier.push(input);
    Ok("Supplier data saved successfully!".to_string())
}

pub fn stage_customer(
    session: &mut WizardSession,
    input: CustomerInput,
) -> Result<String, ServiceError> {
    input.validate()?;
    session.customer.push(input);
    Ok("Customer data saved successfully!".to_string())
}

pub fn stage_system_settings(
    session: &mut WizardSession,
    input: SystemSettingsInput,
) -> Result<String, ServiceError> {
    input.validate()?;
    session.system_settings = Some(input);
    Ok("System settings saved successfully. Please review all data before proceeding.".to_string())
}

/// Field errors of a staged record, keyed `section[index].field`.
fn staged_errors(section: &str, index: Option<usize>, errors: &ValidationErrors) -> ServiceError {
    let prefix = match index {
        Some(i) => format!("{}[{}]", section, i),
        None => section.to_string(),
    };
    let keyed: FieldErrors = field_errors(errors)
        .into_iter()
        .map(|(field, messages)| (format!("{}.{}", prefix, field), messages))
        .collect();
    ServiceError::FormErrors(keyed)
}

/// How many records of each kind a commit wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub business_details: bool,
    pub services: usize,
    pub pricing_options: usize,
    pub equipment: usize,
    pub materials: usize,
    pub suppliers: usize,
    pub customers: usize,
    pub system_settings: bool,
}

/// Write a staged session in dependency order on `db`. Run it inside a
/// transaction: the first failure leaves earlier sections written.
pub async fn commit_session<C: ConnectionTrait>(
    db: &C,
    session: &WizardSession,
) -> Result<CommitSummary, ServiceError> {
    let mut summary = CommitSummary::default();

    if let Some(details) = &session.business_details {
        details
            .validate()
            .map_err(|e| staged_errors("business_details", None, &e))?;
        business_details::ActiveModel {
            name: Set(details.business_name.trim().to_string()),
            address: Set(details.business_address.clone()),
            contact_number: Set(details.contact_number.clone()),
            email: Set(details.email.clone()),
            tax_identification_number: Set(details.tin.clone()),
            logo: Set(details.logo.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.business_details = true;
    }

    for (i, staged) in session.services_data.iter().enumerate() {
        staged
            .as_input()
            .validate()
            .map_err(|e| staged_errors("services_data", Some(i), &e))?;
        let negative = staged
            .customization_options
            .iter()
            .flat_map(|option| &option.pricing_options)
            .any(|pricing| pricing.price.is_sign_negative());
        if negative {
            return Err(ServiceError::field(
                &format!("services_data[{}].price", i),
                "Ensure this value is greater than or equal to 0.",
            ));
        }
        catalog::create_service_in(db, staged).await?;
        summary.services += 1;
        summary.pricing_options += staged
            .customization_options
            .iter()
            .map(|option| option.pricing_options.len())
            .sum::<usize>();
    }

    for (i, item) in session.equipment.iter().enumerate() {
        item.validate().map_err(|e| staged_errors("equipment", Some(i), &e))?;
        catalog::create_equipment_in(db, item).await?;
        summary.equipment += 1;
    }

    for (category, materials) in &session.inventory {
        let category_id = catalog::upsert_category(db, category).await?;
        for (i, material) in materials.iter().enumerate() {
            let input = material.as_input(category);
            input
                .validate()
                .map_err(|e| staged_errors(&format!("inventory.{}", category), Some(i), &e))?;
            let unit: UnitOfMeasurement = input
                .unit_of_measurement
                .parse()
                .map_err(|_| ServiceError::field("unit_of_measurement", "Select a valid choice."))?;
            let supplier_id = match material.supplier.as_deref() {
                Some(name) => Some(catalog::upsert_supplier_by_name(db, name).await?.id),
                None => None,
            };

            inventory::ActiveModel {
                name: Set(material.name.trim().to_string()),
                category_id: Set(Some(category_id)),
                stock_level: Set(material.stock_level),
                reorder_threshold: Set(material.reorder_threshold),
                supplier_id: Set(supplier_id),
                unit_of_measurement: Set(unit),
                ..Default::default()
            }
            .insert(db)
            .await?;
            summary.materials += 1;
        }
    }

    for (i, item) in session.supplier.iter().enumerate() {
        item.validate().map_err(|e| staged_errors("supplier", Some(i), &e))?;
        catalog::upsert_supplier(db, item).await?;
        summary.suppliers += 1;
    }

    for (i, item) in session.customer.iter().enumerate() {
        item.validate().map_err(|e| staged_errors("customer", Some(i), &e))?;
        customer::ActiveModel {
            name: Set(item.name.trim().to_string()),
            contact_number: Set(item.contact_number.trim().to_string()),
            email: Set(Some(item.email.trim().to_string())),
            address: Set(Some(item.address.clone().unwrap_or_default())),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.customers += 1;
    }

    if let Some(settings) = &session.system_settings {
        settings
            .validate()
            .map_err(|e| staged_errors("system_settings", None, &e))?;
        save_system_settings(db, settings).await?;
        summary.system_settings = true;
    }

    Ok(summary)
}

/// Update the settings row for this SMTP account, or create one with defaults.
async fn save_system_settings<C: ConnectionTrait>(
    db: &C,
    settings: &SystemSettingsInput,
) -> Result<system_settings::Model, ServiceError> {
    let existing = system_settings::Entity::find()
        .filter(system_settings::Column::SmtpEmail.eq(settings.smtp_email.as_str()))
        .one(db)
        .await?;

    match existing {
        Some(row) => {
            let mut active: system_settings::ActiveModel = row.into();
            active.smtp_server = Set(Some(settings.smtp_server.clone()));
            active.smtp_port = Set(Some(settings.smtp_port));
            active.smtp_password = Set(Some(settings.smtp_password.clone()));
            Ok(active.update(db).await?)
        }
        None => Ok(system_settings::ActiveModel {
            currency: Set(system_settings::DEFAULT_CURRENCY.to_string()),
            timezone: Set(system_settings::DEFAULT_TIMEZONE.to_string()),
            date_format: Set(system_settings::DEFAULT_DATE_FORMAT.to_string()),
            language: Set(system_settings::DEFAULT_LANGUAGE.to_string()),
            smtp_server: Set(Some(settings.smtp_server.clone())),
            smtp_port: Set(Some(settings.smtp_port)),
            smtp_email: Set(Some(settings.smtp_email.clone())),
            smtp_password: Set(Some(settings.smtp_password.clone())),
            ..Default::default()
        }
        .insert(db)
        .await?),
    }
}

#[derive(Clone)]
pub struct SetupService {
    db: Arc<DatabaseConnection>,
    sessions: Arc<dyn SessionStore>,
    clear_on_commit: bool,
}

impl SetupService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        sessions: Arc<dyn SessionStore>,
        clear_on_commit: bool,
    ) -> Self {
        Self {
            db,
            sessions,
            clear_on_commit,
        }
    }

    pub async fn session(&self, token: &str) -> Result<WizardSession, ServiceError> {
        self.sessions.load_or_default(token).await
    }

    /// Run a staging step against the stored session. The session is only
    /// written back when the step succeeds.
    pub async fn stage<F>(
        &self,
        token: &str,
        step: F,
    ) -> Result<(String, WizardSession), ServiceError>
    where
        F: FnOnce(&mut WizardSession) -> Result<String, ServiceError>,
    {
        let mut session = self.sessions.load_or_default(token).await?;
        let message = step(&mut session)?;
        self.sessions.save(token, &session).await?;
        Ok((message, session))
    }

    /// Both the business details and the system settings have been committed.
    pub async fn is_setup_complete(&self) -> Result<bool, ServiceError> {
        let db = &*self.db;
        let has_business = business_details::Entity::find().count(db).await? > 0;
        let has_settings = system_settings::Entity::find().count(db).await? > 0;
        Ok(has_business && has_settings)
    }

    /// Write everything staged under `token` in one transaction.
    #[instrument(skip(self, token))]
    pub async fn commit(
        &self,
        token: &str,
        user_id: Option<i32>,
    ) -> Result<CommitSummary, ServiceError> {
        let session = self.sessions.load_or_default(token).await?;

        let txn = self.db.begin().await?;
        let result: Result<CommitSummary, ServiceError> = async {
            let summary = commit_session(&txn, &session).await?;
            audit::record(
                &txn,
                user_id,
                format!(
                    "Setup committed: {} services, {} equipment, {} materials, \
                     {} suppliers, {} customers",
                    summary.services,
                    summary.equipment,
                    summary.materials,
                    summary.suppliers,
                    summary.customers
                ),
            )
            .await?;
            Ok(summary)
        }
        .await;

        let summary = settle(txn, result).await.map_err(|e| {
            error!(error = %e, "Error saving data to database");
            e
        })?;

        if self.clear_on_commit {
            self.sessions.remove(token).await?;
        }
        info!(?summary, "Setup data saved");
        Ok(summary)
    }
}
