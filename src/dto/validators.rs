use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

use crate::entities::{equipment::EquipmentCondition, inventory::UnitOfMeasurement};

static BUSINESS_CONTACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("static regex"));
static CUSTOMER_CONTACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("static regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("static regex")
});

/// Inventory categories offered by the wizard.
pub const INVENTORY_CATEGORIES: [&str; 7] =
    ["Ink", "Textiles", "Vinyl", "Paper", "Adhesives", "Fabrics", "Other"];

pub const MAX_CUSTOMIZATION_OPTIONS: usize = 10;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_business_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().all(|c| c.is_alphanumeric() || c.is_whitespace()) {
        Ok(())
    } else {
        Err(invalid(
            "business_name",
            "Business name should only contain letters and numbers.",
        ))
    }
}

pub fn validate_business_contact(contact: &str) -> Result<(), ValidationError> {
    if !BUSINESS_CONTACT_RE.is_match(contact) {
        return Err(invalid(
            "contact_number",
            "Enter a valid contact number (9-15 digits, optional country code).",
        ));
    }
    if contact.len() < 11 {
        return Err(invalid("contact_number", "Phone number must be at least 11 digits."));
    }
    Ok(())
}

pub fn validate_tin(tin: &str) -> Result<(), ValidationError> {
    if !tin.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "tin",
            "Tax Identification Number (TIN) must contain only numbers.",
        ));
    }
    if !(9..=20).contains(&tin.len()) {
        return Err(invalid("tin", "TIN must be between 9 and 20 digits."));
    }
    Ok(())
}

pub fn validate_service_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < 3 {
        return Err(invalid(
            "service_name",
            "Service name must be at least 3 characters long.",
        ));
    }
    Ok(())
}

pub fn validate_customization_options(options: &Vec<String>) -> Result<(), ValidationError> {
    if options.iter().any(|option| option.trim().is_empty()) {
        return Err(invalid(
            "customization_options",
            "Invalid customization options format. Please use valid text tags.",
        ));
    }
    if options.len() > MAX_CUSTOMIZATION_OPTIONS {
        return Err(invalid(
            "customization_options",
            "You can add a maximum of 10 customization options.",
        ));
    }
    Ok(())
}

pub fn validate_equipment_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < 3 {
        return Err(invalid(
            "equipment_name",
            "Equipment name must have at least 3 characters.",
        ));
    }
    Ok(())
}

pub fn validate_condition(condition: &str) -> Result<(), ValidationError> {
    condition
        .parse::<EquipmentCondition>()
        .map(|_| ())
        .map_err(|_| invalid("condition", "Select a valid choice."))
}

pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if INVENTORY_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(invalid("category", "Invalid category selected."))
    }
}

pub fn validate_categories(categories: &Vec<String>) -> Result<(), ValidationError> {
    categories.iter().try_for_each(|category| validate_category(category))
}

pub fn validate_unit(unit: &str) -> Result<(), ValidationError> {
    unit.parse::<UnitOfMeasurement>()
        .map(|_| ())
        .map_err(|_| invalid("unit_of_measurement", "Select a valid choice."))
}

pub fn validate_supplier_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() < 11 {
        return Err(invalid("phone_number", "Phone number must be at least 10 digits."));
    }
    Ok(())
}

pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(invalid("email", "Invalid email format."))
    }
}

pub fn validate_customer_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < 5 {
        return Err(invalid("name", "Full name must be at least 5 characters long."));
    }
    Ok(())
}

pub fn validate_customer_contact(contact: &str) -> Result<(), ValidationError> {
    if CUSTOMER_CONTACT_RE.is_match(contact) {
        Ok(())
    } else {
        Err(invalid(
            "contact_number",
            "Invalid contact number. Ensure it contains only numbers and is between 10-15 digits.",
        ))
    }
}

pub fn validate_smtp_port(port: i32) -> Result<(), ValidationError> {
    if port == 465 || port == 587 {
        Ok(())
    } else {
        Err(invalid(
            "smtp_port",
            "Invalid SMTP port. Use 465 (SSL) or 587 (TLS) for Google.",
        ))
    }
}

pub fn validate_gmail(email: &str) -> Result<(), ValidationError> {
    if email.ends_with("@gmail.com") {
        Ok(())
    } else {
        Err(invalid(
            "smtp_email",
            "The SMTP email must be a Gmail address (e.g., user@gmail.com).",
        ))
    }
}

pub fn validate_app_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() == 16 {
        Ok(())
    } else {
        Err(invalid(
            "smtp_password",
            "Invalid SMTP password. Ensure it's a 16-character App Password generated by Google.",
        ))
    }
}

pub fn validate_future_deadline(deadline: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *deadline > Utc::now() {
        Ok(())
    } else {
        Err(invalid("deadline", "The deadline must be in the future."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Print Hub 42", true)]
    #[case("Print-Hub", false)]
    #[case("Acme & Co", false)]
    fn business_name_allows_letters_digits_spaces(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(validate_business_name(name).is_ok(), ok);
    }

    #[rstest]
    #[case("+639171234567", true)]
    #[case("09171234567", true)]
    #[case("0917123456", false)]
    #[case("phone", false)]
    fn business_contact_needs_pattern_and_length(#[case] contact: &str, #[case] ok: bool) {
        assert_eq!(validate_business_contact(contact).is_ok(), ok);
    }

    #[rstest]
    #[case("123456789", true)]
    #[case("12345678", false)]
    #[case("12345678901234567890", true)]
    #[case("123456789012345678901", false)]
    #[case("12345abcd", false)]
    fn tin_is_9_to_20_digits(#[case] tin: &str, #[case] ok: bool) {
        assert_eq!(validate_tin(tin).is_ok(), ok);
    }

    #[test]
    fn customization_options_reject_blank_and_more_than_ten() {
        assert!(validate_customization_options(&vec!["Size".into(), "Color".into()]).is_ok());
        assert!(validate_customization_options(&vec!["Size".into(), "  ".into()]).is_err());
        let eleven = (0..11).map(|i| format!("opt{i}")).collect();
        assert!(validate_customization_options(&eleven).is_err());
    }

    #[test]
    fn smtp_rules() {
        assert!(validate_smtp_port(465).is_ok());
        assert!(validate_smtp_port(587).is_ok());
        assert!(validate_smtp_port(25).is_err());
        assert!(validate_gmail("shop@gmail.com").is_ok());
        assert!(validate_gmail("shop@yahoo.com").is_err());
        assert!(validate_app_password("abcdabcdabcdabcd").is_ok());
        assert!(validate_app_password("short").is_err());
    }

    #[test]
    fn choice_fields() {
        assert!(validate_category("Vinyl").is_ok());
        assert!(validate_category("vinyl").is_err());
        assert!(validate_unit("rolls").is_ok());
        assert!(validate_unit("gallons").is_err());
        assert!(validate_condition("broken").is_ok());
        assert!(validate_condition("lost").is_err());
    }

    #[test]
    fn customer_rules() {
        assert!(validate_customer_name("Ana Cruz").is_ok());
        assert!(validate_customer_name("Ana").is_err());
        assert!(validate_customer_contact("+639171234567").is_ok());
        assert!(validate_customer_contact("12345").is_err());
        assert!(validate_email_format("ana.cruz@example.com").is_ok());
        assert!(validate_email_format("ana.cruz@").is_err());
    }

    #[test]
    fn deadline_must_be_in_the_future() {
        assert!(validate_future_deadline(&(Utc::now() + chrono::Duration::days(1))).is_ok());
        assert!(validate_future_deadline(&(Utc::now() - chrono::Duration::days(1))).is_err());
    }
}
