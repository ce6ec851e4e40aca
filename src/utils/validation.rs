use regex::Regex;
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

fn digits(value: &str, count: usize) -> bool {
    value.len() == count && value.chars().all(|c| c.is_ascii_digit())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !EMAIL.is_match(email) {
        return Err(AppError::ValidationError(format!(
            "Invalid email address: {email}"
        )));
    }
    Ok(())
}

/// Phone numbers are stored as exactly 10 digits.
pub fn validate_phone(field: &str, phone: &str) -> AppResult<()> {
    if !digits(phone, 10) {
        return Err(AppError::ValidationError(format!(
            "{field} must be exactly 10 digits"
        )));
    }
    Ok(())
}

pub fn validate_pincode(pincode: &str) -> AppResult<()> {
    if !digits(pincode, 6) {
        return Err(AppError::ValidationError(
            "Pincode must be exactly 6 digits".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::ValidationError(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::ValidationError(
            "Longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

/// Trimmed value, or a validation error naming `field` when it is blank.
pub fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub fn non_negative(field: &str, value: i64) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::ValidationError(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("owner@gym.in").is_ok());
        assert!(validate_email("owner@gym").is_err());
        assert!(validate_email("owner gym@x.com").is_err());
    }

    #[test]
    fn test_validate_phone_and_pincode() {
        assert!(validate_phone("Phone", "9876543210").is_ok());
        assert!(validate_phone("Phone", "987654321").is_err());
        assert!(validate_phone("Phone", "+919876543210").is_err());
        assert!(validate_pincode("560001").is_ok());
        assert!(validate_pincode("56000a").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(12.97, 77.59).is_ok());
        assert!(validate_coordinates(90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, 181.0).is_err());
    }

    #[test]
    fn test_required() {
        assert_eq!(required("Name", "  Iron Temple ").unwrap(), "Iron Temple");
        assert!(required("Name", "   ").is_err());
    }
}
