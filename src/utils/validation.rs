use crate::domain::model::EnrichmentRequest;
use crate::utils::error::{EnrichError, Result};
use regex::Regex;
use url::Url;

pub const MAX_NAME_LENGTH: usize = 100;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EnrichError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EnrichError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EnrichError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(EnrichError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EnrichError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 收集所有錯誤後一次回報
impl Validate for EnrichmentRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Name cannot be empty".to_string());
        } else if name.chars().count() > MAX_NAME_LENGTH {
            errors.push(format!(
                "Name must be less than {} characters",
                MAX_NAME_LENGTH
            ));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push("Email cannot be empty".to_string());
        } else {
            let email_pattern =
                Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").map_err(|e| EnrichError::ConfigError {
                    message: format!("Invalid email pattern: {}", e),
                })?;
            if !email_pattern.is_match(email) {
                errors.push("Email must be in valid format".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EnrichError::ValidationError {
                message: errors.join("; "),
            })
        }
    }
}
