use crate::utils::error::{Result, TrailError};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TrailError::InvalidValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TrailError::InvalidValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TrailError::InvalidValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(TrailError::InvalidValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Checks that the file has one of the allowed extensions (case-insensitive).
pub fn validate_file_extension(
    field_name: &str,
    file: &Path,
    allowed_extensions: &[&str],
) -> Result<()> {
    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if allowed_extensions.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(TrailError::InvalidValueError {
            field: field_name.to_string(),
            value: file.display().to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(TrailError::InvalidValueError {
            field: field_name.to_string(),
            value: file.display().to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrailError::MissingFieldError {
            field: field_name.to_string(),
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
    // NaN fails both comparisons, so check containment instead of exclusion
    if !(value >= min && value <= max) {
        return Err(TrailError::InvalidValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_coordinates(field_prefix: &str, lat: f64, lng: f64) -> Result<()> {
    validate_range(&format!("{}.lat", field_prefix), lat, -90.0, 90.0)?;
    validate_range(&format!("{}.lng", field_prefix), lng, -180.0, 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("catalog.endpoint", "https://example.com").is_ok());
        assert!(validate_url("catalog.endpoint", "http://localhost:5678/webhook").is_ok());
        assert!(validate_url("catalog.endpoint", "").is_err());
        assert!(validate_url("catalog.endpoint", "invalid-url").is_err());
        assert!(validate_url("catalog.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("catalog.timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("catalog.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["jpg", "png"];
        assert!(validate_file_extension("image", Path::new("howrah.JPG"), &allowed).is_ok());
        assert!(validate_file_extension("image", Path::new("notes.txt"), &allowed).is_err());
        assert!(validate_file_extension("image", Path::new("README"), &allowed).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates("site", 22.5448, 88.3426).is_ok());
        assert!(validate_coordinates("site", 91.0, 0.0).is_err());
        assert!(validate_coordinates("site", 0.0, -180.5).is_err());
        assert!(validate_coordinates("site", f64::NAN, 0.0).is_err());
    }
}
