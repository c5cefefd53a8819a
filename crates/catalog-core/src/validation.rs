//! # Validation Module
//!
//! Input validation for catalog entities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (fronting service)                                 │
//! │  ├── Shape checks (JSON decoding, type coercion)                       │
//! │  └── THIS MODULE: field-level business rules                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (rating BETWEEN 1 AND 5)                                    │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  The repositories assume payloads passed this module; the database     │
//! │  constraints are the backstop, not the primary check.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: input in, `Ok(())` or a field-tagged
//! [`ValidationError`] out. There is no validator object carrying state
//! between calls.

use crate::error::{ValidationError, ValidationResult};
use crate::types::{NewProduct, NewReview, Product, Review};
use crate::{MAX_PRODUCT_NAME_LEN, MAX_RATING, MIN_RATING};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 100 characters
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Widget").is_ok());
/// assert!(validate_product_name("").is_err());
/// assert!(validate_product_name(&"x".repeat(101)).is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product category.
///
/// ## Rules
/// - Must not be empty (after trimming)
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    Ok(())
}

/// Validates a product image reference.
///
/// ## Rules
/// - Must not be empty
/// - Must be URL-shaped: an `http://` or `https://` scheme
pub fn validate_image_url(url: &str) -> ValidationResult<()> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::Required {
            field: "image_url".to_string(),
        });
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidFormat {
            field: "image_url".to_string(),
            reason: "must be an http(s) URL".to_string(),
        });
    }

    Ok(())
}

/// Validates review content.
pub fn validate_content(content: &str) -> ValidationResult<()> {
    if content.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "content".to_string(),
        });
    }

    Ok(())
}

/// Validates a review author.
pub fn validate_author(author: &str) -> ValidationResult<()> {
    if author.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "author".to_string(),
        });
    }

    Ok(())
}

/// Validates a star rating.
///
/// ## Rules
/// - Integer in [1, 5]
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !Review::rating_in_range(rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING,
            max: MAX_RATING,
        });
    }

    Ok(())
}

/// Validates an entity identity reference.
///
/// Identities are positive integers; 0 and negatives never name a row.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a product creation payload.
///
/// Fails with the first offending field; callers surface the field tag to
/// the client and retry with corrected input.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_image_url(&product.image_url)?;
    Ok(())
}

/// Validates a full product, e.g. before an update.
///
/// The derived `average_rating` is not validated here: clients never write
/// it, so by the time a `Product` exists it came from the storage layer.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_id("id", product.id)?;
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_image_url(&product.image_url)?;
    Ok(())
}

/// Validates a review creation payload.
pub fn validate_new_review(review: &NewReview) -> ValidationResult<()> {
    validate_id("product_id", review.product_id)?;
    validate_rating(review.rating)?;
    validate_content(&review.content)?;
    validate_author(&review.author)?;
    Ok(())
}

/// Validates a full review, e.g. before an update.
pub fn validate_review(review: &Review) -> ValidationResult<()> {
    validate_id("id", review.id)?;
    validate_rating(review.rating)?;
    validate_content(&review.content)?;
    validate_author(&review.author)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Widget").is_ok());
        assert!(validate_product_name(&"x".repeat(100)).is_ok());

        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_image_url() {
        assert!(validate_image_url("https://cdn.example.com/widget.png").is_ok());
        assert!(validate_image_url("http://cdn.example.com/widget.png").is_ok());

        assert!(validate_image_url("").is_err());
        assert!(validate_image_url("ftp://example.com/widget.png").is_err());
        assert!(validate_image_url("widget.png").is_err());
    }

    #[test]
    fn test_validate_rating() {
        for rating in 1..=5 {
            assert!(validate_rating(rating).is_ok());
        }

        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let product = NewProduct {
            name: "Widget".to_string(),
            description: None,
            category: "tools".to_string(),
            image_url: "https://cdn.example.com/widget.png".to_string(),
        };
        assert!(validate_new_product(&product).is_ok());

        let mut bad = product.clone();
        bad.category = "".to_string();
        let err = validate_new_product(&bad).unwrap_err();
        assert_eq!(err.field(), "category");
    }

    #[test]
    fn test_validate_new_review() {
        let review = NewReview {
            product_id: 1,
            content: "Sturdy and well made.".to_string(),
            author: "sam".to_string(),
            rating: 4,
        };
        assert!(validate_new_review(&review).is_ok());

        let mut bad = review.clone();
        bad.rating = 9;
        let err = validate_new_review(&bad).unwrap_err();
        assert_eq!(err.field(), "rating");

        let mut bad = review.clone();
        bad.product_id = 0;
        let err = validate_new_review(&bad).unwrap_err();
        assert_eq!(err.field(), "product_id");
    }
}
