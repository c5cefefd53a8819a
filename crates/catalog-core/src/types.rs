//! # Domain Types
//!
//! Core domain types used throughout the catalog service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Product      │ 1    N │     Review      │                        │
//! │  │  ─────────────  │◄───────│  ─────────────  │                        │
//! │  │  id (i64)       │        │  id (i64)       │                        │
//! │  │  name           │        │  product_id (FK)│                        │
//! │  │  category       │        │  rating (1..=5) │                        │
//! │  │  average_rating │        │  helpful_count  │                        │
//! │  └─────────────────┘        └─────────────────┘                        │
//! │                                                                         │
//! │  NewProduct / NewReview are the insert payloads: the same fields       │
//! │  minus everything the server assigns (id, timestamps, derived and      │
//! │  counter columns).                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Data
//! `Product::average_rating` is never accepted from a client payload. It is
//! recomputed from the review set by the storage layer on every review
//! mutation, so the value a reader sees always matches the current reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MAX_RATING, MIN_RATING};

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier, assigned by the database.
    pub id: i64,

    /// Display name. Non-empty, at most 100 characters.
    pub name: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Category the product is filed under. Non-empty, matched exactly.
    pub category: String,

    /// Reference to the product image. Non-empty, URL-shaped.
    pub image_url: String,

    /// Derived mean of this product's review ratings, in [0, 5].
    /// 0 when the product has no reviews.
    pub average_rating: f64,

    /// When the product was created (server-assigned).
    pub created_at: DateTime<Utc>,

    /// When the product was last updated (server-assigned).
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product.
///
/// Carries only the client-writable fields; identity, timestamps and the
/// derived rating are assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub image_url: String,
}

// =============================================================================
// Review
// =============================================================================

/// A review of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Review {
    /// Unique identifier, assigned by the database.
    pub id: i64,

    /// The product this review belongs to. Must reference an existing
    /// product; immutable after insert.
    pub product_id: i64,

    /// Review text. Non-empty.
    pub content: String,

    /// Display name of the reviewer. Non-empty.
    pub author: String,

    /// Star rating, integer in [1, 5].
    pub rating: i64,

    /// How many readers marked this review helpful. Server-maintained,
    /// starts at 0; clients can only increment it.
    pub helpful_count: i64,

    /// When the review was created (server-assigned).
    pub created_at: DateTime<Utc>,

    /// When the review was last updated (server-assigned).
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Checks whether a rating value is inside the allowed range.
    #[inline]
    pub const fn rating_in_range(rating: i64) -> bool {
        rating >= MIN_RATING && rating <= MAX_RATING
    }
}

/// Payload for creating a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub product_id: i64,
    pub content: String,
    pub author: String,
    pub rating: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_in_range() {
        assert!(Review::rating_in_range(1));
        assert!(Review::rating_in_range(3));
        assert!(Review::rating_in_range(5));

        assert!(!Review::rating_in_range(0));
        assert!(!Review::rating_in_range(6));
        assert!(!Review::rating_in_range(-1));
    }
}
