//! # Filter / Query-Builder
//!
//! Turns untrusted caller-supplied sort/limit/offset parameters into safe,
//! bounded SQL ordering clauses.
//!
//! ## Trust Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Untrusted Parameters → Safe SQL                      │
//! │                                                                         │
//! │  Caller supplies: sort="helpfull", limit=50000, offset=-3              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_sort() ──► ValidationError::NotAllowed { field: "sort" }     │
//! │       │                                                                 │
//! │  (caller retries: sort="helpful")                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize() ──► limit=10, offset=0, sort="helpful"                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort_column() ──► "helpful_count"   (closed allow-list, never         │
//! │       │                               caller text)                      │
//! │       ▼                                                                 │
//! │  build_query(base) ──►                                                 │
//! │    "<base> ORDER BY helpful_count DESC, id DESC LIMIT 10 OFFSET 0"     │
//! │                                                                         │
//! │  Only clamped integers and allow-listed identifiers ever enter the     │
//! │  query shape. Literal values (names, categories, ids) stay bound       │
//! │  parameters in the repositories.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Normalization and validation are independent steps: a caller that wants
//! strict input checking runs `validate_sort` first; a caller that wants
//! forgiving defaults just normalizes. Both are idempotent.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

// =============================================================================
// Sort Target
// =============================================================================

/// Which entity a filter is ordering.
///
/// The sort allow-list and column mapping differ per entity, so the target
/// is explicit rather than inferred from the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTarget {
    /// Product listings: `rating` and `date`.
    Products,
    /// Review listings: `helpful` and `date`.
    Reviews,
}

impl SortTarget {
    /// The closed set of logical sort keys this target accepts.
    pub const fn allowed_keys(&self) -> &'static [&'static str] {
        match self {
            SortTarget::Products => &["rating", "date"],
            SortTarget::Reviews => &["helpful", "date"],
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Caller-supplied sort/limit/offset parameters for a list query.
///
/// Constructed per request from raw input and discarded after use. Nothing
/// here is trusted until it has passed through [`Filters::normalize`] (and,
/// for strict callers, [`Filters::validate_sort`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Logical sort key. Empty means "use the default ordering".
    pub sort: String,

    /// Maximum rows to return. Clamped into [1, 100].
    pub limit: i64,

    /// Rows to skip. Clamped to >= 0.
    pub offset: i64,
}

impl Filters {
    /// Creates filters from raw caller input.
    pub fn new(sort: impl Into<String>, limit: i64, offset: i64) -> Self {
        Filters {
            sort: sort.into(),
            limit,
            offset,
        }
    }

    /// Clamps limit/offset into their bounds and defaults an empty sort.
    ///
    /// ## Rules
    /// - limit <= 0 or limit > 100  →  10
    /// - offset < 0                 →  0
    /// - sort ""                    →  "date"
    ///
    /// Idempotent: normalizing an already-normalized value is the identity,
    /// so it is safe to call at every layer that touches the filters.
    pub fn normalize(mut self) -> Self {
        if self.limit <= 0 || self.limit > MAX_PAGE_LIMIT {
            self.limit = DEFAULT_PAGE_LIMIT;
        }

        if self.offset < 0 {
            self.offset = 0;
        }

        if self.sort.is_empty() {
            self.sort = "date".to_string();
        }

        self
    }

    /// Checks the sort key against the target's allow-list.
    ///
    /// Empty sort is valid: it means "defaulted", and [`Filters::normalize`]
    /// fills it in. Anything else outside the allow-list fails with an error
    /// tagged `field: "sort"`.
    pub fn validate_sort(&self, target: SortTarget) -> ValidationResult<()> {
        if self.sort.is_empty() {
            return Ok(());
        }

        let allowed = target.allowed_keys();
        if !allowed.contains(&self.sort.as_str()) {
            return Err(ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: allowed.iter().map(|k| k.to_string()).collect(),
            });
        }

        Ok(())
    }

    /// Maps the logical sort key to the physical ordering column.
    ///
    /// This is a closed allow-list: every possible input maps to one of the
    /// pre-approved identifiers below, so no caller text can ever name a
    /// column. Unknown or empty keys fall back to `created_at`.
    pub fn sort_column(&self, target: SortTarget) -> &'static str {
        match (target, self.sort.as_str()) {
            (SortTarget::Products, "rating") => "average_rating",
            (SortTarget::Reviews, "helpful") => "helpful_count",
            _ => "created_at",
        }
    }

    /// Appends ordering and pagination to a base query.
    ///
    /// The appended clause contains only the allow-listed column and the
    /// clamped integers: `ORDER BY <col> DESC, id DESC LIMIT <n> OFFSET <m>`.
    /// `id DESC` makes the order deterministic when the sort column ties.
    ///
    /// Normalization is applied internally, so limit/offset can never reach
    /// the query unclamped even if the caller skipped [`Filters::normalize`].
    pub fn build_query(&self, base: &str, target: SortTarget) -> String {
        let f = self.clone().normalize();

        format!(
            "{} ORDER BY {} DESC, id DESC LIMIT {} OFFSET {}",
            base,
            f.sort_column(target),
            f.limit,
            f.offset
        )
    }
}

impl Default for Filters {
    /// Unset filters: defaulted sort, default page size, first page.
    fn default() -> Self {
        Filters {
            sort: String::new(),
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps_limit() {
        // Out of bounds in both directions falls back to the default
        assert_eq!(Filters::new("", 0, 0).normalize().limit, 10);
        assert_eq!(Filters::new("", -5, 0).normalize().limit, 10);
        assert_eq!(Filters::new("", 101, 0).normalize().limit, 10);
        assert_eq!(Filters::new("", 50_000, 0).normalize().limit, 10);

        // In-range values pass through unchanged
        assert_eq!(Filters::new("", 1, 0).normalize().limit, 1);
        assert_eq!(Filters::new("", 25, 0).normalize().limit, 25);
        assert_eq!(Filters::new("", 100, 0).normalize().limit, 100);
    }

    #[test]
    fn test_normalize_clamps_offset() {
        assert_eq!(Filters::new("", 10, -1).normalize().offset, 0);
        assert_eq!(Filters::new("", 10, -9999).normalize().offset, 0);

        assert_eq!(Filters::new("", 10, 0).normalize().offset, 0);
        assert_eq!(Filters::new("", 10, 40).normalize().offset, 40);
    }

    #[test]
    fn test_normalize_defaults_sort() {
        assert_eq!(Filters::new("", 10, 0).normalize().sort, "date");
        assert_eq!(Filters::new("rating", 10, 0).normalize().sort, "rating");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = Filters::new("", -7, -3).normalize();
        let twice = once.clone().normalize();
        assert_eq!(once, twice);

        let once = Filters::new("helpful", 100, 20).normalize();
        let twice = once.clone().normalize();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_validate_sort_products() {
        assert!(Filters::new("rating", 10, 0)
            .validate_sort(SortTarget::Products)
            .is_ok());
        assert!(Filters::new("date", 10, 0)
            .validate_sort(SortTarget::Products)
            .is_ok());
        // Empty is "defaulted", not an error
        assert!(Filters::new("", 10, 0)
            .validate_sort(SortTarget::Products)
            .is_ok());

        // "helpful" belongs to reviews, not products
        assert!(Filters::new("helpful", 10, 0)
            .validate_sort(SortTarget::Products)
            .is_err());
        assert!(Filters::new("price", 10, 0)
            .validate_sort(SortTarget::Products)
            .is_err());
    }

    #[test]
    fn test_validate_sort_reviews() {
        assert!(Filters::new("helpful", 10, 0)
            .validate_sort(SortTarget::Reviews)
            .is_ok());
        assert!(Filters::new("date", 10, 0)
            .validate_sort(SortTarget::Reviews)
            .is_ok());

        assert!(Filters::new("rating", 10, 0)
            .validate_sort(SortTarget::Reviews)
            .is_err());
    }

    #[test]
    fn test_validate_sort_tags_the_field() {
        let err = Filters::new("nonsense", 10, 0)
            .validate_sort(SortTarget::Products)
            .unwrap_err();
        assert_eq!(err.field(), "sort");
    }

    #[test]
    fn test_sort_column_is_allow_listed() {
        assert_eq!(
            Filters::new("rating", 10, 0).sort_column(SortTarget::Products),
            "average_rating"
        );
        assert_eq!(
            Filters::new("helpful", 10, 0).sort_column(SortTarget::Reviews),
            "helpful_count"
        );
        assert_eq!(
            Filters::new("date", 10, 0).sort_column(SortTarget::Products),
            "created_at"
        );

        // Unknown keys (including attempted injection) map to the default
        // column, never to their own text
        assert_eq!(
            Filters::new("id; DROP TABLE products", 10, 0).sort_column(SortTarget::Products),
            "created_at"
        );
        // "rating" is not a review key, so it falls back too
        assert_eq!(
            Filters::new("rating", 10, 0).sort_column(SortTarget::Reviews),
            "created_at"
        );
    }

    #[test]
    fn test_build_query_shape() {
        let q = Filters::new("rating", 20, 40)
            .build_query("SELECT * FROM products", SortTarget::Products);
        assert_eq!(
            q,
            "SELECT * FROM products ORDER BY average_rating DESC, id DESC LIMIT 20 OFFSET 40"
        );
    }

    #[test]
    fn test_build_query_clamps_unnormalized_input() {
        // Absurd values never reach the query text unclamped
        let q = Filters::new("", 50_000, -3).build_query("SELECT 1", SortTarget::Reviews);
        assert_eq!(q, "SELECT 1 ORDER BY created_at DESC, id DESC LIMIT 10 OFFSET 0");
    }

    #[test]
    fn test_default_filters() {
        let f = Filters::default();
        assert_eq!(f.limit, 10);
        assert_eq!(f.offset, 0);
        assert!(f.sort.is_empty());
        assert!(f.validate_sort(SortTarget::Products).is_ok());
    }
}
