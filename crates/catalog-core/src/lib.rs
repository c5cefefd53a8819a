//! # catalog-core: Pure Domain Logic for the Catalog Service
//!
//! This crate is the **heart** of the catalog service. It contains the
//! domain types and all query-shaping and validation logic as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog Service Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Transport (separate service repo)               │   │
//! │  │    routing ──► JSON envelopes ──► rate limiting ──► recovery    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────────────────────┐  │   │
//! │  │   │   types   │  │  filter   │  │        validation         │  │   │
//! │  │   │  Product  │  │  Filters  │  │  field rules, pure fns    │  │   │
//! │  │   │  Review   │  │ SortTarget│  │  field-tagged errors      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   catalog-db (Storage Layer)                    │   │
//! │  │             SQLite queries, migrations, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Review and their insert payloads)
//! - [`filter`] - Sort/limit/offset normalization and safe ORDER BY assembly
//! - [`error`] - Field-tagged validation errors
//! - [`validation`] - Field and entity validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Closed sort mapping**: caller text can select a pre-approved ordering
//!    column, never name one
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::filter::{Filters, SortTarget};
//!
//! let filters = Filters::new("rating", 500, -2);
//!
//! // Strict callers reject unknown sort keys up front
//! assert!(filters.validate_sort(SortTarget::Products).is_ok());
//!
//! // Bounds are clamped before anything reaches a query
//! let q = filters.build_query("SELECT id FROM products", SortTarget::Products);
//! assert_eq!(
//!     q,
//!     "SELECT id FROM products ORDER BY average_rating DESC, id DESC LIMIT 10 OFFSET 0"
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use catalog_core::Filters` instead of
// `use catalog_core::filter::Filters`

pub use error::{ValidationError, ValidationResult};
pub use filter::{Filters, SortTarget};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest valid star rating.
pub const MIN_RATING: i64 = 1;

/// Highest valid star rating. Also the ceiling of the derived average.
pub const MAX_RATING: i64 = 5;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 100;

/// Page size used when the caller supplies none (or an out-of-bounds one).
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size a caller can request; anything above falls back to
/// [`DEFAULT_PAGE_LIMIT`].
pub const MAX_PAGE_LIMIT: i64 = 100;
