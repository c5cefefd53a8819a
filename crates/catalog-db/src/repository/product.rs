//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Filtered, sorted, paginated listing
//! - Derived average-rating recompute
//!
//! ## Aggregate Consistency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              How average_rating Stays Consistent                        │
//! │                                                                         │
//! │  ❌ WRONG: read-then-write (loses updates under concurrency)           │
//! │     ratings = SELECT rating FROM reviews WHERE product_id = ?          │
//! │     avg = mean(ratings)                  ← another writer lands here   │
//! │     UPDATE products SET average_rating = avg                           │
//! │                                                                         │
//! │  ✅ CORRECT: one set-based statement                                   │
//! │     UPDATE products                                                    │
//! │     SET average_rating = (SELECT COALESCE(AVG(rating), 0)              │
//! │                           FROM reviews WHERE product_id = ?)           │
//! │     WHERE id = ?                                                       │
//! │                                                                         │
//! │  Two concurrent review writes each run this statement; whichever       │
//! │  commits last recomputes over the final review set. Readers never      │
//! │  observe a NULL or partially-written value.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use catalog_core::filter::{Filters, SortTarget};
use catalog_core::{NewProduct, Product};

/// Shared column list so every SELECT decodes into the same `Product` shape.
const PRODUCT_COLUMNS: &str =
    "id, name, description, category, image_url, average_rating, created_at, updated_at";

/// The single-statement aggregate recompute.
///
/// `?1` is the product id. COALESCE turns "no reviews" into 0 rather than
/// NULL, so the column is always a valid value in [0, 5].
const RECOMPUTE_AVERAGE_SQL: &str = "\
UPDATE products \
SET average_rating = (\
    SELECT COALESCE(AVG(rating), 0) \
    FROM reviews \
    WHERE product_id = ?1\
) \
WHERE id = ?1";

/// Recomputes a product's average rating on an explicit connection.
///
/// Exists so review mutations can run the recompute on their own
/// transaction connection; [`ProductRepository::recompute_average_rating`]
/// is the pool-backed wrapper for standalone use.
pub(crate) async fn recompute_average_rating_on(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> DbResult<()> {
    let result = sqlx::query(RECOMPUTE_AVERAGE_SQL)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", product_id));
    }

    Ok(())
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Filtered listing
/// let results = repo.get_all(Some("wid"), None, &filters).await?;
///
/// // Get by ID
/// let product = repo.get(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// Field validation (name, category, image_url) is the caller's job via
    /// `catalog_core::validation`; this layer assigns identity and
    /// timestamps. A fresh product starts with `average_rating = 0`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with the database-assigned id
    /// * `Err(DbError)` - Constraint violation or storage fault
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, category = %new.category, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO products \
             (name, description, category, image_url, average_rating, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.category)
        .bind(&new.image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            description: new.description.clone(),
            category: new.category.clone(),
            image_url: new.image_url.clone(),
            average_rating: 0.0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product found
    /// * `Err(DbError::NotFound)` - No such product. Distinct from every
    ///   other failure so callers can tell "doesn't exist" from "storage
    ///   unavailable".
    pub async fn get(&self, id: i64) -> DbResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        product.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Updates an existing product.
    ///
    /// Full overwrite of the client-writable fields plus a refreshed
    /// `updated_at`. Never touches `average_rating`: that column belongs to
    /// the recompute statement alone.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                name = ?2, \
                description = ?3, \
                category = ?4, \
                image_url = ?5, \
                updated_at = ?6 \
             WHERE id = ?1",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Deletes a product by ID.
    ///
    /// Deletion policy: **reject, not cascade.** The schema declares
    /// `reviews.product_id ... ON DELETE RESTRICT`, so deleting a product
    /// that still has reviews fails with `DbError::ForeignKeyViolation`;
    /// the reviews must be deleted first.
    ///
    /// ## Returns
    /// * `Ok(())` - Deleted
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - Product still has reviews
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists products with optional filtering, sorted and paginated.
    ///
    /// ## Arguments
    /// * `name` - Case-insensitive substring match; `None` matches all
    /// * `category` - Exact match; `None` matches all
    /// * `filters` - Sort/limit/offset, normalized per `catalog_core`
    ///
    /// Both filter terms are bound parameters; only the allow-listed
    /// ordering column and the clamped integers enter the query text.
    /// No match is an empty vec, not an error.
    pub async fn get_all(
        &self,
        name: Option<&str>,
        category: Option<&str>,
        filters: &Filters,
    ) -> DbResult<Vec<Product>> {
        debug!(
            name = ?name,
            category = ?category,
            sort = %filters.sort,
            "Listing products"
        );

        let base = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE (?1 IS NULL OR instr(lower(name), lower(?1)) > 0) \
               AND (?2 IS NULL OR category = ?2)"
        );
        let query = filters.build_query(&base, SortTarget::Products);

        let products = sqlx::query_as::<_, Product>(&query)
            .bind(name)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listing returned products");
        Ok(products)
    }

    /// Recomputes a product's average rating from its current reviews.
    ///
    /// One set-based UPDATE (see the module diagram): the mean of all
    /// current review ratings, 0 when none exist, computed and written in
    /// a single statement. Review mutations run the same statement inside
    /// their own transaction; call this directly only when repairing a
    /// product out of band.
    pub async fn recompute_average_rating(&self, product_id: i64) -> DbResult<()> {
        debug!(product_id = %product_id, "Recomputing average rating");

        let result = sqlx::query(RECOMPUTE_AVERAGE_SQL)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
