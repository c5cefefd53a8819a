//! # Review Repository
//!
//! Database operations for reviews.
//!
//! ## Mutation Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │            Every Review Mutation Is One Transaction                     │
//! │                                                                         │
//! │  insert / update / delete                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  ├── review write (INSERT / UPDATE / DELETE)                           │
//! │  ├── UPDATE products SET average_rating = (SELECT COALESCE(AVG..))     │
//! │  └── COMMIT                                                            │
//! │       │                                                                 │
//! │       ├── any step fails → rollback, nothing happened                  │
//! │       └── commit → review set and derived average changed together     │
//! │                                                                         │
//! │  There is no state where the review landed but the product still       │
//! │  shows the old average.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The recompute statement itself lives in the product module
//! (`recompute_average_rating_on`); this repository only decides *when* it
//! runs and on which connection.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::product::recompute_average_rating_on;
use catalog_core::filter::{Filters, SortTarget};
use catalog_core::{NewReview, Review};

/// Shared column list so every SELECT decodes into the same `Review` shape.
const REVIEW_COLUMNS: &str =
    "id, product_id, content, author, rating, helpful_count, created_at, updated_at";

/// Repository for review database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ReviewRepository::new(pool);
///
/// // Reviews of one product, most helpful first
/// let reviews = repo
///     .get_all(Some(42), &Filters::new("helpful", 10, 0))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    /// Creates a new ReviewRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Inserts a new review and recomputes the product's average rating.
    ///
    /// Rating range and non-empty content/author are the caller's job via
    /// `catalog_core::validation`. The referenced product must exist: the
    /// foreign key rejects the insert with `DbError::ForeignKeyViolation`
    /// otherwise, and the transaction leaves nothing behind.
    ///
    /// ## Returns
    /// * `Ok(Review)` - Inserted review with the database-assigned id and
    ///   `helpful_count = 0`
    pub async fn insert(&self, new: &NewReview) -> DbResult<Review> {
        debug!(product_id = %new.product_id, rating = %new.rating, "Inserting review");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO reviews \
             (product_id, content, author, rating, helpful_count, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        )
        .bind(new.product_id)
        .bind(&new.content)
        .bind(&new.author)
        .bind(new.rating)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();

        recompute_average_rating_on(&mut tx, new.product_id).await?;

        tx.commit().await?;

        Ok(Review {
            id,
            product_id: new.product_id,
            content: new.content.clone(),
            author: new.author.clone(),
            rating: new.rating,
            helpful_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a review by its ID.
    ///
    /// ## Returns
    /// * `Ok(Review)` - Review found
    /// * `Err(DbError::NotFound)` - No such review, distinct from storage
    ///   faults
    pub async fn get(&self, id: i64) -> DbResult<Review> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        review.ok_or_else(|| DbError::not_found("Review", id))
    }

    /// Updates an existing review and recomputes the product's average.
    ///
    /// Overwrites content, author and rating, and refreshes `updated_at`.
    /// `product_id` is immutable: the recompute targets the *stored* owner,
    /// read inside the transaction, so a stale struct field cannot point
    /// the recompute at the wrong product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Review doesn't exist
    pub async fn update(&self, review: &Review) -> DbResult<()> {
        debug!(id = %review.id, rating = %review.rating, "Updating review");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let product_id: Option<i64> =
            sqlx::query_scalar("SELECT product_id FROM reviews WHERE id = ?1")
                .bind(review.id)
                .fetch_optional(&mut *tx)
                .await?;

        let product_id = product_id.ok_or_else(|| DbError::not_found("Review", review.id))?;

        sqlx::query(
            "UPDATE reviews SET \
                content = ?2, \
                author = ?3, \
                rating = ?4, \
                updated_at = ?5 \
             WHERE id = ?1",
        )
        .bind(review.id)
        .bind(&review.content)
        .bind(&review.author)
        .bind(review.rating)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        recompute_average_rating_on(&mut tx, product_id).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Deletes a review and recomputes the product's average.
    ///
    /// ## Returns
    /// * `Ok(())` - Deleted
    /// * `Err(DbError::NotFound)` - Review doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting review");

        let mut tx = self.pool.begin().await?;

        let product_id: Option<i64> =
            sqlx::query_scalar("SELECT product_id FROM reviews WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let product_id = product_id.ok_or_else(|| DbError::not_found("Review", id))?;

        sqlx::query("DELETE FROM reviews WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        recompute_average_rating_on(&mut tx, product_id).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Increments a review's helpful counter.
    ///
    /// Delta update in one statement: two concurrent readers marking the
    /// same review helpful both land, no read-modify-write race. The
    /// counter never changes the product average, so no recompute here.
    ///
    /// ## Returns
    /// * `Ok(())` - Counter incremented
    /// * `Err(DbError::NotFound)` - Review doesn't exist
    pub async fn increment_helpful(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Incrementing helpful count");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE reviews SET \
                helpful_count = helpful_count + 1, \
                updated_at = ?2 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Review", id));
        }

        Ok(())
    }

    /// Lists reviews, optionally scoped to one product.
    ///
    /// ## Arguments
    /// * `product_id` - `Some(id)` filters to that product; `None` spans
    ///   all products
    /// * `filters` - Sort/limit/offset. Sort key `helpful` orders by
    ///   `helpful_count DESC`, `date` (or default) by `created_at DESC`;
    ///   ties always break by `id DESC`.
    ///
    /// No match is an empty vec, not an error.
    pub async fn get_all(
        &self,
        product_id: Option<i64>,
        filters: &Filters,
    ) -> DbResult<Vec<Review>> {
        debug!(product_id = ?product_id, sort = %filters.sort, "Listing reviews");

        let base = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             WHERE (?1 IS NULL OR product_id = ?1)"
        );
        let query = filters.build_query(&base, SortTarget::Reviews);

        let reviews = sqlx::query_as::<_, Review>(&query)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = reviews.len(), "Listing returned reviews");
        Ok(reviews)
    }

    /// Counts total reviews (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use catalog_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str) -> i64 {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                description: None,
                category: "tools".to_string(),
                image_url: "https://cdn.example.com/p.png".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn review_for(product_id: i64, rating: i64) -> NewReview {
        NewReview {
            product_id,
            content: "solid".to_string(),
            author: "sam".to_string(),
            rating,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get_round_trip() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Widget").await;
        let repo = db.reviews();

        let new = NewReview {
            product_id,
            content: "Does what it says.".to_string(),
            author: "alex".to_string(),
            rating: 4,
        };
        let inserted = repo.insert(&new).await.unwrap();
        assert!(inserted.id > 0);
        assert_eq!(inserted.helpful_count, 0);

        let fetched = repo.get(inserted.id).await.unwrap();
        assert_eq!(fetched.product_id, product_id);
        assert_eq!(fetched.content, new.content);
        assert_eq!(fetched.author, new.author);
        assert_eq!(fetched.rating, new.rating);
        assert_eq!(fetched.helpful_count, 0);
    }

    #[tokio::test]
    async fn test_insert_for_missing_product_is_rejected() {
        let db = test_db().await;

        let err = db.reviews().insert(&review_for(9999, 4)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // The rejected transaction left nothing behind
        assert_eq!(db.reviews().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_average_follows_insert_and_delete() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Widget").await;
        let products = db.products();
        let reviews = db.reviews();

        // First review: average jumps straight to its rating
        let five = reviews.insert(&review_for(product_id, 5)).await.unwrap();
        let p = products.get(product_id).await.unwrap();
        assert!((p.average_rating - 5.0).abs() < 1e-9);

        // Second review: mean of the pair
        reviews.insert(&review_for(product_id, 3)).await.unwrap();
        let p = products.get(product_id).await.unwrap();
        assert!((p.average_rating - 4.0).abs() < 1e-9);

        // Deleting the 5 leaves the mean of what remains
        reviews.delete(five.id).await.unwrap();
        let p = products.get(product_id).await.unwrap();
        assert!((p.average_rating - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_average_is_zero_after_last_review_deleted() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Widget").await;
        let reviews = db.reviews();

        let only = reviews.insert(&review_for(product_id, 2)).await.unwrap();
        reviews.delete(only.id).await.unwrap();

        let p = db.products().get(product_id).await.unwrap();
        assert_eq!(p.average_rating, 0.0);
    }

    #[tokio::test]
    async fn test_update_rating_recomputes_average() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Widget").await;
        let reviews = db.reviews();

        let inserted = reviews.insert(&review_for(product_id, 2)).await.unwrap();

        let mut changed = reviews.get(inserted.id).await.unwrap();
        changed.rating = 5;
        changed.content = "Changed my mind, excellent.".to_string();
        reviews.update(&changed).await.unwrap();

        let fetched = reviews.get(inserted.id).await.unwrap();
        assert_eq!(fetched.rating, 5);
        assert_eq!(fetched.content, "Changed my mind, excellent.");

        let p = db.products().get(product_id).await.unwrap();
        assert!((p.average_rating - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_mean_of_many_ratings() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Widget").await;
        let reviews = db.reviews();

        let ratings = [1, 2, 3, 4, 5, 5];
        for rating in ratings {
            reviews.insert(&review_for(product_id, rating)).await.unwrap();
        }

        let expected = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
        let p = db.products().get(product_id).await.unwrap();
        assert!((p.average_rating - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_get_update_delete_missing_are_not_found() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Widget").await;
        let reviews = db.reviews();

        assert!(reviews.get(404).await.unwrap_err().is_not_found());
        assert!(reviews.delete(404).await.unwrap_err().is_not_found());
        assert!(reviews
            .increment_helpful(404)
            .await
            .unwrap_err()
            .is_not_found());

        let mut ghost = reviews.insert(&review_for(product_id, 3)).await.unwrap();
        reviews.delete(ghost.id).await.unwrap();
        ghost.rating = 4;
        assert!(reviews.update(&ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_all_scoped_and_wildcard() {
        let db = test_db().await;
        let widget = seed_product(&db, "Widget").await;
        let gadget = seed_product(&db, "Gadget").await;
        let reviews = db.reviews();

        reviews.insert(&review_for(widget, 4)).await.unwrap();
        reviews.insert(&review_for(widget, 5)).await.unwrap();
        reviews.insert(&review_for(gadget, 3)).await.unwrap();

        let scoped = reviews
            .get_all(Some(widget), &Filters::default())
            .await
            .unwrap();
        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().all(|r| r.product_id == widget));

        let all = reviews.get_all(None, &Filters::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let none = reviews
            .get_all(Some(9999), &Filters::default())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_helpful_sort_with_id_tie_break() {
        let db = test_db().await;
        let widget = seed_product(&db, "Widget").await;
        let gadget = seed_product(&db, "Gadget").await;
        let reviews = db.reviews();

        let a = reviews.insert(&review_for(widget, 4)).await.unwrap();
        let b = reviews.insert(&review_for(gadget, 3)).await.unwrap();
        let c = reviews.insert(&review_for(widget, 5)).await.unwrap();

        // b gets two helpful votes, a gets one, c none
        reviews.increment_helpful(b.id).await.unwrap();
        reviews.increment_helpful(b.id).await.unwrap();
        reviews.increment_helpful(a.id).await.unwrap();

        let listed = reviews
            .get_all(None, &Filters::new("helpful", 10, 0))
            .await
            .unwrap();

        let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);

        let counts: Vec<i64> = listed.iter().map(|r| r.helpful_count).collect();
        assert_eq!(counts, vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn test_helpful_tie_breaks_by_id_desc() {
        let db = test_db().await;
        let widget = seed_product(&db, "Widget").await;
        let reviews = db.reviews();

        let first = reviews.insert(&review_for(widget, 4)).await.unwrap();
        let second = reviews.insert(&review_for(widget, 5)).await.unwrap();

        // Equal helpful_count (both 0): higher id lists first
        let listed = reviews
            .get_all(None, &Filters::new("helpful", 10, 0))
            .await
            .unwrap();
        let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_get_all_pagination() {
        let db = test_db().await;
        let widget = seed_product(&db, "Widget").await;
        let reviews = db.reviews();

        for rating in [1, 2, 3, 4, 5] {
            reviews.insert(&review_for(widget, rating)).await.unwrap();
        }

        let page1 = reviews
            .get_all(Some(widget), &Filters::new("date", 2, 0))
            .await
            .unwrap();
        let page2 = reviews
            .get_all(Some(widget), &Filters::new("date", 2, 2))
            .await
            .unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page2.len(), 2);

        // Pages never overlap
        assert!(page1.iter().all(|r| page2.iter().all(|s| s.id != r.id)));
    }
}
