//! # Repository Module
//!
//! Database repository implementations for the catalog service.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Request handler                                                       │
//! │       │                                                                 │
//! │       │  db.products().get_all(Some("wid"), None, &filters)            │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── insert(&self, new)                                                │
//! │  ├── get(&self, id)                                                    │
//! │  ├── get_all(&self, name, category, filters)                           │
//! │  └── recompute_average_rating(&self, product_id)                       │
//! │       │                                                                 │
//! │       │  SQL (values bound, ordering from the core allow-list)         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The one cross-repository edge: every ReviewRepository mutation        │
//! │  runs the product-owned average recompute inside its own transaction.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD, filtered listing, aggregate recompute
//! - [`review::ReviewRepository`] - Review CRUD, helpful counter, filtered listing

pub mod product;
pub mod review;
