//! # Seed Data Generator
//!
//! Populates the database with test products and reviews for development.
//!
//! ## Usage
//! ```bash
//! # Generate 60 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Data
//! Creates products across a fixed category list, each with 0-5 reviews.
//! Everything goes through the repositories, so every seeded product's
//! average_rating is consistent with its reviews from the start.
//!
//! Values are derived from the running index (no RNG dependency), so two
//! runs against fresh databases produce identical data.

use std::env;

use catalog_core::{NewProduct, NewReview};
use catalog_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// Product name stems per category.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "tools",
        &[
            "Widget", "Sprocket", "Wrench Set", "Claw Hammer", "Tape Measure", "Utility Knife",
            "Cordless Drill", "Socket Set", "Level", "Stud Finder",
        ],
    ),
    (
        "kitchen",
        &[
            "Chef Knife", "Cutting Board", "Cast Iron Pan", "Mixing Bowl", "Peeler",
            "Garlic Press", "Kettle", "French Press", "Colander", "Whisk",
        ],
    ),
    (
        "outdoors",
        &[
            "Camping Lantern", "Sleeping Bag", "Trekking Poles", "Water Filter", "Dry Bag",
            "Headlamp", "Camp Stove", "Folding Chair", "Cooler", "Hammock",
        ],
    ),
    (
        "electronics",
        &[
            "Bluetooth Speaker", "Power Bank", "USB Hub", "Webcam", "Mechanical Keyboard",
            "Wireless Mouse", "Monitor Arm", "Desk Lamp", "Cable Organizer", "Phone Stand",
        ],
    ),
];

/// Review authors cycled through by index.
const AUTHORS: &[&str] = &[
    "alex", "sam", "jordan", "casey", "riley", "morgan", "taylor", "quinn",
];

/// Review text stems cycled through by index.
const COMMENTS: &[&str] = &[
    "Does exactly what it says. No complaints so far.",
    "Solid build quality for the price.",
    "Arrived quickly, works as described.",
    "Decent, but I expected a bit more for the money.",
    "Replaced an older one I had for years. Happy with it.",
    "Not great, not terrible. Gets the job done.",
    "Would buy again. Already recommended it to a friend.",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./catalog_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Catalog Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let mut reviews_written = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let seed = category_idx * 100 + name_idx;
            let product = generate_product(category, name, seed);

            let inserted = match db.products().insert(&product).await {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }
            };

            // 0-5 reviews per product, ratings spread across the range
            let review_count = (seed * 7) % 6;
            for r in 0..review_count {
                let review = generate_review(inserted.id, seed + r);
                db.reviews().insert(&review).await?;
                reviews_written += 1;
            }

            generated += 1;

            if generated % 20 == 0 {
                println!("  Generated {} products...", generated);
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} products and {} reviews in {:?}",
        generated, reviews_written, elapsed
    );

    // Spot-check the derived column
    println!();
    println!("Verifying aggregates...");
    let listed = db
        .products()
        .get_all(None, None, &catalog_core::Filters::new("rating", 5, 0))
        .await?;
    for p in &listed {
        println!("  {:<24} avg {:.2}", p.name, p.average_rating);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product from its running index.
fn generate_product(category: &str, name: &str, seed: usize) -> NewProduct {
    let description = if seed % 3 == 0 {
        None
    } else {
        Some(format!("{} — dependable {} gear.", name, category))
    };

    NewProduct {
        name: name.to_string(),
        description,
        category: category.to_string(),
        image_url: format!(
            "https://cdn.example.com/img/{}-{:03}.png",
            category.to_lowercase(),
            seed
        ),
    }
}

/// Generates a single review from its running index.
fn generate_review(product_id: i64, seed: usize) -> NewReview {
    NewReview {
        product_id,
        content: COMMENTS[seed % COMMENTS.len()].to_string(),
        author: AUTHORS[seed % AUTHORS.len()].to_string(),
        rating: (1 + (seed * 13) % 5) as i64,
    }
}
