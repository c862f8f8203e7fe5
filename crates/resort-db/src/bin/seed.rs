//! # Seed Data Generator
//!
//! Populates a database with a sample resort menu for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p resort-db --bin seed
//! cargo run -p resort-db --bin seed -- --db ./data/resort.db
//! ```
//!
//! ## Generated Data
//! - 5 categories (Breakfast, Mezze, Grill, Desserts, Drinks)
//! - ~20 items, some with variants, some priced in LBP
//! - 3 promotions: a running happy hour, a category deal, an expired one

use chrono::{Duration, Utc};
use std::env;

use resort_core::validation::{validate_menu_item, validate_promotion};
use resort_core::{Category, Currency, DiscountType, MenuItem, Money, Promotion, Variant};
use resort_db::{Database, DbConfig};

/// (id, name, sort order)
const CATEGORIES: &[(&str, &str, i64)] = &[
    ("breakfast", "Breakfast", 1),
    ("mezze", "Mezze", 2),
    ("grill", "Grill", 3),
    ("desserts", "Desserts", 4),
    ("drinks", "Drinks", 5),
];

/// (id, category, name, price in cents, tags)
const DISHES: &[(&str, &str, &str, i64, &[&str])] = &[
    ("manousheh-zaatar", "breakfast", "Zaatar Manousheh", 350, &["vegan"]),
    ("manousheh-cheese", "breakfast", "Cheese Manousheh", 450, &["vegetarian"]),
    ("foul", "breakfast", "Foul Moudammas", 500, &["vegan"]),
    ("hummus", "mezze", "Hummus", 550, &["vegan"]),
    ("moutabal", "mezze", "Moutabal", 600, &["vegan"]),
    ("tabbouleh", "mezze", "Tabbouleh", 650, &["vegan"]),
    ("fattoush", "mezze", "Fattoush", 700, &["vegan"]),
    ("kibbeh", "mezze", "Fried Kibbeh", 800, &[]),
    ("shish-taouk", "grill", "Shish Taouk", 1400, &[]),
    ("kafta", "grill", "Kafta Platter", 1500, &[]),
    ("lamb-chops", "grill", "Lamb Chops", 2600, &[]),
    ("sea-bass", "grill", "Grilled Sea Bass", 2900, &["pescatarian"]),
    ("knefeh", "desserts", "Knefeh", 600, &["vegetarian"]),
    ("mouhalabieh", "desserts", "Mouhalabieh", 500, &["vegetarian"]),
    ("lemonade", "drinks", "Mint Lemonade", 450, &["vegan"]),
    ("jallab", "drinks", "Jallab", 500, &["vegan"]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./resort_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Resort Menu Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./resort_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Resort Menu Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    if !db.menu_items().list().await?.is_empty() {
        println!("⚠ Database already has menu items, skipping seed.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (id, name, order) in CATEGORIES {
        db.categories()
            .insert(&Category {
                id: id.to_string(),
                name: name.to_string(),
                sort_order: *order,
                description: None,
            })
            .await?;
    }
    println!("✓ {} categories", CATEGORIES.len());

    let mut items = Vec::new();
    for (id, category, name, price, tags) in DISHES {
        let mut item = MenuItem::new(*id, *name, Money::from_minor(*price));
        item.category_id = Some(category.to_string());
        item.dietary_tags = tags.iter().map(|t| t.to_string()).collect();
        items.push(item);
    }
    items.extend(extra_items());

    let mut inserted = 0;
    for item in &items {
        if let Err(e) = validate_menu_item(item) {
            eprintln!("Skipping {}: {}", item.id, e);
            continue;
        }
        if let Err(e) = db.menu_items().insert(item).await {
            eprintln!("Failed to insert {}: {}", item.id, e);
            continue;
        }
        inserted += 1;
    }
    println!("✓ {} menu items", inserted);

    for promo in promotions() {
        validate_promotion(&promo)?;
        db.promotions().insert(&promo).await?;
    }
    println!("✓ promotions");

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

/// Items that exercise variants, LBP pricing and allergens.
fn extra_items() -> Vec<MenuItem> {
    let mut wine = MenuItem::new("house-red", "House Red Wine", Money::from_minor(900));
    wine.category_id = Some("drinks".into());
    wine.variants = vec![
        Variant::new("Glass", Money::from_minor(700)),
        Variant::new("Bottle", Money::from_minor(2800)),
    ];
    wine.allergens.insert("sulphites".into());
    wine.promotion_ids = vec!["happy-hour".into()];

    let mut arak = MenuItem::new("arak", "Arak", Money::from_minor(600));
    arak.category_id = Some("drinks".into());
    arak.promotion_ids = vec!["happy-hour".into(), "old-deal".into()];

    let mut coffee = MenuItem::new("coffee", "Lebanese Coffee", Money::from_minor(150_000));
    coffee.currency = Currency::Lbp;
    coffee.category_id = Some("drinks".into());
    coffee.variants = vec![
        Variant::new("Single", Money::from_minor(150_000)).with_currency(Currency::Lbp),
        Variant::new("Double", Money::from_minor(250_000)).with_currency(Currency::Lbp),
    ];

    let mut platter = MenuItem::new("mezze-platter", "Mezze Platter", Money::from_minor(1800));
    platter.category_id = Some("mezze".into());
    platter.short_description = Some("Hummus, moutabal, tabbouleh and warm bread".into());
    platter.allergens = ["sesame", "gluten"].iter().map(|s| s.to_string()).collect();
    platter.promotion_ids = vec!["mezze-week".into()];

    vec![wine, arak, coffee, platter]
}

fn promotions() -> Vec<Promotion> {
    let now = Utc::now();
    vec![
        Promotion {
            id: "happy-hour".into(),
            name: "Sunset Happy Hour".into(),
            description: Some("20% off selected drinks".into()),
            discount_type: DiscountType::Percentage,
            discount_value: 2000,
            is_active: true,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(30),
            applicable_item_ids: vec![],
            applicable_category_ids: vec!["drinks".into()],
        },
        Promotion {
            id: "mezze-week".into(),
            name: "Mezze Week".into(),
            description: Some("$3 off the mezze platter".into()),
            discount_type: DiscountType::FixedAmount,
            discount_value: 300,
            is_active: true,
            start_date: now - Duration::days(2),
            end_date: now + Duration::days(5),
            applicable_item_ids: vec!["mezze-platter".into()],
            applicable_category_ids: vec![],
        },
        Promotion {
            id: "old-deal".into(),
            name: "Opening Week".into(),
            description: None,
            discount_type: DiscountType::FixedAmount,
            discount_value: 500,
            is_active: true,
            start_date: now - Duration::days(60),
            end_date: now - Duration::days(30),
            applicable_item_ids: vec![],
            applicable_category_ids: vec![],
        },
    ]
}
