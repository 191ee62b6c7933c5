//! Seed the catalog with a small set of sample products.
//!
//! For local development only: gives the storefront something to list and
//! the cart something to price without going through the admin API.

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tracing::info;

use filigree_core::{Category, Material, Occasion, ProductGender, Purity};

/// One seed row for the products table.
struct SeedProduct {
    name: &'static str,
    description: &'static str,
    mrp: Decimal,
    selling_price: Decimal,
    discount: Decimal,
    category: Category,
    material: Material,
    purity: Option<Purity>,
    weight: Decimal,
    stock: i32,
    image: &'static str,
    gender: ProductGender,
    occasion: Occasion,
}

fn sample_catalog() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Classic Gold Band Ring",
            description: "A plain 22k gold band with a mirror polish.",
            mrp: Decimal::from(18_500),
            selling_price: Decimal::from(17_200),
            discount: Decimal::from(7),
            category: Category::Rings,
            material: Material::Gold,
            purity: Some(Purity::K22),
            weight: Decimal::new(42, 1), // 4.2 g
            stock: 12,
            image: "/uploads/classic-gold-band.jpg",
            gender: ProductGender::Unisex,
            occasion: Occasion::DailyWear,
        },
        SeedProduct {
            name: "Silver Filigree Jhumka Earrings",
            description: "Handcrafted 925 silver jhumkas with filigree work.",
            mrp: Decimal::from(3_200),
            selling_price: Decimal::from(2_650),
            discount: Decimal::from(17),
            category: Category::Earrings,
            material: Material::Silver,
            purity: Some(Purity::F925),
            weight: Decimal::new(118, 1), // 11.8 g
            stock: 30,
            image: "/uploads/silver-filigree-jhumka.jpg",
            gender: ProductGender::Women,
            occasion: Occasion::Festive,
        },
        SeedProduct {
            name: "Pearl Drop Pendant Necklace",
            description: "Freshwater pearl drop on a fine silver chain.",
            mrp: Decimal::from(5_400),
            selling_price: Decimal::from(4_999),
            discount: Decimal::from(7),
            category: Category::Pendants,
            material: Material::Pearl,
            purity: None,
            weight: Decimal::new(65, 1), // 6.5 g
            stock: 18,
            image: "/uploads/pearl-drop-pendant.jpg",
            gender: ProductGender::Women,
            occasion: Occasion::Party,
        },
        SeedProduct {
            name: "Platinum Couple Bands Set",
            description: "Matched pair of 950 platinum wedding bands.",
            mrp: Decimal::from(64_000),
            selling_price: Decimal::from(59_900),
            discount: Decimal::from(6),
            category: Category::Rings,
            material: Material::Platinum,
            purity: Some(Purity::F950),
            weight: Decimal::new(96, 1), // 9.6 g
            stock: 5,
            image: "/uploads/platinum-couple-bands.jpg",
            gender: ProductGender::Unisex,
            occasion: Occasion::Wedding,
        },
    ]
}

/// Insert the sample catalog.
///
/// # Errors
///
/// Returns an error when `DATABASE_URL` is unset or an insert fails.
pub async fn products() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "DATABASE_URL not set")?;

    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let catalog = sample_catalog();
    info!(count = catalog.len(), "Seeding sample products");

    for product in &catalog {
        sqlx::query(
            "INSERT INTO products (name, description, mrp, selling_price, discount, category,
                 material, purity, weight, stock, images, gender, occasion, is_returnable)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, FALSE)",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.mrp)
        .bind(product.selling_price)
        .bind(product.discount)
        .bind(product.category.as_str())
        .bind(product.material.as_str())
        .bind(product.purity.map(|p| p.as_str().to_owned()))
        .bind(product.weight)
        .bind(product.stock)
        .bind(vec![product.image.to_owned()])
        .bind(product.gender.as_str())
        .bind(product.occasion.as_str())
        .execute(&pool)
        .await?;

        info!(name = product.name, "Seeded product");
    }

    info!("Seeding complete!");
    Ok(())
}
