//! Product repository for catalog operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};

use filigree_core::{Category, Material, Occasion, ProductGender, ProductId, Purity};

use super::RepositoryError;
use crate::models::product::Product;

/// Database row for a product.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    mrp: Decimal,
    selling_price: Decimal,
    discount: Decimal,
    category: String,
    sub_category: Option<String>,
    material: String,
    purity: Option<String>,
    weight: Decimal,
    stock: i32,
    ratings_average: Decimal,
    ratings_quantity: i32,
    images: Vec<String>,
    gender: String,
    occasion: String,
    warranty_in_months: Option<i32>,
    is_returnable: bool,
    return_policy_days: Option<i32>,
    featured: bool,
    created_at: DateTime<Utc>,
}

/// Column list matching [`ProductRow`].
const PRODUCT_COLUMNS: &str = "id, name, description, mrp, selling_price, discount, category, \
     sub_category, material, purity, weight, stock, ratings_average, ratings_quantity, images, \
     gender, occasion, warranty_in_months, is_returnable, return_policy_days, featured, created_at";

impl ProductRow {
    fn into_domain(self) -> Result<Product, RepositoryError> {
        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            mrp: self.mrp,
            selling_price: self.selling_price,
            discount: self.discount,
            category: self
                .category
                .parse::<Category>()
                .map_err(RepositoryError::DataCorruption)?,
            sub_category: self.sub_category,
            material: self
                .material
                .parse::<Material>()
                .map_err(RepositoryError::DataCorruption)?,
            purity: self
                .purity
                .as_deref()
                .map(str::parse::<Purity>)
                .transpose()
                .map_err(RepositoryError::DataCorruption)?,
            weight: self.weight,
            stock: self.stock,
            ratings_average: self.ratings_average,
            ratings_quantity: self.ratings_quantity,
            images: self.images,
            gender: self
                .gender
                .parse::<ProductGender>()
                .map_err(RepositoryError::DataCorruption)?,
            occasion: self
                .occasion
                .parse::<Occasion>()
                .map_err(RepositoryError::DataCorruption)?,
            warranty_in_months: self.warranty_in_months,
            is_returnable: self.is_returnable,
            return_policy_days: self.return_policy_days,
            featured: self.featured,
            created_at: self.created_at,
        })
    }
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub mrp: Decimal,
    pub selling_price: Decimal,
    pub discount: Decimal,
    pub category: Category,
    pub sub_category: Option<String>,
    pub material: Material,
    pub purity: Option<Purity>,
    pub weight: Decimal,
    pub stock: i32,
    pub images: Vec<String>,
    pub gender: ProductGender,
    pub occasion: Occasion,
    pub warranty_in_months: Option<i32>,
    pub is_returnable: bool,
    pub return_policy_days: Option<i32>,
    pub featured: bool,
}

/// Partial update for a product; `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub mrp: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub category: Option<Category>,
    pub sub_category: Option<String>,
    pub material: Option<Material>,
    pub purity: Option<Purity>,
    pub weight: Option<Decimal>,
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    pub gender: Option<ProductGender>,
    pub occasion: Option<Occasion>,
    pub warranty_in_months: Option<i32>,
    pub is_returnable: Option<bool>,
    pub return_policy_days: Option<i32>,
    pub featured: Option<bool>,
}

/// Filters for the public catalog listing.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub sub_category: Option<String>,
    pub material: Option<Material>,
    pub purity: Option<Purity>,
    pub featured: Option<bool>,
    pub gender: Option<ProductGender>,
    pub is_returnable: Option<bool>,
    pub occasions: Option<Vec<Occasion>>,
    pub search: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value fails validation.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_domain).transpose()
    }

    /// Get several products by ID, in the order given.
    ///
    /// Missing ids are silently skipped, matching the soft-reference
    /// semantics of wishlists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        let mut products = rows
            .into_iter()
            .map(ProductRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        products.sort_by_key(|p| ids.iter().position(|id| *id == p.id));

        Ok(products)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, description, mrp, selling_price, discount, category,
                 sub_category, material, purity, weight, stock, images, gender, occasion,
                 warranty_in_months, is_returnable, return_policy_days, featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.mrp)
        .bind(input.selling_price)
        .bind(input.discount)
        .bind(input.category.as_str())
        .bind(input.sub_category.as_deref())
        .bind(input.material.as_str())
        .bind(input.purity.map(|p| p.as_str().to_owned()))
        .bind(input.weight)
        .bind(input.stock)
        .bind(&input.images)
        .bind(input.gender.as_str())
        .bind(input.occasion.as_str())
        .bind(input.warranty_in_months)
        .bind(input.is_returnable)
        .bind(input.return_policy_days)
        .bind(input.featured)
        .fetch_one(self.pool)
        .await?;

        row.into_domain()
    }

    /// Apply a partial update; `None` fields keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                mrp = COALESCE($4, mrp),
                selling_price = COALESCE($5, selling_price),
                discount = COALESCE($6, discount),
                category = COALESCE($7, category),
                sub_category = COALESCE($8, sub_category),
                material = COALESCE($9, material),
                purity = COALESCE($10, purity),
                weight = COALESCE($11, weight),
                stock = COALESCE($12, stock),
                images = COALESCE($13, images),
                gender = COALESCE($14, gender),
                occasion = COALESCE($15, occasion),
                warranty_in_months = COALESCE($16, warranty_in_months),
                is_returnable = COALESCE($17, is_returnable),
                return_policy_days = COALESCE($18, return_policy_days),
                featured = COALESCE($19, featured)
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.mrp)
        .bind(patch.selling_price)
        .bind(patch.discount)
        .bind(patch.category.map(|c| c.as_str().to_owned()))
        .bind(patch.sub_category.as_deref())
        .bind(patch.material.map(|m| m.as_str().to_owned()))
        .bind(patch.purity.map(|p| p.as_str().to_owned()))
        .bind(patch.weight)
        .bind(patch.stock)
        .bind(patch.images.as_deref())
        .bind(patch.gender.map(|g| g.as_str().to_owned()))
        .bind(patch.occasion.map(|o| o.as_str().to_owned()))
        .bind(patch.warranty_in_months)
        .bind(patch.is_returnable)
        .bind(patch.return_policy_days)
        .bind(patch.featured)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_domain()
    }

    /// Delete a product, returning the deleted record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_domain()
    }

    /// List products, filtered and paginated, newest first.
    ///
    /// Returns the page of products plus the total count matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        fn apply_filter(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ProductFilter) {
            if let Some(category) = filter.category {
                qb.push(" AND category = ").push_bind(category.as_str());
            }
            if let Some(sub_category) = &filter.sub_category {
                qb.push(" AND sub_category = ").push_bind(sub_category.clone());
            }
            if let Some(material) = filter.material {
                qb.push(" AND material = ").push_bind(material.as_str());
            }
            if let Some(purity) = filter.purity {
                qb.push(" AND purity = ").push_bind(purity.as_str());
            }
            if let Some(featured) = filter.featured {
                qb.push(" AND featured = ").push_bind(featured);
            }
            if let Some(gender) = filter.gender {
                qb.push(" AND gender = ").push_bind(gender.as_str());
            }
            if let Some(is_returnable) = filter.is_returnable {
                qb.push(" AND is_returnable = ").push_bind(is_returnable);
            }
            if let Some(occasions) = &filter.occasions {
                let values: Vec<String> =
                    occasions.iter().map(|o| o.as_str().to_owned()).collect();
                qb.push(" AND occasion = ANY(").push_bind(values).push(")");
            }
            if let Some(search) = &filter.search {
                let pattern = format!("%{search}%");
                qb.push(" AND (name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR category ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR sub_category ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR occasion ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE TRUE");
        apply_filter(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(self.pool).await?;

        let mut qb =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"));
        apply_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind((page - 1) * limit);

        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool)
            .await?;

        let products = rows
            .into_iter()
            .map(ProductRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((products, total))
    }
}
