//! Product catalog route handlers.
//!
//! Listing and detail are public; create/update/delete are admin-only.
//! Image uploads happen out of band; the API stores validated paths under
//! `/uploads/`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use filigree_core::{Category, Material, Occasion, ProductGender, ProductId, Purity};

use crate::db::ProductRepository;
use crate::db::products::{NewProduct, ProductFilter, ProductPatch};
use crate::error::{AppError, Result};
use crate::middleware::auth::AdminAuth;
use crate::routes::AppJson;
use crate::state::AppState;

/// Product creation form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
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
    /// Image paths, default image first.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub gender: ProductGender,
    pub occasion: Occasion,
    pub warranty_in_months: Option<i32>,
    #[serde(default)]
    pub is_returnable: bool,
    pub return_policy_days: Option<i32>,
    #[serde(default)]
    pub featured: bool,
}

/// Partial product update form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
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

/// Catalog listing query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<Category>,
    pub sub_category: Option<String>,
    pub material: Option<Material>,
    pub purity: Option<Purity>,
    pub featured: Option<bool>,
    pub gender: Option<ProductGender>,
    pub is_returnable: Option<bool>,
    /// Comma-separated occasion list.
    pub occasion: Option<String>,
    pub search: Option<String>,
}

/// Create a product.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminAuth,
    AppJson(request): AppJson<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    validate_name_length(&request.name)?;
    validate_prices(request.mrp, request.selling_price)?;
    validate_weight(request.weight)?;
    validate_stock(request.stock)?;
    validate_purity(request.material, request.purity)?;
    validate_return_policy(request.is_returnable, request.return_policy_days)?;

    if request.images.is_empty() {
        return Err(AppError::validation("Default image is required"));
    }
    validate_image_paths(&request.images)?;

    let product = ProductRepository::new(state.pool())
        .create(&NewProduct {
            name: request.name,
            description: request.description,
            mrp: request.mrp,
            selling_price: request.selling_price,
            discount: request.discount,
            category: request.category,
            sub_category: request.sub_category,
            material: request.material,
            purity: request.purity,
            weight: request.weight,
            stock: request.stock,
            images: request.images,
            gender: request.gender,
            occasion: request.occasion,
            warranty_in_months: request.warranty_in_months,
            is_returnable: request.is_returnable,
            return_policy_days: request.return_policy_days,
            featured: request.featured,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "product": product } })),
    ))
}

/// Filtered, paginated catalog listing, newest first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let occasions = query
        .occasion
        .as_deref()
        .map(parse_occasion_list)
        .transpose()?;

    let filter = ProductFilter {
        category: query.category,
        sub_category: query.sub_category,
        material: query.material,
        purity: query.purity,
        featured: query.featured,
        gender: query.gender,
        is_returnable: query.is_returnable,
        occasions,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    let (products, total) = ProductRepository::new(state.pool())
        .list(&filter, page, limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "page": page,
        "totalPages": (total + limit - 1) / limit,
        "totalProducts": total,
        "data": products,
    })))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(json!({ "success": true, "data": product })))
}

/// Partial product update.
#[instrument(skip(state, request))]
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<ProductId>,
    AppJson(request): AppJson<UpdateProductRequest>,
) -> Result<impl IntoResponse> {
    if let Some(name) = &request.name {
        validate_name_length(name)?;
    }
    if let (Some(mrp), Some(selling_price)) = (request.mrp, request.selling_price) {
        validate_prices(mrp, selling_price)?;
    }
    if let Some(weight) = request.weight {
        validate_weight(weight)?;
    }
    if let Some(stock) = request.stock {
        validate_stock(stock)?;
    }
    if let Some(material) = request.material {
        validate_purity(material, request.purity)?;
    }
    if request.is_returnable == Some(true) && request.return_policy_days.is_none() {
        return Err(AppError::validation(
            "Return policy days are required if product is returnable",
        ));
    }
    if let Some(images) = &request.images {
        validate_image_paths(images)?;
    }

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .update(
            id,
            &ProductPatch {
                name: request.name,
                description: request.description,
                mrp: request.mrp,
                selling_price: request.selling_price,
                discount: request.discount,
                category: request.category,
                sub_category: request.sub_category,
                material: request.material,
                purity: request.purity,
                weight: request.weight,
                stock: request.stock,
                images: request.images,
                gender: request.gender,
                occasion: request.occasion,
                warranty_in_months: request.warranty_in_months,
                is_returnable: request.is_returnable,
                return_policy_days: request.return_policy_days,
                featured: request.featured,
            },
        )
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => AppError::not_found("Product not found"),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "success": true, "data": product })))
}

/// Delete a product, returning the deleted record.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => AppError::not_found("Product not found"),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Product deleted successfully",
        "data": product,
    })))
}

// =============================================================================
// Validation
// =============================================================================

fn validate_name_length(name: &str) -> Result<()> {
    if name.len() < 5 || name.len() > 100 {
        return Err(AppError::validation(
            "Product name must be 5-100 characters",
        ));
    }
    Ok(())
}

fn validate_prices(mrp: Decimal, selling_price: Decimal) -> Result<()> {
    if mrp < Decimal::ZERO || selling_price < Decimal::ZERO {
        return Err(AppError::validation("Price must be above 0"));
    }
    if selling_price > mrp {
        return Err(AppError::validation(
            "Selling price cannot be greater than MRP",
        ));
    }
    Ok(())
}

fn validate_weight(weight: Decimal) -> Result<()> {
    if weight <= Decimal::ZERO {
        return Err(AppError::validation("Weight must be greater than 0"));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<()> {
    if stock < 0 {
        return Err(AppError::validation("Stock must be 0 or more"));
    }
    Ok(())
}

fn validate_purity(material: Material, purity: Option<Purity>) -> Result<()> {
    if material.requires_purity() && purity.is_none() {
        return Err(AppError::validation(format!(
            "Purity is required for {material} products"
        )));
    }
    Ok(())
}

fn validate_return_policy(is_returnable: bool, return_policy_days: Option<i32>) -> Result<()> {
    if is_returnable && return_policy_days.is_none() {
        return Err(AppError::validation(
            "Return policy days are required when product is returnable",
        ));
    }
    Ok(())
}

/// Accept paths like `/uploads/ring.jpg` or `uploads/ring.webp`.
fn is_upload_path(path: &str) -> bool {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let Some(rest) = trimmed.strip_prefix("uploads/") else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }

    let lower = rest.to_lowercase();
    ["jpg", "jpeg", "png", "webp", "svg"]
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")) && lower.len() > ext.len() + 1)
}

fn validate_image_paths(images: &[String]) -> Result<()> {
    if images.iter().all(|path| is_upload_path(path)) {
        Ok(())
    } else {
        Err(AppError::validation(
            "Each image must be a valid image file stored under /uploads/",
        ))
    }
}

/// Parse a comma-separated occasion list.
fn parse_occasion_list(raw: &str) -> Result<Vec<Occasion>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Occasion>()
                .map_err(|_| AppError::validation(format!("Invalid occasion value: {s}")))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_selling_price_above_mrp_rejected() {
        assert!(validate_prices(Decimal::from(100), Decimal::from(120)).is_err());
        assert!(validate_prices(Decimal::from(120), Decimal::from(100)).is_ok());
        assert!(validate_prices(Decimal::from(100), Decimal::from(100)).is_ok());
    }

    #[test]
    fn test_purity_required_for_precious_metals() {
        assert!(validate_purity(Material::Gold, None).is_err());
        assert!(validate_purity(Material::Gold, Some(Purity::K22)).is_ok());
        assert!(validate_purity(Material::Pearl, None).is_ok());
    }

    #[test]
    fn test_return_policy_days_required_when_returnable() {
        assert!(validate_return_policy(true, None).is_err());
        assert!(validate_return_policy(true, Some(7)).is_ok());
        assert!(validate_return_policy(false, None).is_ok());
    }

    #[test]
    fn test_upload_path_validation() {
        assert!(is_upload_path("/uploads/ring.jpg"));
        assert!(is_upload_path("uploads/necklace.webp"));
        assert!(is_upload_path("/uploads/sets/bridal.PNG"));
        assert!(!is_upload_path("/images/ring.jpg"));
        assert!(!is_upload_path("/uploads/ring.gif"));
        assert!(!is_upload_path("/uploads/"));
        assert!(!is_upload_path("ring.jpg"));
    }

    #[test]
    fn test_parse_occasion_list() {
        let occasions = parse_occasion_list("Wedding, Party").unwrap();
        assert_eq!(occasions, vec![Occasion::Wedding, Occasion::Party]);
        assert!(parse_occasion_list("Wedding,BoardMeeting").is_err());
    }

    #[test]
    fn test_weight_and_stock_bounds() {
        assert!(validate_weight(Decimal::ZERO).is_err());
        assert!(validate_weight(Decimal::new(1, 1)).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_stock(0).is_ok());
    }
}
