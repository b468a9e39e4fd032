//! Product endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Product, ProductDraft, ProductPage};
use validator::{Validate, ValidationError, ValidationErrors};

use super::query::ListParams;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Create / full-update payload
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_prices"))]
pub struct ProductRequest {
    #[validate(length(min = 6, max = 255))]
    pub name: String,
    #[validate(length(min = 32, max = 1000))]
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock: i64,
    #[validate(range(min = 1))]
    pub category_id: i64,
    #[validate(range(min = 1))]
    pub brand_id: i64,
}

fn validate_prices(req: &ProductRequest) -> Result<(), ValidationError> {
    if req.price < Decimal::ONE {
        return Err(ValidationError::new("price_min").with_message("price must be at least 1".into()));
    }
    if let Some(sale) = req.sale_price {
        if sale < Decimal::ONE {
            return Err(ValidationError::new("sale_price_min")
                .with_message("sale_price must be at least 1".into()));
        }
        if sale > req.price {
            return Err(ValidationError::new("sale_price_above_price")
                .with_message("sale_price must not exceed price".into()));
        }
    }
    Ok(())
}

impl ProductRequest {
    fn into_draft(self) -> Result<ProductDraft, AppError> {
        self.validate().map_err(validation_failed)?;
        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            sale_price: self.sale_price,
            stock: self.stock,
            category_id: self.category_id,
            brand_id: self.brand_id,
        })
    }
}

/// Flatten validator output into one message plus per-field details
fn validation_failed(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    fields.sort();

    let err = AppError::validation(if fields.is_empty() {
        "invalid product payload".to_string()
    } else {
        fields.join("; ")
    });
    match serde_json::to_value(&errors) {
        Ok(details) => err.with_detail("errors", details),
        Err(_) => err,
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_request(format!("invalid product id '{raw}'")))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<ProductPage> {
    let query = params.into_query()?;
    let page = state.catalog.list_products(&query).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let id = parse_id(&id)?;
    let product = state.catalog.get_product(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    let draft = req.into_draft()?;
    let product = state.catalog.create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Product> {
    let id = parse_id(&id)?;
    let draft = req.into_draft()?;
    let product = state.catalog.update_product(id, draft).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProductRequest {
        ProductRequest {
            name: "Trail Runner".to_string(),
            description: Some("A lightweight trail shoe with a grippy outsole".to_string()),
            price: Decimal::new(12000, 2),
            sale_price: Some(Decimal::new(9900, 2)),
            stock: 3,
            category_id: 1,
            brand_id: 1,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
        let mut req = request();
        req.description = None;
        req.sale_price = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_length_rules() {
        let mut req = request();
        req.name = "Shoe".to_string();
        let err = req.into_draft().unwrap_err();
        assert!(err.message.contains("name"), "{}", err.message);

        let mut req = request();
        req.description = Some("too short".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_numeric_rules() {
        let mut req = request();
        req.stock = -1;
        assert!(req.validate().is_err());

        let mut req = request();
        req.category_id = 0;
        assert!(req.validate().is_err());

        let mut req = request();
        req.price = Decimal::new(50, 2);
        req.sale_price = None;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_sale_price_not_above_price() {
        let mut req = request();
        req.sale_price = Some(Decimal::new(13000, 2));
        assert!(req.validate().is_err());

        let mut req = request();
        req.sale_price = Some(req.price);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("forty-two").is_err());
    }
}
