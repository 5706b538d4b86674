// src/dtos/product.rs
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::product::{Category, NewProduct, Product, UnknownCategory};
use crate::repositories::ProductFilter;

// Column limits of the products table.
const NAME_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 250;
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 1_000_000_000_000;

/// Body accepted by `POST /products` and `PUT /products/{id}`.
///
/// Parsed from raw JSON rather than derived so every rejection carries a
/// message naming the offending field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl TryFrom<Value> for ProductRequest {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = value else {
            return Err(AppError::validation(
                "Invalid product: body of request contained bad or no data",
            ));
        };

        let name = string_field(&fields, "name")?;
        if name.trim().is_empty() {
            return Err(AppError::validation("Invalid product: name must not be empty"));
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(AppError::validation(format!(
                "Invalid product: name must be at most {NAME_MAX_CHARS} characters"
            )));
        }
        let description = string_field(&fields, "description")?;
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(AppError::validation(format!(
                "Invalid product: description must be at most {DESCRIPTION_MAX_CHARS} characters"
            )));
        }
        let price = price_field(&fields)?;
        let available = match required(&fields, "available")? {
            Value::Bool(b) => *b,
            other => {
                return Err(AppError::validation(format!(
                    "Invalid type for boolean [available]: {}",
                    json_type(other)
                )))
            }
        };
        // An unassigned category falls back to UNKNOWN.
        let category = match fields.get("category") {
            None | Some(Value::Null) => Category::default(),
            Some(Value::String(label)) => label
                .parse::<Category>()
                .map_err(|UnknownCategory(label)| {
                    AppError::validation(format!("Invalid attribute: '{label}'"))
                })?,
            Some(other) => {
                return Err(AppError::validation(format!(
                    "Invalid type for string [category]: {}",
                    json_type(other)
                )))
            }
        };

        Ok(Self { name, description, price, available, category })
    }
}

impl From<ProductRequest> for NewProduct {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            available: req.available,
            category: req.category,
        }
    }
}

fn required<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a Value, AppError> {
    match fields.get(key) {
        None | Some(Value::Null) => Err(AppError::validation(format!("Invalid product: missing {key}"))),
        Some(v) => Ok(v),
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Result<String, AppError> {
    match required(fields, key)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(AppError::validation(format!(
            "Invalid type for string [{key}]: {}",
            json_type(other)
        ))),
    }
}

fn price_field(fields: &Map<String, Value>) -> Result<Decimal, AppError> {
    let raw = match required(fields, "price")? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(AppError::validation(format!(
                "Invalid type for decimal [price]: {}",
                json_type(other)
            )))
        }
    };
    let mut price = parse_decimal(&raw)
        .ok_or_else(|| AppError::validation(format!("Invalid product: price '{raw}' is not a number")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::validation("Invalid product: price must not be negative"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(AppError::validation(format!(
            "Invalid product: price '{raw}' has more than {PRICE_SCALE} decimal places"
        )));
    }
    if price >= Decimal::from(PRICE_LIMIT) {
        return Err(AppError::validation(format!(
            "Invalid product: price must be less than {PRICE_LIMIT}"
        )));
    }
    // Every store hands back the same representation, e.g. 34.5 -> "34.50".
    price.rescale(PRICE_SCALE);
    Ok(price)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Query string of `GET /products`. Every parameter is optional and an empty
/// value counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQueryParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
    pub price: Option<String>,
}

impl TryFrom<ProductQueryParams> for ProductFilter {
    type Error = AppError;

    fn try_from(params: ProductQueryParams) -> Result<Self, Self::Error> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        let category = present(params.category)
            .map(|c| {
                c.to_uppercase()
                    .parse::<Category>()
                    .map_err(|_| AppError::validation(format!("Invalid category: {c}")))
            })
            .transpose()?;
        let available = present(params.available).map(|a| a.to_lowercase() == "true");
        let price = present(params.price)
            .map(|p| {
                parse_decimal(p.trim())
                    .ok_or_else(|| AppError::validation(format!("Invalid price format: {p}")))
            })
            .transpose()?;

        Ok(ProductFilter {
            name: present(params.name),
            category,
            available,
            price,
            ..ProductFilter::default()
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

// Convert from Model to Response DTO
impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            available: product.available,
            category: product.category,
        }
    }
}
