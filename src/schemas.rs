//! Request and response bodies.
//!
//! Input types derive `Validate` and are extracted through
//! [`ValidatedJson`](crate::middleware::validation::ValidatedJson), so a
//! handler only ever sees values that already satisfy the field rules.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entities::{category, product, user};

static ROLE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(buyer|seller)$").unwrap());

#[derive(Deserialize, Validate, Clone, Debug)]
pub struct CategoryCreate {
    #[validate(length(min = 3, max = 50, message = "Category name must be 3-50 characters"))]
    pub name: String,
    pub parent_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub is_active: bool,
}

impl From<category::Model> for Category {
    fn from(value: category::Model) -> Self {
        Category {
            id: value.id,
            name: value.name,
            parent_id: value.parent_id,
            is_active: value.is_active,
        }
    }
}

#[derive(Deserialize, Validate, Clone, Debug)]
pub struct ProductCreate {
    #[validate(length(min = 3, max = 100, message = "Product name must be 3-100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(length(max = 200, message = "Image URL must be at most 200 characters"))]
    pub image_url: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    pub category_id: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock: i32,
    pub category_id: i32,
    pub is_active: bool,
}

impl From<product::Model> for Product {
    fn from(value: product::Model) -> Self {
        Product {
            id: value.id,
            name: value.name,
            description: value.description,
            price: money(value.price),
            image_url: value.image_url,
            stock: value.stock,
            category_id: value.category_id,
            is_active: value.is_active,
        }
    }
}

#[derive(Deserialize, Validate, Clone, Debug)]
pub struct UserCreate {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default = "default_role")]
    #[validate(regex(path = *ROLE_REGEX, message = "Role must be \"buyer\" or \"seller\""))]
    pub role: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub role: user::Role,
}

impl From<user::Model> for User {
    fn from(value: user::Model) -> Self {
        User {
            id: value.id,
            email: value.email,
            is_active: value.is_active,
            role: value.role,
        }
    }
}

impl UserCreate {
    /// Role after `validate()` has restricted it to "buyer" or "seller".
    pub fn parsed_role(&self) -> user::Role {
        if self.role == "seller" {
            user::Role::Seller
        } else {
            user::Role::Buyer
        }
    }
}

fn default_role() -> String {
    "buyer".to_string()
}

/// Strictly positive with at most two fractional digits.
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.is_zero() {
        return Err(ValidationError::new("price_not_positive")
            .with_message("Price must be greater than 0".into()));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price_decimal_places")
            .with_message("Price must have at most 2 decimal places".into()));
    }
    Ok(())
}

// SQLite hands decimals back through f64, so pin the scale on the way out.
fn money(value: Decimal) -> Decimal {
    let mut value = value.round_dp(2);
    value.rescale(2);
    value
}
