// stockroom/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub sku: String,
  /// Stored as SQLite `REAL`, rounded to whole cents on every write.
  pub price: f64,
  pub quantity: i64,
  pub description: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Payload for create and update. Every field except `description` is
/// required; missing fields are reported as validation errors rather than
/// deserialization failures.
///
/// `price` and `quantity` are kept as raw JSON so that numeric strings
/// (`"12.50"`, `"3"`) are accepted and any other type surfaces as an error on
/// that field. [`ProductInput::check`] runs the numeric rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductInput {
  #[validate(
    required(message = "The name field is required."),
    length(min = 1, max = 255, message = "The name must be between 1 and 255 characters.")
  )]
  pub name: Option<String>,

  // Uniqueness needs the store and is checked by the catalog.
  #[validate(
    required(message = "The sku field is required."),
    length(min = 1, message = "The sku field is required.")
  )]
  pub sku: Option<String>,

  #[validate(required(message = "The price field is required."))]
  pub price: Option<Value>,

  #[validate(required(message = "The quantity field is required."))]
  pub quantity: Option<Value>,

  pub description: Option<String>,
}

/// Fields of a `ProductInput` that passed [`ProductInput::check`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProduct {
  pub name: String,
  pub sku: String,
  pub price: f64,
  pub quantity: i64,
  pub description: Option<String>,
}

/// A JSON number or a string holding one. Non-finite values are rejected.
fn decimal_of(raw: &Value) -> Option<f64> {
  let value = match raw {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  value.filter(|v| v.is_finite())
}

/// A JSON integer or a string holding one. `1.5` and `"1.5"` are not integers.
fn integer_of(raw: &Value) -> Option<i64> {
  match raw {
    Value::Number(n) => n.as_i64(),
    Value::String(s) => s.trim().parse::<i64>().ok(),
    _ => None,
  }
}

/// Prices are kept to whole cents.
fn to_cents(price: f64) -> f64 {
  (price * 100.0).round() / 100.0
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
  let mut error = ValidationError::new(code);
  error.message = Some(Cow::Borrowed(message));
  error
}

impl ProductInput {
  /// Runs the derived field rules plus the numeric rules for `price` and
  /// `quantity`, collecting every violation.
  pub fn check(&self) -> Result<(), ValidationErrors> {
    let mut errors = match self.validate() {
      Ok(()) => ValidationErrors::new(),
      Err(errors) => errors,
    };

    if let Some(raw) = &self.price {
      match decimal_of(raw) {
        None => errors.add("price", field_error("numeric", "The price must be a number.")),
        Some(price) if price < 0.0 => errors.add("price", field_error("range", "The price must be at least 0.")),
        Some(_) => {}
      }
    }
    if let Some(raw) = &self.quantity {
      match integer_of(raw) {
        None => errors.add("quantity", field_error("integer", "The quantity must be an integer.")),
        Some(quantity) if quantity < 0 => {
          errors.add("quantity", field_error("range", "The quantity must be at least 0."))
        }
        Some(_) => {}
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }

  /// Converts the input once [`ProductInput::check`] has passed. Returns
  /// `None` if a required field is missing or not numeric.
  pub fn into_valid(self) -> Option<ValidProduct> {
    let price = to_cents(decimal_of(self.price.as_ref()?)?);
    let quantity = integer_of(self.quantity.as_ref()?)?;
    Some(ValidProduct {
      name: self.name?,
      sku: self.sku?,
      price,
      quantity,
      description: self.description,
    })
  }
}

/// Row count and the id the store will hand out next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SequenceStatus {
  pub count: i64,
  pub next_id: i64,
}
