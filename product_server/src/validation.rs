//! Request payload validation for the product endpoints.
//!
//! Payloads are accepted as raw JSON and checked field by field before anything touches the product store. Each field
//! stops at its first failed rule, so a field never collects more than one message. Unknown fields are ignored, and a
//! body that is not a JSON object is treated as an empty object.
//!
//! | Field         | Rules                                  |
//! |---------------|----------------------------------------|
//! | `name`        | required, string, at most 255 chars    |
//! | `description` | required, string                       |
//! | `price`       | required, numeric                      |
//! | `stock`       | required, integer, at least 0          |
//!
//! A JSON number with no fractional part, such as `10.0`, is an integer.
//!
//! For partial updates every field is optional, but a field that *is* present must pass the same rules.
use product_engine::db_types::{NewProduct, ProductUpdate};
use serde_json::{Map, Value};

use crate::errors::ValidationErrors;

const MAX_NAME_LENGTH: usize = 255;

pub fn validate_new_product(body: &Value) -> Result<NewProduct, ValidationErrors> {
    let mut fields = FieldValidator::new(body);
    let name = fields.string("name", Some(MAX_NAME_LENGTH));
    let description = fields.string("description", None);
    let price = fields.number("price");
    let stock = fields.non_negative_integer("stock");
    match (name, description, price, stock) {
        (Some(name), Some(description), Some(price), Some(stock)) if fields.is_ok() => {
            Ok(NewProduct::new(name, description, price, stock))
        },
        _ => Err(fields.into_errors()),
    }
}

pub fn validate_product_update(body: &Value) -> Result<ProductUpdate, ValidationErrors> {
    let mut fields = FieldValidator::new(body);
    let mut update = ProductUpdate::default();
    if fields.is_present("name") {
        update.name = fields.string("name", Some(MAX_NAME_LENGTH));
    }
    if fields.is_present("description") {
        update.description = fields.string("description", None);
    }
    if fields.is_present("price") {
        update.price = fields.number("price");
    }
    if fields.is_present("stock") {
        update.stock = fields.non_negative_integer("stock");
    }
    if fields.is_ok() {
        Ok(update)
    } else {
        Err(fields.into_errors())
    }
}

pub fn validate_stock_update(body: &Value) -> Result<i64, ValidationErrors> {
    let mut fields = FieldValidator::new(body);
    match fields.non_negative_integer("stock") {
        Some(stock) if fields.is_ok() => Ok(stock),
        _ => Err(fields.into_errors()),
    }
}

struct FieldValidator<'a> {
    body: Option<&'a Map<String, Value>>,
    errors: ValidationErrors,
}

impl<'a> FieldValidator<'a> {
    fn new(body: &'a Value) -> Self {
        Self { body: body.as_object(), errors: ValidationErrors::default() }
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    fn is_present(&self, field: &str) -> bool {
        self.body.map(|b| b.contains_key(field)).unwrap_or(false)
    }

    /// Returns the field value, or records a "required" failure if it is missing, null, blank or an empty collection.
    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.body.and_then(|b| b.get(field)).filter(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
            _ => true,
        });
        if value.is_none() {
            self.fail(field, "is required");
        }
        value
    }

    fn string(&mut self, field: &str, max_len: Option<usize>) -> Option<String> {
        let value = self.required(field)?;
        let Some(s) = value.as_str().map(str::trim) else {
            self.fail(field, "must be a string");
            return None;
        };
        match max_len {
            Some(max) if s.chars().count() > max => {
                self.fail(field, &format!("must not be greater than {max} characters"));
                None
            },
            _ => Some(s.to_string()),
        }
    }

    fn number(&mut self, field: &str) -> Option<f64> {
        let value = self.required(field)?;
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        };
        if n.is_none() {
            self.fail(field, "must be a number");
        }
        n
    }

    fn non_negative_integer(&mut self, field: &str) -> Option<i64> {
        let value = self.required(field)?;
        let n = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        let Some(n) = n else {
            self.fail(field, "must be an integer");
            return None;
        };
        if n < 0 {
            self.fail(field, "must be at least 0");
            return None;
        }
        Some(n)
    }

    fn fail(&mut self, field: &str, rule: &str) {
        self.errors.add(field, format!("The {field} field {rule}."));
    }
}

/// JSON numbers like `10.0` count as integers. Numeric strings must be written without a fraction.
fn integral(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}
