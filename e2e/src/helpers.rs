use serde_json::Value;

/// Checks that every field in `expected` appears in `actual` with the same value.
///
/// Objects may carry extra fields, so a scenario only has to spell out the parts of a product it cares about. Arrays
/// are compared element by element and must have the same length. Numbers are compared by value, so `10` matches
/// `10.0`. On a mismatch, the error names the JSON path of the first difference.
pub fn json_contains(expected: &Value, actual: &Value) -> Result<(), String> {
    contains_at("$", expected, actual)
}

/// Parses both documents and calls [`json_contains`].
pub fn body_contains(expected: &str, body: &str) -> Result<(), String> {
    let expected = serde_json::from_str(expected).map_err(|e| format!("Expected value is not JSON. {e}"))?;
    let actual = serde_json::from_str(body).map_err(|e| format!("Response body is not JSON. {e}"))?;
    json_contains(&expected, &actual)
}

/// The `id` of a product in a response body, if there is one.
pub fn product_id(body: &str) -> Option<i64> {
    serde_json::from_str::<Value>(body).ok()?.get("id")?.as_i64()
}

fn contains_at(path: &str, expected: &Value, actual: &Value) -> Result<(), String> {
    match (expected, actual) {
        (Value::Object(fields), Value::Object(actual_fields)) => fields.iter().try_for_each(|(key, value)| {
            let path = format!("{path}.{key}");
            let actual = actual_fields.get(key).ok_or_else(|| format!("{path} is missing"))?;
            contains_at(&path, value, actual)
        }),
        (Value::Array(items), Value::Array(actual_items)) => {
            if items.len() != actual_items.len() {
                return Err(format!("{path} has {} items, expected {}", actual_items.len(), items.len()));
            }
            items.iter().zip(actual_items).enumerate().try_for_each(|(i, (item, actual))| {
                contains_at(&format!("{path}[{i}]"), item, actual)
            })
        },
        (Value::Number(a), Value::Number(b)) if a.as_f64() == b.as_f64() => Ok(()),
        (a, b) if a == b => Ok(()),
        (a, b) => Err(format!("{path} is {b}, expected {a}")),
    }
}
