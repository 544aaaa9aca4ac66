//! Schema sanity checks on raw service output.
//!
//! Mismatches are advisory: projection always succeeds, so these are only
//! logged so operators can see when the service drifts from the schema.

use serde_json::Value;

/// Collect every schema mismatch in `instance`, formatted with its instance path.
///
/// # Examples
///
/// ```
/// use venue_enrichment::validation::collect_schema_warnings;
/// use serde_json::json;
///
/// let schema = json!({
///     "type": "object",
///     "properties": {"name": {"type": "string"}},
///     "required": ["name"]
/// });
///
/// assert!(collect_schema_warnings(&schema, &json!({"name": "The Anthem"})).is_empty());
/// assert!(!collect_schema_warnings(&schema, &json!({})).is_empty());
/// ```
#[must_use]
pub fn collect_schema_warnings(schema: &Value, instance: &Value) -> Vec<String> {
    let validator = match jsonschema::validator_for(schema) {
        Ok(validator) => validator,
        Err(err) => return vec![format!("target schema does not compile: {err}")],
    };

    validator
        .iter_errors(instance)
        .map(|mismatch| {
            let pointer = mismatch.instance_path.to_string();
            let location = if pointer.is_empty() { "(root)" } else { pointer.as_str() };
            format!("{location}: {mismatch}")
        })
        .collect()
}
