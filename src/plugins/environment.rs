// Environment injection: variables published to the code the engine builds

use crate::core::models::Environment;
use std::collections::BTreeMap;

pub const NODE_ENV: &str = "NODE_ENV";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentInjection {
    variables: BTreeMap<String, String>,
}

impl EnvironmentInjection {
    /// Publishes exactly `NODE_ENV`, set to the variant name
    pub fn for_environment(environment: Environment) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert(NODE_ENV.to_string(), environment.name().to_string());
        Self { variables }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// `process.env.KEY` → JS literal pairs the engine substitutes
    pub fn definitions(&self) -> Vec<(String, String)> {
        self.variables
            .iter()
            .map(|(key, value)| (format!("process.env.{}", key), format_value_for_js(value)))
            .collect()
    }
}

/// Booleans and finite numbers stay bare, anything else becomes a quoted
/// string. `NaN` and `inf` parse as floats but are not JS literals.
fn format_value_for_js(value: &str) -> String {
    if value == "true" || value == "false" {
        return value.to_string();
    }

    if value.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
        return value.to_string();
    }

    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
