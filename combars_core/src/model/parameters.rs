//! Parsing of the Antimony parameter block

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Right hand side of a parameter declaration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    /// Plain numeric initialization, `k1 = 0.1;`
    Number(f64),
    /// Assignment rule or other non-numeric right hand side, `k1 := kA*kB;`
    Expression(String),
}

/// Parse `name = value;` and `name := value;` lines into an ordered map
///
/// Blank lines and lines without an assignment are skipped. Values that do
/// not parse as a number are kept as textual expressions.
pub fn parse_parameter_block(block: &str) -> IndexMap<String, ParameterValue> {
    let mut parameters = IndexMap::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        // `:=` must be tried before `=`, which it contains
        let (name, value) = match line.split_once(":=").or_else(|| line.split_once('=')) {
            Some((name, value)) => (name.trim(), value.trim().trim_end_matches(';').trim()),
            None => continue,
        };
        if name.is_empty() {
            continue;
        }
        let value = match value.parse::<f64>() {
            Ok(number) => ParameterValue::Number(number),
            Err(_) => ParameterValue::Expression(value.to_string()),
        };
        parameters.insert(name.to_string(), value);
    }
    parameters
}
