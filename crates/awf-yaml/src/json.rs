//! Conversion from span-tracked YAML to `serde_json` values.

use crate::node::{NodeKind, YamlNode};
use serde_json::{Map, Number, Value};
use yaml_rust2::Yaml;

impl YamlNode {
    /// Convert this node to a JSON value, dropping span information.
    ///
    /// Mapping keys become their scalar text; a non-scalar key is rendered
    /// as compact JSON text. Later duplicate keys win.
    pub fn to_json(&self) -> Value {
        match &self.kind {
            NodeKind::Scalar(scalar) => scalar_to_json(&scalar.value),
            NodeKind::Sequence(items) => Value::Array(items.iter().map(YamlNode::to_json).collect()),
            NodeKind::Mapping(entries) => {
                let mut map = Map::new();
                for entry in entries {
                    let key = match entry.key.scalar_text() {
                        Some(text) => text.to_string(),
                        None => entry.key.to_json().to_string(),
                    };
                    map.insert(key, entry.value.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

fn scalar_to_json(value: &Yaml) -> Value {
    match value {
        Yaml::Null | Yaml::BadValue => Value::Null,
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Integer(i) => Value::Number((*i).into()),
        Yaml::Real(text) => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(text.clone()), Value::Number),
        Yaml::String(s) => Value::String(s.clone()),
        // The span builder never produces these variants for scalars.
        _ => Value::Null,
    }
}
