//! YAML output with block-style multi-line strings

use anyhow::{Context, Result};
use serde::Serialize;
use yaml_rust_davvid::yaml::Hash;
use yaml_rust_davvid::{Yaml, YamlEmitter};

/// Serializes `data` to YAML, writing multi-line strings such as commit
/// bodies and display blocks as literal blocks.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    let value = serde_yaml::to_value(data).context("Failed to serialize to YAML value")?;

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(true);
    emitter
        .dump(&to_emitter_value(&value))
        .context("Failed to emit YAML")?;

    output.push('\n');
    Ok(output)
}

fn to_emitter_value(value: &serde_yaml::Value) -> Yaml {
    match value {
        serde_yaml::Value::Null => Yaml::Null,
        serde_yaml::Value::Bool(b) => Yaml::Boolean(*b),
        serde_yaml::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Yaml::Integer(i),
            (None, Some(f)) => Yaml::Real(f.to_string()),
            (None, None) => Yaml::String(n.to_string()),
        },
        serde_yaml::Value::String(s) => Yaml::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Yaml::Array(items.iter().map(to_emitter_value).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut hash = Hash::new();
            for (key, item) in map {
                hash.insert(to_emitter_value(key), to_emitter_value(item));
            }
            Yaml::Hash(hash)
        }
        serde_yaml::Value::Tagged(tagged) => to_emitter_value(&tagged.value),
    }
}
