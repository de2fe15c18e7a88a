//! YAML front matter extraction.
//!
//! A page body may open with a `---` fenced YAML block closed by `---`
//! or `...`. The block is parsed into string-keyed, string-list-valued
//! metadata; single scalars become one-element lists so consumers never
//! branch on value shape. A malformed block is reported and treated as
//! ordinary content rather than failing the page.

use std::collections::BTreeMap;

/// Page metadata: string keys to lists of string values.
pub type Meta = BTreeMap<String, Vec<String>>;

/// Split front matter off a page source, returning metadata and body.
///
/// Returns an empty mapping and the unchanged source when no front
/// matter block is present or the block cannot be parsed.
#[must_use]
pub fn extract(source: &str) -> (Meta, &str) {
    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (Meta::new(), source);
    };
    if first.trim_end() != "---" {
        return (Meta::new(), source);
    }

    let mut block_len = 0;
    let mut close_len = None;
    for line in lines {
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            close_len = Some(line.len());
            break;
        }
        block_len += line.len();
    }
    let Some(close_len) = close_len else {
        // Unterminated block, keep it as content.
        return (Meta::new(), source);
    };

    let block = &source[first.len()..first.len() + block_len];
    let body = &source[first.len() + block_len + close_len..];
    match parse_block(block) {
        Ok(meta) => (meta, body),
        Err(issue) => {
            tracing::warn!(issue = %issue, "Malformed front matter block, treating it as content");
            (Meta::new(), source)
        }
    }
}

fn parse_block(block: &str) -> Result<Meta, String> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| err.to_string())?;
    match value {
        serde_yaml::Value::Null => Ok(Meta::new()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut meta = Meta::new();
            for (key, value) in mapping {
                let Some(key) = scalar_string(&key) else {
                    continue;
                };
                let values = match value {
                    serde_yaml::Value::Sequence(items) => {
                        items.iter().filter_map(scalar_string).collect()
                    }
                    serde_yaml::Value::Null => Vec::new(),
                    other => scalar_string(&other).into_iter().collect(),
                };
                meta.insert(key, values);
            }
            Ok(meta)
        }
        _ => Err("front matter is not a key-value mapping".to_owned()),
    }
}

fn scalar_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(text) => Some(text.clone()),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
