//! Descriptor file reading and rewriting
//!
//! Descriptors are tsconfig-style JSONC documents. Reads go through
//! `jsonc-parser` so comments and trailing commas parse cleanly; writes go
//! through the span splicer in [`crate::jsontext`] so only the reference
//! array (or alias map) changes and the rest of the file stays untouched.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{SyncError, SyncResult};
use crate::jsontext;

fn parse(raw: &str, path: &Path) -> SyncResult<serde_json::Value> {
    let parsed = jsonc_parser::parse_to_serde_value(raw, &Default::default()).map_err(|e| {
        SyncError::DescriptorParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    parsed.ok_or_else(|| SyncError::DescriptorParse {
        path: path.to_path_buf(),
        message: "empty document".to_string(),
    })
}

/// Current reference list of a descriptor, in document order.
///
/// A missing `references` key reads as an empty list.
pub fn read_references(raw: &str, path: &Path) -> SyncResult<Vec<String>> {
    let value = parse(raw, path)?;
    let Some(refs) = value.get("references") else {
        return Ok(Vec::new());
    };
    let Some(items) = refs.as_array() else {
        return Err(SyncError::DescriptorParse {
            path: path.to_path_buf(),
            message: "\"references\" is not an array".to_string(),
        });
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.get("path").and_then(|p| p.as_str()) {
            Some(p) => out.push(p.to_string()),
            None => {
                return Err(SyncError::DescriptorParse {
                    path: path.to_path_buf(),
                    message: "reference entry without a \"path\" string".to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Current `compilerOptions.paths` alias map.
///
/// The alias map is semantically unordered, so it is returned sorted by
/// key; a missing map reads as empty.
pub fn read_alias_map(raw: &str, path: &Path) -> SyncResult<BTreeMap<String, Vec<String>>> {
    let value = parse(raw, path)?;
    let Some(paths) = value
        .get("compilerOptions")
        .and_then(|c| c.get("paths"))
    else {
        return Ok(BTreeMap::new());
    };
    let Some(entries) = paths.as_object() else {
        return Err(SyncError::DescriptorParse {
            path: path.to_path_buf(),
            message: "\"compilerOptions.paths\" is not an object".to_string(),
        });
    };

    let mut out = BTreeMap::new();
    for (key, targets) in entries {
        let list = targets
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        out.insert(key.clone(), list);
    }
    Ok(out)
}

/// Render a reference array in the file's indentation style
fn render_references(entries: &[String], unit: &str, base: &str) -> String {
    if entries.is_empty() {
        return "[]".to_string();
    }
    let mut out = String::from("[\n");
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(base);
        out.push_str(unit);
        out.push_str(&format!("{{ \"path\": \"{entry}\" }}"));
        if i + 1 < entries.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(base);
    out.push(']');
    out
}

/// Render an alias map in the file's indentation style
fn render_alias_map(entries: &[(String, Vec<String>)], unit: &str, base: &str) -> String {
    if entries.is_empty() {
        return "{}".to_string();
    }
    let mut out = String::from("{\n");
    for (i, (key, targets)) in entries.iter().enumerate() {
        let rendered: Vec<String> = targets.iter().map(|t| format!("\"{t}\"")).collect();
        out.push_str(base);
        out.push_str(unit);
        out.push_str(&format!("\"{key}\": [{}]", rendered.join(", ")));
        if i + 1 < entries.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(base);
    out.push('}');
    out
}

/// Produce the descriptor text with its reference list replaced.
///
/// A descriptor without a `references` key gets one appended as the last
/// root member.
pub fn update_references(raw: &str, path: &Path, entries: &[String]) -> SyncResult<String> {
    let unit = jsontext::detect_indent(raw);
    match jsontext::find_value_span(raw, &["references"]) {
        Some(span) => {
            let base = jsontext::line_indent(raw, span.start);
            let rendered = render_references(entries, &unit, &base);
            Ok(jsontext::splice(raw, span, &rendered))
        }
        None => {
            let rendered = render_references(entries, &unit, &unit);
            jsontext::insert_root_key(raw, "references", &rendered, &unit).ok_or_else(|| {
                SyncError::DescriptorParse {
                    path: path.to_path_buf(),
                    message: "document root is not an object".to_string(),
                }
            })
        }
    }
}

/// Produce the descriptor text with `compilerOptions.paths` replaced.
///
/// `entries` carries the desired document order (self alias first, then
/// dependencies).
pub fn update_alias_map(
    raw: &str,
    path: &Path,
    entries: &[(String, Vec<String>)],
) -> SyncResult<String> {
    let unit = jsontext::detect_indent(raw);
    match jsontext::find_value_span(raw, &["compilerOptions", "paths"]) {
        Some(span) => {
            let base = jsontext::line_indent(raw, span.start);
            let rendered = render_alias_map(entries, &unit, &base);
            Ok(jsontext::splice(raw, span, &rendered))
        }
        None => {
            // No compilerOptions.paths yet: nest a fresh compilerOptions
            // block when even that is missing, otherwise fail loudly - a
            // compilerOptions present without paths is spliced by key.
            match jsontext::find_value_span(raw, &["compilerOptions"]) {
                Some(span) => {
                    let base = jsontext::line_indent(raw, span.start);
                    let inner = format!("{base}{unit}");
                    let rendered = render_alias_map(entries, &unit, &inner);
                    let object = &raw[span.start..span.end];
                    let with_paths = jsontext::insert_root_key(
                        object,
                        "paths",
                        &rendered,
                        &inner,
                    )
                    .ok_or_else(|| SyncError::DescriptorParse {
                        path: path.to_path_buf(),
                        message: "\"compilerOptions\" is not an object".to_string(),
                    })?;
                    Ok(jsontext::splice(raw, span, &with_paths))
                }
                None => {
                    let inner = format!("{unit}{unit}");
                    let rendered = render_alias_map(entries, &unit, &inner);
                    let block = format!("{{\n{inner}\"paths\": {rendered}\n{unit}}}");
                    jsontext::insert_root_key(raw, "compilerOptions", &block, &unit).ok_or_else(
                        || SyncError::DescriptorParse {
                            path: path.to_path_buf(),
                            message: "document root is not an object".to_string(),
                        },
                    )
                }
            }
        }
    }
}
