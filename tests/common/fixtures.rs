//! Reusable fixture content for workspace tests.

/// A descriptor with an empty reference list
pub const EMPTY_DESCRIPTOR: &str = r#"{
  "compilerOptions": {
    "composite": true
  },
  "references": []
}
"#;

/// A test-profile descriptor referencing its own source descriptor,
/// as every synced test profile must
pub const TEST_DESCRIPTOR: &str = r#"{
  "compilerOptions": {
    "composite": true
  },
  "references": [
    { "path": "./tsconfig.src.json" }
  ]
}
"#;

/// An application tsconfig with an empty alias map
pub const EMPTY_APP_DESCRIPTOR: &str = r#"{
  "compilerOptions": {
    "paths": {}
  },
  "references": []
}
"#;

/// A descriptor carrying line and block comments
pub const COMMENTED_DESCRIPTOR: &str = r#"{
  // build settings shared by every package
  "compilerOptions": {
    /* incremental compilation */
    "composite": true
  },
  "references": []
}
"#;

/// Render a package.json with runtime workspace dependencies
pub fn manifest(name: &str, deps: &[&str]) -> String {
    let entries: Vec<String> = deps
        .iter()
        .map(|dep| format!("    \"{dep}\": \"workspace:*\""))
        .collect();
    if entries.is_empty() {
        format!("{{\n  \"name\": \"{name}\",\n  \"version\": \"0.1.0\"\n}}\n")
    } else {
        format!(
            "{{\n  \"name\": \"{name}\",\n  \"version\": \"0.1.0\",\n  \"dependencies\": {{\n{}\n  }}\n}}\n",
            entries.join(",\n")
        )
    }
}
