//! Spec document model for argusage.
//!
//! A spec document is a JSON file describing one program's arguments plus the
//! descriptive metadata shown in its help output. The types here:
//! - deserialize that document (kebab-case keys, lenient defaults)
//! - check the invariants the renderer relies on
//! - plug into `argusage-render` via `ArgSpecLike` and `RenderConfig`

use argusage_render::{ArgSpecLike, RenderConfig, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The only `format-version` this crate understands.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("failed to read spec document: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse spec document JSON")]
    Json(#[from] serde_json::Error),
    #[error("unsupported spec format-version {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },
    #[error("argument #{index} has an empty long name")]
    EmptyLong { index: usize },
    #[error("duplicate long name '{0}'")]
    DuplicateLong(String),
    #[error("argument '{0}' has an empty short name")]
    EmptyShort(String),
    #[error("flag name '-{name}' is used by both '{first}' and '{second}'")]
    DuplicateFlag {
        name: String,
        first: String,
        second: String,
    },
    #[error("positional argument '{0}' cannot have a short name")]
    PositionalShort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgKind {
    Flag,
    #[default]
    Valued,
}

impl From<ArgKind> for ValueKind {
    fn from(kind: ArgKind) -> Self {
        match kind {
            ArgKind::Flag => ValueKind::Flag,
            ArgKind::Valued => ValueKind::Valued,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ArgDef {
    pub long: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default)]
    pub positional: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub kind: ArgKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
}

impl ArgSpecLike for ArgDef {
    fn long(&self) -> &str {
        &self.long
    }

    fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    fn positional(&self) -> bool {
        self.positional
    }

    fn required(&self) -> bool {
        self.required
    }

    fn multiple(&self) -> bool {
        self.multiple
    }

    fn value_kind(&self) -> ValueKind {
        self.kind.into()
    }

    fn help(&self) -> &str {
        &self.help
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AppInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tagline: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub copyright: String,
}

impl AppInfo {
    pub fn to_render_config(&self) -> RenderConfig {
        RenderConfig {
            name: self.name.clone(),
            version: self.version.clone(),
            tagline: self.tagline.clone(),
            author: self.author.clone(),
            copyright: self.copyright.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SpecDocument {
    pub format_version: u32,
    /// Name shown after `usage:`. Callers fall back to argv[0] when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default)]
    pub app: AppInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgDef>,
}

impl Default for SpecDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SpecDocument {
    pub fn new(args: Vec<ArgDef>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            program: None,
            app: AppInfo::default(),
            args,
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, SpecError> {
        let doc: SpecDocument = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let contents = fs::read_to_string(path).map_err(|source| SpecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            args = doc.args.len(),
            "loaded spec document"
        );
        Ok(doc)
    }

    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Check the invariants rendering relies on; the first violation wins.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.format_version != FORMAT_VERSION {
            return Err(SpecError::UnsupportedFormat {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let mut longs: HashSet<&str> = HashSet::new();
        for (index, arg) in self.args.iter().enumerate() {
            if arg.long.trim().is_empty() {
                return Err(SpecError::EmptyLong { index });
            }
            if !longs.insert(arg.long.as_str()) {
                return Err(SpecError::DuplicateLong(arg.long.clone()));
            }
        }

        // Every option's long form is a flag name; shorts must not collide with any.
        let mut flags: HashMap<&str, &str> = self
            .args
            .iter()
            .filter(|a| !a.positional)
            .map(|a| (a.long.as_str(), a.long.as_str()))
            .collect();

        for arg in &self.args {
            let Some(short) = arg.short.as_deref() else {
                continue;
            };
            if arg.positional {
                return Err(SpecError::PositionalShort(arg.long.clone()));
            }
            if short.trim().is_empty() {
                return Err(SpecError::EmptyShort(arg.long.clone()));
            }
            if let Some(prev) = flags.insert(short, arg.long.as_str())
                && prev != arg.long
            {
                return Err(SpecError::DuplicateFlag {
                    name: short.to_string(),
                    first: prev.to_string(),
                    second: arg.long.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argusage_render::Renderer;

    const EXAMPLE: &str = r#"{
  "format-version": 1,
  "program": "cp",
  "app": {
    "name": "cp",
    "version": "1.0.0",
    "tagline": "copy files",
    "author": "Jo Doe",
    "copyright": "(c) 2026"
  },
  "args": [
    { "long": "verbose", "short": "v", "kind": "flag", "help": "explain what is done" },
    { "long": "target", "short": "t", "required": true },
    { "long": "source", "positional": true, "multiple": true }
  ]
}"#;

    fn option(long: &str) -> ArgDef {
        ArgDef {
            long: long.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn document_deserializes_kebab_case() {
        let doc = SpecDocument::from_json_str(EXAMPLE).unwrap();
        assert_eq!(doc.program.as_deref(), Some("cp"));
        assert_eq!(doc.app.tagline, "copy files");
        assert_eq!(doc.args.len(), 3);

        let verbose = &doc.args[0];
        assert_eq!(verbose.short.as_deref(), Some("v"));
        assert_eq!(verbose.value_kind(), ValueKind::Flag);

        let target = &doc.args[1];
        assert!(target.required);
        assert_eq!(target.kind, ArgKind::Valued);

        let source = &doc.args[2];
        assert!(source.positional && source.multiple);
    }

    #[test]
    fn document_defaults_are_lenient() {
        let doc = SpecDocument::from_json_str(r#"{ "format-version": 1 }"#).unwrap();
        assert_eq!(doc, SpecDocument::default());
    }

    #[test]
    fn document_renders_through_core() {
        let doc = SpecDocument::from_json_str(EXAMPLE).unwrap();
        let config = doc.app.to_render_config();
        let renderer = Renderer::new("cp", &doc.args, &config);
        assert_eq!(
            renderer.usage(),
            "usage: cp [-v] -t  [SOURCE [SOURCE ...]]\n"
        );
        assert!(renderer.help().starts_with("name:\n  cp 1.0.0 -- copy files\n\n"));
    }

    #[test]
    fn to_json_pretty_reparses() {
        let doc = SpecDocument::from_json_str(EXAMPLE).unwrap();
        let json = doc.to_json_pretty().unwrap();
        assert!(json.contains("\"format-version\": 1"));
        assert_eq!(SpecDocument::from_json_str(&json).unwrap(), doc);
    }

    #[test]
    fn rejects_unknown_format_version() {
        let err = SpecDocument::from_json_str(r#"{ "format-version": 2 }"#).unwrap_err();
        assert!(matches!(
            err,
            SpecError::UnsupportedFormat {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = SpecDocument::from_json_str("{").unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
    }

    #[test]
    fn rejects_empty_long() {
        let doc = SpecDocument::new(vec![option("ok"), option(" ")]);
        assert!(matches!(
            doc.validate().unwrap_err(),
            SpecError::EmptyLong { index: 1 }
        ));
    }

    #[test]
    fn rejects_duplicate_long() {
        let doc = SpecDocument::new(vec![option("out"), option("out")]);
        match doc.validate().unwrap_err() {
            SpecError::DuplicateLong(name) => assert_eq!(name, "out"),
            other => panic!("expected DuplicateLong, got: {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_short() {
        let mut arg = option("out");
        arg.short = Some(String::new());
        let doc = SpecDocument::new(vec![arg]);
        assert!(matches!(doc.validate().unwrap_err(), SpecError::EmptyShort(_)));
    }

    #[test]
    fn rejects_short_colliding_with_other_flag() {
        let mut verbose = option("verbose");
        verbose.short = Some("x".to_string());
        let doc = SpecDocument::new(vec![option("x"), verbose]);
        match doc.validate().unwrap_err() {
            SpecError::DuplicateFlag {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "x");
                assert_eq!(first, "x");
                assert_eq!(second, "verbose");
            }
            other => panic!("expected DuplicateFlag, got: {other:?}"),
        }
    }

    #[test]
    fn allows_short_equal_to_own_long() {
        let mut arg = option("v");
        arg.short = Some("v".to_string());
        SpecDocument::new(vec![arg]).validate().unwrap();
    }

    #[test]
    fn rejects_positional_with_short() {
        let mut arg = option("file");
        arg.positional = true;
        arg.short = Some("f".to_string());
        let doc = SpecDocument::new(vec![arg]);
        assert!(matches!(
            doc.validate().unwrap_err(),
            SpecError::PositionalShort(_)
        ));
    }

    #[test]
    fn from_file_reports_missing_path() {
        let path = std::env::temp_dir().join("argusage-missing-spec-does-not-exist.json");
        let err = SpecDocument::from_file(&path).unwrap_err();
        assert!(matches!(err, SpecError::Io { .. }));
        assert!(err.to_string().contains("argusage-missing-spec"));
    }
}
