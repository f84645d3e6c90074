use anyhow::{Context, Result, bail};
use argusage_metadata::{AppInfo, ArgDef, ArgKind, SpecDocument};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPEC_NAME: &str = "argusage.json";

#[derive(Debug, Clone)]
pub struct LoadedSpec {
    /// `None` when no spec file was found and an empty document is used.
    pub path: Option<PathBuf>,
    pub document: SpecDocument,
}

/// Load the spec document at `spec_path`, or `argusage.json` in the current directory.
///
/// A missing default file yields an empty document; a missing explicit path
/// (or any file when `require` is set) is an error.
pub fn load_spec(spec_path: Option<&Path>, require: bool) -> Result<LoadedSpec> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match spec_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_SPEC_NAME), false),
    };

    if !path.exists() {
        if explicit || require {
            bail!("spec document not found: {}", path.display());
        }
        tracing::debug!(path = %path.display(), "no spec document, rendering without arguments");
        return Ok(LoadedSpec {
            path: None,
            document: SpecDocument::default(),
        });
    }

    let document = SpecDocument::from_file(&path)
        .with_context(|| format!("invalid spec document: {}", path.display()))?;

    Ok(LoadedSpec {
        path: Some(path),
        document,
    })
}

/// Write a starter `argusage.json` into `project_dir`.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn write_default_spec(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_SPEC_NAME);
    if dest.exists() && !overwrite {
        bail!(
            "{DEFAULT_SPEC_NAME} already exists in {} (use --force to replace it)",
            project_dir.display()
        );
    }

    let project_name = guess_project_name(project_dir).unwrap_or_else(|| "my-cli".to_string());

    let mut document = SpecDocument::new(vec![
        ArgDef {
            long: "verbose".to_string(),
            short: Some("v".to_string()),
            kind: ArgKind::Flag,
            help: "verbose output".to_string(),
            ..Default::default()
        },
        ArgDef {
            long: "output".to_string(),
            short: Some("o".to_string()),
            help: "output file".to_string(),
            ..Default::default()
        },
        ArgDef {
            long: "input".to_string(),
            positional: true,
            multiple: true,
            ..Default::default()
        },
    ]);
    document.program = Some(project_name.clone());
    document.app = AppInfo {
        name: project_name,
        version: "0.1.0".to_string(),
        ..Default::default()
    };

    let out = document
        .to_json_pretty()
        .context("failed to serialize spec document")?;

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn guess_project_name(project_dir: &Path) -> Option<String> {
    // For `.` or other non-meaningful paths, try the current directory name.
    let file_name = project_dir.file_name().and_then(|s| s.to_str());
    let direct = file_name.filter(|s| !s.is_empty() && *s != "." && *s != "..");
    if let Some(name) = direct {
        return Some(name.to_string());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
}
