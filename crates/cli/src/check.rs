use argusage_metadata::ArgDef;
use argusage_render::synopsis::flag_name;
use argusage_render::{ArgSpecLike, classify};
use serde::Serialize;

use crate::spec_file::LoadedSpec;

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckReport {
    pub spec: String,
    pub program: String,
    pub positionals: Vec<String>,
    pub options: Vec<String>,
    pub required_options: Vec<String>,
    pub options_without_help: Vec<String>,
}

/// Summarize an already-validated spec document.
pub fn check_spec(loaded: &LoadedSpec, program: &str) -> CheckReport {
    let args: &[ArgDef] = &loaded.document.args;
    let classified = classify(args);

    let positionals = classified
        .positionals
        .iter()
        .map(|a| a.long().to_string())
        .collect();
    let options = classified.options.iter().map(|a| flag_name(*a)).collect();
    let required_options = classified
        .options
        .iter()
        .filter(|a| a.required())
        .map(|a| flag_name(*a))
        .collect();
    let options_without_help = classified
        .options
        .iter()
        .filter(|a| a.help().trim().is_empty())
        .map(|a| flag_name(*a))
        .collect();

    CheckReport {
        spec: loaded
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        program: program.to_string(),
        positionals,
        options,
        required_options,
        options_without_help,
    }
}
