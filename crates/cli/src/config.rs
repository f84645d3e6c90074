use argusage_metadata::{AppInfo, SpecDocument};
use argusage_render::RenderConfig;
use argusage_render::usage::program_name_from_args;
use clap::Args;

/// App metadata overrides. Each wins over the spec document's `app` section.
#[derive(Debug, Clone, Default, Args)]
pub struct AppArgs {
    /// Program name shown after `usage:` (default: spec `program`, then argv[0])
    #[arg(long, value_name = "NAME", global = true, env = "ARGUSAGE_PROG")]
    pub prog: Option<String>,

    /// Application name for the `name:` section
    #[arg(long, value_name = "NAME", global = true, env = "ARGUSAGE_NAME")]
    pub name: Option<String>,

    /// Application version
    #[arg(long, value_name = "VERSION", global = true, env = "ARGUSAGE_VERSION")]
    pub app_version: Option<String>,

    /// One-line description shown after the version
    #[arg(long, value_name = "TEXT", global = true, env = "ARGUSAGE_TAGLINE")]
    pub tagline: Option<String>,

    /// Author line for the `authors:` section
    #[arg(long, value_name = "TEXT", global = true, env = "ARGUSAGE_AUTHOR")]
    pub author: Option<String>,

    /// Copyright line for the `copyright:` section
    #[arg(long, value_name = "TEXT", global = true, env = "ARGUSAGE_COPYRIGHT")]
    pub copyright: Option<String>,
}

impl AppArgs {
    /// Layer these overrides on top of `app`.
    pub fn render_config(&self, app: &AppInfo) -> RenderConfig {
        let pick = |flag: &Option<String>, doc: &str| flag.clone().unwrap_or_else(|| doc.to_string());
        RenderConfig {
            name: pick(&self.name, &app.name),
            version: pick(&self.app_version, &app.version),
            tagline: pick(&self.tagline, &app.tagline),
            author: pick(&self.author, &app.author),
            copyright: pick(&self.copyright, &app.copyright),
        }
    }

    pub fn program(&self, document: &SpecDocument) -> String {
        self.prog
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| document.program.clone().filter(|s| !s.is_empty()))
            .unwrap_or_else(program_name_from_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_document_fields() {
        let app = AppInfo {
            name: "doc-name".to_string(),
            version: "1.0.0".to_string(),
            author: "Doc Author".to_string(),
            ..Default::default()
        };
        let args = AppArgs {
            name: Some("flag-name".to_string()),
            author: Some(String::new()),
            ..Default::default()
        };
        let config = args.render_config(&app);
        assert_eq!(config.name, "flag-name");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.author, "");
        assert_eq!(config.tagline, "");
    }

    #[test]
    fn program_prefers_flag_then_document() {
        let mut document = SpecDocument::default();
        document.program = Some("from-doc".to_string());

        let args = AppArgs::default();
        assert_eq!(args.program(&document), "from-doc");

        let args = AppArgs {
            prog: Some("from-flag".to_string()),
            ..Default::default()
        };
        assert_eq!(args.program(&document), "from-flag");
    }

    #[test]
    fn empty_program_flag_falls_through_to_document() {
        let mut document = SpecDocument::default();
        document.program = Some("from-doc".to_string());

        let args = AppArgs {
            prog: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(args.program(&document), "from-doc");
    }

    #[test]
    fn program_falls_back_to_argv0() {
        let args = AppArgs::default();
        let name = args.program(&SpecDocument::default());
        assert!(!name.is_empty());
        assert!(!name.contains('/'));
    }
}
