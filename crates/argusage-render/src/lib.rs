//! Usage line and help listing rendering for declarative argument specs.
//!
//! This crate only formats. It never parses argv and never validates values:
//! - `spec` declares what an argument looks like (`ArgSpecLike`, `ValueKind`)
//! - `classify` splits specs into positionals and options
//! - `synopsis`, `usage`, `help` turn them into terminal text
//! - `failure` pairs the usage line with an error message for the caller to report

pub mod spec {
    /// Whether an argument consumes a value token.
    ///
    /// Declared up front instead of being inferred from the destination type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum ValueKind {
        /// Boolean-like; the flag name alone is the whole token.
        Flag,
        #[default]
        Valued,
    }

    impl ValueKind {
        pub fn is_flag(self) -> bool {
            matches!(self, Self::Flag)
        }
    }

    pub trait ArgSpecLike {
        /// Canonical name. Uppercased, it is also the positional placeholder.
        fn long(&self) -> &str;
        fn short(&self) -> Option<&str> {
            None
        }
        fn positional(&self) -> bool;
        /// Only consulted for options.
        fn required(&self) -> bool {
            false
        }
        /// Only consulted for positionals.
        fn multiple(&self) -> bool {
            false
        }
        fn value_kind(&self) -> ValueKind;
        fn help(&self) -> &str {
            ""
        }
    }

    impl<T: ArgSpecLike + ?Sized> ArgSpecLike for &T {
        fn long(&self) -> &str {
            (**self).long()
        }

        fn short(&self) -> Option<&str> {
            (**self).short()
        }

        fn positional(&self) -> bool {
            (**self).positional()
        }

        fn required(&self) -> bool {
            (**self).required()
        }

        fn multiple(&self) -> bool {
            (**self).multiple()
        }

        fn value_kind(&self) -> ValueKind {
            (**self).value_kind()
        }

        fn help(&self) -> &str {
            (**self).help()
        }
    }

    /// Owned spec for callers without a model of their own.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ArgSpec {
        long: String,
        short: Option<String>,
        positional: bool,
        required: bool,
        multiple: bool,
        value_kind: ValueKind,
        help: String,
    }

    impl ArgSpec {
        /// An option that takes a value (`-out `).
        pub fn option(long: impl Into<String>) -> Self {
            Self {
                long: long.into(),
                ..Default::default()
            }
        }

        /// A boolean option (`-v`).
        pub fn flag(long: impl Into<String>) -> Self {
            Self {
                long: long.into(),
                value_kind: ValueKind::Flag,
                ..Default::default()
            }
        }

        pub fn positional(long: impl Into<String>) -> Self {
            Self {
                long: long.into(),
                positional: true,
                ..Default::default()
            }
        }

        pub fn with_short(mut self, short: impl Into<String>) -> Self {
            self.short = Some(short.into());
            self
        }

        pub fn with_help(mut self, help: impl Into<String>) -> Self {
            self.help = help.into();
            self
        }

        pub fn with_required(mut self, required: bool) -> Self {
            self.required = required;
            self
        }

        pub fn with_multiple(mut self, multiple: bool) -> Self {
            self.multiple = multiple;
            self
        }

        pub fn with_value_kind(mut self, value_kind: ValueKind) -> Self {
            self.value_kind = value_kind;
            self
        }
    }

    impl ArgSpecLike for ArgSpec {
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
            self.value_kind
        }

        fn help(&self) -> &str {
            &self.help
        }
    }

    /// Descriptive metadata shown around the usage line.
    ///
    /// Empty fields are treated as absent and leave no trace in the output.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct RenderConfig {
        pub name: String,
        pub version: String,
        pub tagline: String,
        pub author: String,
        pub copyright: String,
    }
}

pub mod classify {
    use super::spec::ArgSpecLike;

    /// Specs split by kind, each side in declaration order.
    #[derive(Debug)]
    pub struct Classified<'a, A> {
        pub positionals: Vec<&'a A>,
        pub options: Vec<&'a A>,
    }

    impl<A> Classified<'_, A> {
        pub fn is_empty(&self) -> bool {
            self.positionals.is_empty() && self.options.is_empty()
        }
    }

    /// Stable partition of `specs` into positionals and options.
    pub fn classify<A: ArgSpecLike>(specs: &[A]) -> Classified<'_, A> {
        let (positionals, options): (Vec<&A>, Vec<&A>) =
            specs.iter().partition(|s| s.positional());
        Classified {
            positionals,
            options,
        }
    }
}

pub mod synopsis {
    use super::spec::ArgSpecLike;

    /// Prefix for both the short and the long flag form.
    pub const FLAG_MARKER: &str = "-";

    /// `-<short>` when a short form exists, otherwise `-<long>`.
    pub fn flag_name(spec: &dyn ArgSpecLike) -> String {
        match spec.short().filter(|s| !s.is_empty()) {
            Some(short) => format!("{FLAG_MARKER}{short}"),
            None => format!("{FLAG_MARKER}{}", spec.long()),
        }
    }

    /// Token for one option, without required/optional decoration.
    ///
    /// Valued options reserve a single trailing space for the value. The value
    /// placeholder itself is not written; existing output depends on that.
    pub fn synopsis(spec: &dyn ArgSpecLike) -> String {
        let mut out = flag_name(spec);
        if !spec.value_kind().is_flag() {
            out.push(' ');
        }
        out
    }
}

pub mod usage {
    use super::classify::Classified;
    use super::spec::ArgSpecLike;
    use super::synopsis::synopsis;
    use std::path::Path;

    /// Used when argv[0] is missing or empty.
    pub const DEFAULT_PROGRAM_NAME: &str = "program";

    /// Base file name of an executable path (`/usr/bin/cp` -> `cp`).
    pub fn program_name(path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        path.file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
    }

    /// Program name of the running process, derived from argv[0].
    pub fn program_name_from_args() -> String {
        std::env::args_os()
            .next()
            .map(program_name)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string())
    }

    /// Uppercased positional placeholder, repeated when variadic.
    pub fn positional_token(spec: &dyn ArgSpecLike) -> String {
        let up = spec.long().to_uppercase();
        if spec.multiple() {
            format!("[{up} [{up} ...]]")
        } else {
            up
        }
    }

    /// Render `usage: <program> [options...] POSITIONALS...\n`.
    pub fn usage_line<A: ArgSpecLike>(program: &str, classified: &Classified<'_, A>) -> String {
        let mut out = format!("usage: {program}");

        for &spec in &classified.options {
            out.push(' ');
            if spec.required() {
                out.push_str(&synopsis(spec));
            } else {
                out.push('[');
                out.push_str(&synopsis(spec));
                out.push(']');
            }
        }

        for &spec in &classified.positionals {
            out.push(' ');
            out.push_str(&positional_token(spec));
        }

        out.push('\n');
        out
    }
}

pub mod help {
    use super::classify::Classified;
    use super::spec::{ArgSpecLike, RenderConfig};
    use super::synopsis::synopsis;
    use super::usage::usage_line;

    /// Column at which option help text starts.
    pub const HELP_COLUMN: usize = 10;
    /// Inline help requires more than this many spare columns before `HELP_COLUMN`.
    const HELP_MARGIN: usize = 2;

    fn push_header(out: &mut String, config: &RenderConfig) {
        if !config.name.is_empty() {
            out.push_str("name:\n  ");
            out.push_str(&config.name);
            if !config.version.is_empty() {
                out.push(' ');
                out.push_str(&config.version);
            }
            if !config.tagline.is_empty() {
                out.push_str(" -- ");
                out.push_str(&config.tagline);
            }
            out.push_str("\n\n");
        }

        if !config.author.is_empty() {
            out.push_str(&format!("authors:\n  {}\n\n", config.author));
        }
    }

    /// One line of the `options:` listing, help aligned to `HELP_COLUMN`.
    pub fn option_line(spec: &dyn ArgSpecLike) -> String {
        let mut out = format!("  {}", synopsis(spec));
        let help = spec.help();
        if !help.is_empty() {
            let width = out.chars().count();
            if width + HELP_MARGIN < HELP_COLUMN {
                out.push_str(&" ".repeat(HELP_COLUMN - width));
            } else {
                out.push('\n');
                out.push_str(&" ".repeat(HELP_COLUMN));
            }
            out.push_str(help);
        }
        out.push('\n');
        out
    }

    /// Render the header, usage line, argument listings and footer.
    pub fn help_text<A: ArgSpecLike>(
        program: &str,
        classified: &Classified<'_, A>,
        config: &RenderConfig,
    ) -> String {
        let mut out = String::new();
        push_header(&mut out, config);

        out.push_str(&usage_line(program, classified));

        if !classified.positionals.is_empty() {
            out.push_str("\npositional arguments:\n");
            for spec in &classified.positionals {
                out.push_str(&format!("  {}\n", spec.long()));
            }
        }

        if !classified.options.is_empty() {
            out.push_str("\noptions:\n");
            for &spec in &classified.options {
                out.push_str(&option_line(spec));
            }
        }

        if !config.copyright.is_empty() {
            out.push_str(&format!("\ncopyright:\n  {}\n\n", config.copyright));
        }

        out
    }

    /// `<name> <version>\n`, falling back to the program name when unnamed.
    pub fn version_line(program: &str, config: &RenderConfig) -> String {
        let name = if config.name.is_empty() {
            program
        } else {
            config.name.as_str()
        };
        if config.version.is_empty() {
            format!("{name}\n")
        } else {
            format!("{name} {}\n", config.version)
        }
    }
}

pub mod failure {
    use std::io::{self, Write};

    /// A usage error, ready to be reported.
    ///
    /// Returned instead of exiting so callers decide when the process ends.
    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[error("{usage}error: {message}")]
    pub struct UsageFailure {
        message: String,
        usage: String,
    }

    impl UsageFailure {
        pub const EXIT_CODE: i32 = 2;

        pub fn new(message: impl Into<String>, usage: impl Into<String>) -> Self {
            Self {
                message: message.into(),
                usage: usage.into(),
            }
        }

        pub fn message(&self) -> &str {
            &self.message
        }

        /// The rendered usage line, newline included.
        pub fn usage(&self) -> &str {
            &self.usage
        }

        /// Write the usage line, then `error: <message>`.
        pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
            w.write_all(self.usage.as_bytes())?;
            writeln!(w, "error: {}", self.message)?;
            w.flush()
        }

        /// Report on stderr and terminate with `EXIT_CODE`.
        pub fn exit(self) -> ! {
            let mut stderr = io::stderr().lock();
            let _ = self.write_to(&mut stderr);
            std::process::exit(Self::EXIT_CODE)
        }
    }
}

use std::io::{self, Write};

pub use classify::{Classified, classify};
pub use failure::UsageFailure;
pub use spec::{ArgSpec, ArgSpecLike, RenderConfig, ValueKind};

/// Renders usage and help for one program's specs.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a, A> {
    program: &'a str,
    specs: &'a [A],
    config: &'a RenderConfig,
}

impl<'a, A: ArgSpecLike> Renderer<'a, A> {
    pub fn new(program: &'a str, specs: &'a [A], config: &'a RenderConfig) -> Self {
        Self {
            program,
            specs,
            config,
        }
    }

    pub fn classify(&self) -> Classified<'a, A> {
        classify::classify(self.specs)
    }

    pub fn usage(&self) -> String {
        usage::usage_line(self.program, &self.classify())
    }

    pub fn help(&self) -> String {
        help::help_text(self.program, &self.classify(), self.config)
    }

    pub fn version(&self) -> String {
        help::version_line(self.program, self.config)
    }

    pub fn write_usage<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.usage().as_bytes())
    }

    pub fn write_help<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.help().as_bytes())
    }

    pub fn write_version<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.version().as_bytes())
    }

    /// Pair `message` with the usage line. See `UsageFailure::exit`.
    pub fn fail(&self, message: impl Into<String>) -> UsageFailure {
        UsageFailure::new(message, self.usage())
    }
}
