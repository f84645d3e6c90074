mod check;
mod config;
mod spec_file;

use anyhow::{Context, Result};
use argusage_metadata::ArgDef;
use argusage_render::Renderer;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppArgs;
use crate::spec_file::{DEFAULT_SPEC_NAME, load_spec, write_default_spec};

#[derive(Parser)]
#[command(name = "argusage", disable_help_subcommand = true)]
#[command(version, about = "Render usage lines and help listings from a JSON argument spec", long_about = None)]
struct Cli {
    /// Path to the spec document (default: ./argusage.json)
    #[arg(short, long, value_name = "FILE", global = true)]
    spec: Option<PathBuf>,

    #[command(flatten)]
    app: AppArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter argusage.json
    Init(InitArgs),

    /// Print the one-line usage synopsis
    Usage,

    /// Print the full help listing
    Help,

    /// Print the name and version line
    Version,

    /// Print usage and an error message to stderr, then exit non-zero
    Fail(FailArgs),

    /// Validate the spec document and summarize its arguments
    Check(CheckArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing argusage.json
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct FailArgs {
    /// Error message printed after the usage line
    #[arg(value_name = "MESSAGE", required = true, num_args = 1..)]
    message: Vec<String>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Only output JSON (no human-readable output)
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // A missing .env is the common case.
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(ref args) => init(args),
        Commands::Usage => usage(&cli),
        Commands::Help => help(&cli),
        Commands::Version => version(&cli),
        Commands::Fail(ref args) => fail(&cli, args),
        Commands::Check(ref args) => check_command(&cli, args),
    }
}

fn init(args: &InitArgs) -> Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let path = write_default_spec(&dir, args.force)?;
    eprintln!("Created: {}", path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_SPEC_NAME} to describe your arguments");
    eprintln!("  2. Run: argusage help");

    Ok(())
}

fn write_stdout(write: impl FnOnce(&mut io::StdoutLock<'static>) -> io::Result<()>) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write(&mut stdout)
        .and_then(|()| stdout.flush())
        .context("failed to write to stdout")
}

fn with_renderer<T>(cli: &Cli, f: impl FnOnce(&Renderer<'_, ArgDef>) -> T) -> Result<T> {
    let loaded = load_spec(cli.spec.as_deref(), false)?;
    let program = cli.app.program(&loaded.document);
    let config = cli.app.render_config(&loaded.document.app);
    let renderer = Renderer::new(&program, &loaded.document.args, &config);
    Ok(f(&renderer))
}

fn usage(cli: &Cli) -> Result<()> {
    tracing::debug!("executing usage command");
    with_renderer(cli, |r| write_stdout(|w| r.write_usage(w)))?
}

fn help(cli: &Cli) -> Result<()> {
    tracing::debug!("executing help command");
    with_renderer(cli, |r| write_stdout(|w| r.write_help(w)))?
}

fn version(cli: &Cli) -> Result<()> {
    tracing::debug!("executing version command");
    with_renderer(cli, |r| write_stdout(|w| r.write_version(w)))?
}

fn fail(cli: &Cli, args: &FailArgs) -> Result<()> {
    tracing::debug!("executing fail command");
    with_renderer(cli, |r| r.fail(args.message.join(" ")))?.exit()
}

fn check_command(cli: &Cli, args: &CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let loaded = load_spec(cli.spec.as_deref(), true)?;
    let program = cli.app.program(&loaded.document);
    let report = check::check_spec(&loaded, &program);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    eprintln!("Spec: {}", report.spec);
    eprintln!("Program: {}", report.program);
    eprintln!("Positional arguments: {}", report.positionals.len());
    eprintln!(
        "Options: {} ({} required)",
        report.options.len(),
        report.required_options.len()
    );
    if !report.options_without_help.is_empty() {
        eprintln!();
        eprintln!(
            "Note: {} option(s) have no help text:",
            report.options_without_help.len()
        );
        for name in &report.options_without_help {
            eprintln!("  - {name}");
        }
    }
    eprintln!("OK: spec document is valid");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
