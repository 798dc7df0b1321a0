use std::collections::HashSet;
use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::{Report, ResourceKind, SectionBody};
use crate::engine::{Engine, EngineOptions};
use crate::providers::SnapshotFileProvider;
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "bkaudit",
    version,
    about = "Audit backup coverage for managed cloud resources (RDS clusters, EC2 instances, EFS file systems)"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Report(ReportArgs),
    Config(ConfigArgs),
    Completion(CompletionArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Exported account snapshot to audit.
    #[arg(long)]
    pub input: PathBuf,
    /// Emit a Markdown summary instead of the plain-text report.
    #[arg(long)]
    pub markdown: bool,
    /// Restrict the audit to the given kinds (rds|ec2|efs); repeatable.
    #[arg(long)]
    pub kind: Vec<ResourceKind>,
    #[arg(long)]
    pub top: Option<usize>,
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    let stdin_is_tty = io::stdin().is_terminal();
    let stdout_is_tty = io::stdout().is_terminal();
    let stderr_is_tty = io::stderr().is_terminal();

    let home_dir = crate::config::home_dir().map_err(crate::exit::invalid_args_err)?;

    let env_config_path = std::env::var_os("BKAUDIT_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;

    let color = stdout_is_tty && cfg.ui.color && !cli.no_color;

    let ui_cfg = UiConfig {
        color,
        stdin_is_tty,
        stdout_is_tty,
        stderr_is_tty,
        max_table_rows: cfg.ui.max_table_rows,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Report(args) => {
            let provider = SnapshotFileProvider::load(&args.input)
                .map_err(crate::exit::provider_failed_err)?;

            let engine = Engine::new(EngineOptions {
                region: args.region.unwrap_or_else(|| cfg.aws.region.clone()),
                exclude_tokens: cfg.audit.exclude_tags.clone(),
                top_n: args.top.unwrap_or(cfg.audit.top_n),
                recency_window_days: cfg.audit.recency_window_days,
                kinds: resolve_kinds(&args.kind),
                show_progress: stderr_is_tty && !cli.quiet && !cli.json,
            });
            let report = engine.run(&provider);

            if cli.json {
                write_json(&report)?;
            } else if args.markdown {
                write_markdown_summary(&report)?;
            } else {
                crate::ui::print_report(&report, &ui_cfg);
            }
        }
        Commands::Config(args) => {
            if args.show {
                let toml = toml::to_string_pretty(&cfg)?;
                print!("{toml}");
            } else {
                return Err(crate::exit::invalid_args(
                    "config: nothing to do (try --show)",
                ));
            }
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "bkaudit", &mut io::stdout());
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Selected kinds in reference order, or all of them; duplicates dropped.
fn resolve_kinds(selected: &[ResourceKind]) -> Vec<ResourceKind> {
    if selected.is_empty() {
        return ResourceKind::ALL.to_vec();
    }
    let mut seen = HashSet::new();
    selected
        .iter()
        .copied()
        .filter(|kind| seen.insert(*kind))
        .collect()
}

fn write_json(report: &Report) -> Result<()> {
    use std::io::Write;

    let buf = serde_json::to_vec_pretty(report)?;

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn write_markdown_summary(report: &Report) -> Result<()> {
    use std::io::Write;

    let markdown = format_markdown_summary(report);
    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(markdown.as_bytes()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn format_markdown_summary(report: &Report) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();

    let _ = writeln!(out, "# Backup Coverage Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Tool version: {}", report.tool_version);
    let _ = writeln!(out, "- Generated at: {}", report.generated_at);
    let _ = writeln!(out, "- Region: {}", report.region);
    let _ = writeln!(
        out,
        "- Resources audited: {} (covered: {}, not covered: {}, errors: {})",
        report.summary.resources_audited,
        report.summary.covered,
        report.summary.not_covered,
        report.summary.discovery_errors
    );
    for note in &report.summary.notes {
        let _ = writeln!(out, "- Note: {note}");
    }

    for section in &report.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", section.title);
        let _ = writeln!(out);
        match &section.body {
            SectionBody::Banner { text } => {
                let _ = writeln!(out, "_{text}_");
            }
            SectionBody::Table { rows } => {
                let _ = writeln!(out, "| {} |", section.header.join(" | "));
                let rule: Vec<&str> = section.header.iter().map(|_| "---").collect();
                let _ = writeln!(out, "| {} |", rule.join(" | "));
                for row in rows {
                    let _ = writeln!(out, "| {} |", row.join(" | "));
                }
            }
        }
    }

    out
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    use clap_complete::Shell;

    match s.trim().to_ascii_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        _ => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {s} (expected bash|zsh|fish|powershell|elvish)"
        ))),
    }
}
