mod config;
mod explain;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use fs_err as fs;
use packfix_core::{ToolError, ValidateOutcome, ValidateSettings, run_validate, write_report_artifact};
use packfix_domain::builtin_checks;
use packfix_types::artifact::ToolInfo;
use packfix_types::finding::{Finding, Severity};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "packfix",
    version,
    about = "Validate and repair an unpacked OOXML presentation tree."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a working tree; optionally apply fixes and re-validate.
    Validate(ValidateArgs),
    /// Explain a finding code and how to remediate it.
    Explain(ExplainArgs),
    /// List the validation checks and the codes they emit.
    ListChecks(ListChecksArgs),
}

#[derive(Debug, Parser)]
struct ValidateArgs {
    /// Root of the unpacked package (default: current directory).
    #[arg(default_value = ".")]
    work_dir: Utf8PathBuf,

    /// Apply automatic fixes, then re-validate.
    #[arg(long, default_value_t = false)]
    fix: bool,

    /// Allowlist patterns for fixable codes (e.g. "BROKEN_*").
    #[arg(long)]
    allow: Vec<String>,

    /// Denylist patterns for fixable codes.
    #[arg(long)]
    deny: Vec<String>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Directory for report.json (and fixes.patch after a fix pass).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Finding code to explain (e.g. "BROKEN_RELATIONSHIP").
    code: String,
}

#[derive(Debug, Parser)]
struct ListChecksArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Explain(args) => cmd_explain(args).map(|()| ExitCode::SUCCESS),
        Command::ListChecks(args) => cmd_list_checks(args).map(|()| ExitCode::SUCCESS),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("packfix: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(&args.work_dir)?;
    let merged = ConfigMerger::new(file_config).merge_validate_args(args.fix, &args.allow, &args.deny);

    let settings = ValidateSettings {
        work_dir: args.work_dir,
        fix: merged.fix,
        allow: merged.allow,
        deny: merged.deny,
    };

    let outcome = match run_validate(&settings, tool_info()) {
        Ok(outcome) => outcome,
        Err(ToolError::Internal(e)) => return Err(e),
    };

    if let Some(out_dir) = &args.out_dir {
        let path = write_report_artifact(out_dir, &outcome.artifact)?;
        info!(path = %path, "wrote report artifact");
        if let Some(pass) = &outcome.fix_pass
            && !pass.patch.is_empty()
        {
            fs::write(out_dir.join("fixes.patch"), &pass.patch)?;
        }
    }

    match args.format {
        OutputFormat::Text => print_text(&outcome, settings.fix),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.artifact)?);
        }
    }

    if outcome.report.valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn print_text(outcome: &ValidateOutcome, fixed_run: bool) {
    let report = &outcome.report;

    for finding in report.iter_all() {
        print_finding(finding);
    }

    if let Some(pass) = &outcome.fix_pass {
        let s = &pass.summary;
        if s.attempted > 0 || s.skipped > 0 {
            println!();
            println!(
                "Fixed {} issue(s), {} could not be fixed, {} skipped by policy",
                s.fixed, s.failed, s.skipped
            );
        }
    }

    println!();
    if report.valid && report.warnings.is_empty() {
        println!("✓ Package is valid");
    } else {
        println!(
            "Found {} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
        let fixable = report.fixable_count();
        if !fixed_run && fixable > 0 {
            println!("Fixable: {fixable} issue(s). Run with --fix to auto-repair");
        }
    }
}

fn print_finding(finding: &Finding) {
    let marker = match finding.severity {
        Severity::Error => "✗ Error",
        Severity::Warning => "⚠ Warning",
        Severity::Info => "ℹ Info",
    };
    println!("{marker}: [{}] {}", finding.code, finding.message);
    if let Some(file) = &finding.file {
        match finding.line {
            Some(line) => println!("  File: {file}:{line}"),
            None => println!("  File: {file}"),
        }
    }
    if let Some(suggestion) = &finding.suggestion {
        println!("  Suggestion: {suggestion}");
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "packfix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{list_code_keys, lookup_code};

    let Some(entry) = lookup_code(&args.code) else {
        let available = list_code_keys().join(", ");
        anyhow::bail!(
            "Unknown finding code: '{}'\n\nKnown codes: {}",
            args.code,
            available
        );
    };

    println!("================================================================================");
    println!("CODE: {}", entry.code);
    println!("================================================================================");
    println!();
    println!("Title:    {}", entry.title);
    println!("Severity: {}", entry.severity);
    println!("Fixable:  {}", if entry.fixable { "yes" } else { "no" });
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.description);
    println!();

    println!("REMEDIATION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.remediation);
    println!();

    Ok(())
}

fn cmd_list_checks(args: ListChecksArgs) -> anyhow::Result<()> {
    let checks = builtin_checks();

    match args.format {
        OutputFormat::Text => {
            println!("Validation checks, in run order:\n");
            println!("  {:<24} CODES", "CHECK");
            println!("  {:<24} -----", "-----");
            for check in &checks {
                let codes: Vec<&str> = check.codes().iter().map(|c| c.as_str()).collect();
                println!("  {:<24} {}", check.name(), codes.join(", "));
            }
            println!();
            println!("Use 'packfix explain <code>' for details.");
        }
        OutputFormat::Json => {
            let entries: Vec<_> = checks
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "check": c.name(),
                        "codes": c.codes().iter().map(|code| code.as_str()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}
