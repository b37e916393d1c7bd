//! refsync CLI - project reference synchronization for monorepos
//!
//! Usage: refsync <COMMAND>
//!
//! Commands:
//!   check  Verify descriptors match the manifests (read-only)
//!   diff   Preview the changes apply would make
//!   apply  Write merged reference lists back to disk

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use refsync::config::Config;
use refsync::error::SyncError;
use refsync::sync::{Mode, Selection, SyncEngine, SyncEngineOptions};
use refsync::ui;

/// refsync - keep project references in sync with package manifests
#[derive(Parser, Debug)]
#[command(name = "refsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Workspace root directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Process a single module by name
    #[arg(short, long)]
    module: Option<String>,

    /// List direct dependencies only, not the transitive closure
    #[arg(long)]
    no_hoist: bool,

    /// Process workspace packages only
    #[arg(long, conflicts_with = "apps_only")]
    packages_only: bool,

    /// Process application artifacts only
    #[arg(long)]
    apps_only: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify descriptors match the manifests; exits non-zero on drift
    Check(RunArgs),
    /// Show unified diffs of the changes apply would make
    Diff(RunArgs),
    /// Write merged reference lists and alias maps to disk
    Apply(RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mode, args) = match &cli.command {
        Commands::Check(args) => (Mode::Check, args),
        Commands::Diff(args) => (Mode::DryRun, args),
        Commands::Apply(args) => (Mode::Apply, args),
    };

    let ok = run(mode, args, cli.json, cli.verbose > 0)?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn run(mode: Mode, args: &RunArgs, json: bool, verbose: bool) -> Result<bool> {
    let selection = if args.packages_only {
        Selection::PackagesOnly
    } else if args.apps_only {
        Selection::AppsOnly
    } else {
        Selection::All
    };

    let options = SyncEngineOptions {
        mode,
        module: args.module.clone(),
        hoist: !args.no_hoist,
        selection,
        verbose,
    };

    let config = Config::load_or_default(&args.root)?;
    let engine = SyncEngine::new(args.root.clone(), config, options);

    let report = match engine.run() {
        Ok(report) => report,
        // Cycles are a workspace-level fault: report every cycle in full
        // and exit non-zero without touching any descriptor.
        Err(err @ SyncError::CycleDetected { .. }) => {
            if json {
                let mut out = std::io::stdout().lock();
                ui::write_event(
                    &mut out,
                    &serde_json::json!({
                        "event": "error",
                        "message": err.to_string(),
                    }),
                )?;
            } else {
                eprintln!("{err}");
            }
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };

    let color = ui::supports_color() && !json;
    let mut out = std::io::stdout().lock();

    if json {
        ui::write_json_report(&mut out, &report, mode)?;
    } else {
        if mode == Mode::DryRun {
            ui::render_diffs(&mut out, &report, color)?;
        }
        ui::render_report(&mut out, &report, mode, verbose, color)?;
    }
    out.flush()?;

    Ok(report.success(mode))
}
