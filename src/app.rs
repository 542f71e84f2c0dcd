//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler,
//! then runs a single write (or a staging sweep) and reports the outcome.

use anyhow::{Result, anyhow};
use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use atomicfs::cli::Args;
use atomicfs::config::{CONFIG_ENV, create_template_config};
use atomicfs::fs_ops::{describe_error, io_error_with_help};
use atomicfs::output as out;
use atomicfs::config::AppConfig;
use atomicfs::shutdown::{self, InterruptibleReader};
use atomicfs::{FileWriter, WriteError, default_config_path, default_log_path, load_config};

use crate::logging::init_tracing;

/// Exit status for a run cut short by Ctrl-C (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(ExitCode::SUCCESS);
    }

    if args.init_config {
        let path = default_config_path()?;
        create_template_config(&path)?;
        out::print_success(&format!("A template atomicfs config was written to: {}", path.display()));
        out::print_info(&format!(
            "Edit it to set `staging_dir`, `temp_suffix`, `mode`, `log_level` and `log_file`. To use a different location set {CONFIG_ENV}."
        ));
        return Ok(ExitCode::SUCCESS);
    }

    // XML first, then CLI wins.
    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg);

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current step before exiting...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .map_err(|e| anyhow!("failed to install signal handler: {e}"))?;
    }

    debug!(?args, ?cfg, "Starting atomicfs");
    let writer = FileWriter::new(cfg.writer_options());

    let mut result = if shutdown::is_requested() {
        warn!("Interrupted before start; nothing written");
        Ok(ExitCode::from(EXIT_INTERRUPTED))
    } else if args.sweep {
        run_sweep(&writer, &cfg, &args)
    } else {
        run_write(&writer, &args)
    };

    if shutdown::is_requested() {
        out::print_warn("Interrupted; the operation above ran to completion or was rolled back.");
        if result.is_ok() {
            result = Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn print_config_location() {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}\n",
            std::path::Path::new(&explicit).display()
        ));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default atomicfs config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
    if let Ok(log) = default_log_path() {
        out::print_info(&format!("Suggested log file (set <log_file> or --log-file):\n  {}", log.display()));
    }
}

fn run_write(writer: &FileWriter, args: &Args) -> Result<ExitCode> {
    let Some(dest) = args.destination.as_deref() else {
        out::print_error("No DESTINATION given. Usage: atomicfs [OPTIONS] <DESTINATION>");
        return Ok(ExitCode::from(2));
    };

    let outcome = match args.source.as_deref() {
        Some(src) => {
            let file = File::open(src).map_err(io_error_with_help("open source", src))?;
            writer.write_file(InterruptibleReader::new(file), dest)
        }
        None => writer.write_file(InterruptibleReader::new(io::stdin().lock()), dest),
    };

    match outcome {
        Ok(done) => {
            info!(dest = %done.destination.display(), bytes = done.bytes, "Write completed");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

fn run_sweep(writer: &FileWriter, cfg: &AppConfig, args: &Args) -> Result<ExitCode> {
    // The platform temp dir is shared with other programs; only sweep a directory someone chose.
    if cfg.staging_dir.is_none() {
        out::print_error(&format!(
            "Refusing to sweep the shared temp directory {}. Pass --staging-dir (or set <staging_dir>) to name the directory to clean.",
            writer.config().staging_dir().display()
        ));
        return Ok(ExitCode::from(2));
    }
    match writer.sweep_orphans(args.min_age()) {
        Ok(report) => {
            for path in &report.removed {
                debug!(path = %path.display(), "Removed orphaned staging file");
            }
            for path in &report.failed {
                out::print_warn(&format!("Could not remove orphaned staging file {}", path.display()));
            }
            out::print_info(&format!(
                "Removed {} orphaned staging file(s); {} too recent to touch.",
                report.removed.len(),
                report.skipped_recent
            ));
            if report.failed.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

fn report_failure(e: &WriteError) -> ExitCode {
    let code = e.code();
    if e.is_committed() {
        warn!(code, kind = ?e.kind(), error = %e, "Write committed but not durable");
        out::print_warn(&describe_error(e));
    } else {
        error!(code, kind = ?e.kind(), error = %e, "Write failed");
        out::print_error(&describe_error(e));
    }
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
