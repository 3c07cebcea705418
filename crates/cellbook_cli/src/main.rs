//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `cellbook_core` linkage.
//! - Render an exported document as clipboard plain text.

use cellbook_core::{
    init_logging, DocumentExport, EditorSession, LoggingConfig, NoSystemClipboard, SessionConfig,
};
use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Print a cellbook document as clipboard plain text.
#[derive(Parser, Debug)]
#[command(name = "cellbook_cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Exported document JSON to open
    document: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("cellbook_core ping={}", cellbook_core::ping());
    println!("cellbook_core version={}", cellbook_core::core_version());

    if let Some(dir) = cli.log_dir {
        if let Err(err) = init_logging(&LoggingConfig::new(dir)) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(path) = cli.document else {
        return ExitCode::SUCCESS;
    };

    let export = match DocumentExport::read_from_path(&path) {
        Ok(export) => export,
        Err(err) => {
            error!("event=cli_open module=cli status=error");
            eprintln!("failed to read {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    match EditorSession::from_export(export, SessionConfig::default(), NoSystemClipboard) {
        Ok(session) => {
            println!("title={}", session.title());
            println!("items={}", session.items().len());
            println!();
            println!("{}", session.plain_text());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_open module=cli status=error");
            eprintln!("invalid document {}: {err}", path.display());
            ExitCode::FAILURE
        }
    }
}
