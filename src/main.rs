use anyhow::{Context, Result};
use inspect_core::{ConsolePrompt, JsonDirStore, Vocabulary};
use inspect_cv::{HeatmapRenderer, ReplayDetector};
use std::io;
use std::process::ExitCode;

mod cli;
mod config;
mod report;
mod session;

use cli::{Cli, Command, USAGE};
use config::InspectConfig;
use session::InspectionSession;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::parse(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = InspectConfig::load(&cli.config)?;

    match cli.command {
        Command::Snap => snap(config),
        Command::Report { dir, heatmap } => {
            let store = JsonDirStore::new(dir.unwrap_or_else(|| config.log_dir.clone()));
            let heatmap_path = heatmap.or(config.report.heatmap_path.clone());
            let renderer = HeatmapRenderer {
                cell_size: config.report.cell_size,
                ..Default::default()
            };
            report::run_report(
                &store,
                heatmap_path.as_deref().map(|path| (&renderer, path)),
                &mut io::stdout().lock(),
            )?;
            Ok(())
        }
    }
}

fn snap(config: InspectConfig) -> Result<()> {
    println!("\nStarting detection with snapshot logging...");

    let vocabulary = Vocabulary::load(&config.labels_file)?;
    let base_names = vocabulary
        .base_names()
        .with_context(|| format!("Invalid label vocabulary in {}", config.labels_file.display()))?;
    let detector = ReplayDetector::new(config.detection.clone())?;

    let mut session = InspectionSession::new(
        base_names,
        config.totals,
        detector,
        JsonDirStore::new(&config.log_dir),
        config.detection.visualization,
    );
    session.run(&mut ConsolePrompt::stdio())?;
    Ok(())
}
