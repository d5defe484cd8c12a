//! Command line parsing

use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

pub const USAGE: &str = "\
Usage: pcb-inspect [--config <path>] <command>

Commands:
  snap                           Run an inspection session and save snapshot records
  report [<dir>] [--heatmap <png>]  Aggregate snapshot records into a confusion matrix";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Snap,
    Report {
        dir: Option<PathBuf>,
        heatmap: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub config: PathBuf,
    pub command: Command,
}

impl Cli {
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);
        let mut heatmap: Option<PathBuf> = None;
        let mut positional = Vec::new();

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().ok_or_else(|| anyhow!("--config needs a path"))?.into();
                }
                "--heatmap" => {
                    heatmap = Some(args.next().ok_or_else(|| anyhow!("--heatmap needs a path"))?.into());
                }
                flag if flag.starts_with('-') => bail!("Unknown option '{}'", flag),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            Some("snap") => Command::Snap,
            Some("report") => Command::Report {
                dir: positional.next().map(PathBuf::from),
                heatmap,
            },
            Some(other) => bail!("Unknown command '{}'", other),
            None => bail!("No command given"),
        };
        if let Some(extra) = positional.next() {
            bail!("Unexpected argument '{}'", extra);
        }

        Ok(Self { config, command })
    }
}
