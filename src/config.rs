use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::gateway::{ConnectOptions, OpenMode};
use crate::load::{Inputs, MissingInputPolicy};
use crate::report::ReportFormat;

/// Settings for one run, resolved from the command line
#[derive(Debug, Clone)]
pub struct Config {
    pub connect: ConnectOptions,
    pub inputs: Inputs,
    pub format: ReportFormat,
    pub skip_report: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };

        Ok(Self {
            connect: ConnectOptions {
                data_dir,
                mode: if cli.existing {
                    OpenMode::Existing
                } else {
                    OpenMode::Create
                },
            },
            inputs: Inputs {
                mapping_file: cli.mapping.clone(),
                urls_file: cli.urls.clone(),
                missing_input: if cli.strict_inputs {
                    MissingInputPolicy::Fail
                } else {
                    MissingInputPolicy::Warn
                },
            },
            format: cli.format,
            skip_report: cli.skip_report,
        })
    }
}

/// Platform data directory that holds one database per identity
pub fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "top-urls-db")
        .context("Could not determine data directory")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
