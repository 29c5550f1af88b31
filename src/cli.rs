use clap::Parser;
use std::path::PathBuf;

use crate::gateway::Credentials;
use crate::report::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "top-urls-db")]
#[command(version, about = "Load ranked URLs and TLD descriptions into SQLite and print the top 10s")]
pub struct Cli {
    /// Database user; names the database file
    pub user: Option<String>,

    /// Database password
    pub password: Option<String>,

    /// Directory holding the databases
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Fail instead of creating a database that does not exist yet
    #[arg(long)]
    pub existing: bool,

    /// Tab-separated TLD to description file
    #[arg(long, default_value = "mapping")]
    pub mapping: PathBuf,

    /// Tab-separated ranked URL file
    #[arg(long, default_value = "TopURLs")]
    pub urls: PathBuf,

    /// Treat a missing or unreadable input file as fatal
    #[arg(long)]
    pub strict_inputs: bool,

    /// Report output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Load only, do not print the reports
    #[arg(long)]
    pub skip_report: bool,

    /// Print the tables and views in load order and exit
    #[arg(long)]
    pub list_objects: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Both credentials, if both were given
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some(Credentials::new(user, password)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials() {
        let cli = Cli::try_parse_from(["top-urls-db"]).unwrap();
        assert!(cli.credentials().is_none());

        let cli = Cli::try_parse_from(["top-urls-db", "alice"]).unwrap();
        assert!(cli.credentials().is_none());

        let cli = Cli::try_parse_from(["top-urls-db", "alice", "secret"]).unwrap();
        let creds = cli.credentials().unwrap();
        assert_eq!(creds.identity, "alice");
        assert_eq!(creds.secret, "secret");
    }
}
