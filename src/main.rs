use anyhow::Result;
use std::time::Instant;
use top_urls_db::{
    cli::Cli,
    config::Config,
    gateway::Gateway,
    load::{LoadPipeline, SchemaObject},
    logging::register_logger,
    report::ReportRunner,
    schema::DependencyResolver,
};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    register_logger();

    if cli.list_objects {
        let resolver = DependencyResolver::new();
        println!("Tables and views in load order:\n");
        for object in LoadPipeline::objects()? {
            let deps = resolver.dependencies_of(object.name());
            let temp = if object.is_temporary() { " (temporary)" } else { "" };
            if deps.is_empty() {
                println!("  {} {}{}", object.kind(), object.name(), temp);
            } else {
                println!(
                    "  {} {}{} <- {}",
                    object.kind(),
                    object.name(),
                    temp,
                    deps.join(", ")
                );
            }
        }
        return Ok(());
    }

    let Some(credentials) = cli.credentials() else {
        println!("Please enter your username and password as command line arguments.");
        return Ok(());
    };

    let config = Config::from_cli(&cli)?;
    let start = Instant::now();

    let mut gateway = match Gateway::connect(&credentials, &config.connect) {
        Ok(gateway) => gateway,
        Err(e) => {
            error!("{}", e);
            println!("Failed to make connection!");
            return Ok(());
        }
    };

    let summary = LoadPipeline::new(&mut gateway, config.inputs.clone()).run()?;
    for (table, rows) in &summary.tables {
        info!("  {}: {} rows", table, rows);
    }

    if !config.skip_report {
        let stdout = std::io::stdout();
        let report = ReportRunner::standard(config.format).run(&gateway, &mut stdout.lock())?;
        if !report.failed.is_empty() {
            warn!("{} of {} reports failed", report.failed.len(), report.rendered);
        }
    }

    gateway.close()?;
    info!("Done in {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}
