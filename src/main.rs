//! aetl - Runs Athena queries and SQL scripts from the command line.

use aetl::cli::Cli;
use aetl::config::{Config, RunMode};
use aetl::error::Result;
use aetl::query::QueryExecutor;
use aetl::{logging, runner, service};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Pick up AWS_PROFILE, AWS_REGION, RUST_LOG, ... from a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    let log_file = if cli.log_stderr {
        logging::init_stderr_logging();
        None
    } else {
        logging::init_file_logging()
    };

    if let Err(e) = run(&cli).await {
        error!("{}: {}", e.category(), e);
        if e.is_config() {
            println!("{e}");
        } else if let Some(path) = &log_file {
            println!(
                "Something bad happened: {e}. See log file {} for details.",
                path.display()
            );
        } else {
            println!("Something bad happened: {e}.");
        }
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.athena.apply_env_overrides();

    let settings = cli.to_settings(&config)?;
    info!(
        "Region: {}, database: {}, output: {}",
        settings.region, settings.database, settings.output_location
    );

    let service = service::connect(&settings.region).await;
    let executor = QueryExecutor::new(
        service.as_ref(),
        &settings.database,
        &settings.output_location,
    )
    .with_poll_interval(settings.poll_interval)
    .with_timeout(settings.timeout);

    let mut stdout = std::io::stdout();
    match &settings.mode {
        RunMode::Query(sql) => {
            runner::run_query(&executor, sql, &mut stdout).await?;
        }
        RunMode::Script(path) => {
            runner::run_script(
                &executor,
                path,
                &settings.delimiter,
                settings.continue_on_error,
                &mut stdout,
            )
            .await?;
        }
    }

    Ok(())
}
