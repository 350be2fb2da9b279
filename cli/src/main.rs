//! Project Graph seeder: command-line interface
//!
//! Uses the project-graph-sdk RemoteClient to seed and inspect a running
//! ArangoDB server. Without a subcommand the sample data is loaded.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use project_graph_sdk::{
    load_collections, verify, Dataset, DocumentClient, RemoteClient, SeedConfig, Seeder,
};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "project-graph-seed", version, about = "Project graph sample data seeder")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "PROJECT_GRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// ArangoDB host
    #[arg(long, global = true, env = "ARANGO_HOST")]
    host: Option<String>,

    /// ArangoDB port
    #[arg(long, global = true, env = "ARANGO_PORT")]
    port: Option<u16>,

    /// Connect over HTTPS
    #[arg(long, global = true, env = "ARANGO_SSL")]
    ssl: bool,

    /// User to authenticate as
    #[arg(long, global = true, env = "ARANGO_USER")]
    user: Option<String>,

    /// Password of that user
    #[arg(long, global = true, env = "ARANGO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database to seed
    #[arg(long, global = true, env = "ARANGO_DATABASE")]
    database: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and collections, then load the sample data
    Seed {
        /// Do not print progress lines
        #[arg(long)]
        quiet: bool,
    },
    /// Check that the database holds exactly the sample data
    Verify,
    /// Show the first documents of each collection
    Inspect {
        /// Only collections whose name contains this text
        filter: Option<String>,

        /// Documents per collection, 0 for all
        #[arg(long, default_value_t = project_graph_sdk::DEFAULT_PAGE_SIZE)]
        size: usize,
    },
    /// Show server version and databases
    Status,
}

impl Cli {
    /// Configuration file values, overridden by flags and environment
    fn seed_config(&self) -> Result<SeedConfig, Box<dyn std::error::Error>> {
        let mut config = SeedConfig::load(self.config.as_deref())?;
        if let Some(host) = &self.host {
            config.arango.host = host.clone();
        }
        if let Some(port) = self.port {
            config.arango.port = port;
        }
        if self.ssl {
            config.arango.use_ssl = true;
        }
        if let Some(user) = &self.user {
            config.arango.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.arango.password = password.clone();
        }
        if let Some(database) = &self.database {
            config.arango.database = database.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = run(&cli).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> CliResult {
    let config = cli.seed_config()?;
    let client = RemoteClient::from_config(&config.arango);
    debug!("using server {}", client.base_url());

    match &cli.command {
        None => run_seed(&client, &config, false, &cli.format).await,
        Some(Commands::Seed { quiet }) => run_seed(&client, &config, *quiet, &cli.format).await,
        Some(Commands::Verify) => run_verify(&client, &config, &cli.format).await,
        Some(Commands::Inspect { filter, size }) => {
            run_inspect(&client, &config, filter.as_deref(), *size, &cli.format).await
        }
        Some(Commands::Status) => run_status(&client, &cli.format).await,
    }
}

async fn run_seed(
    client: &RemoteClient,
    config: &SeedConfig,
    quiet: bool,
    format: &OutputFormat,
) -> CliResult {
    let progress = !quiet && matches!(format, OutputFormat::Table);
    let report = Seeder::new(client, &config.arango.database, config.bootstrap_user.clone())
        .with_progress(progress)
        .run()
        .await?;

    if let OutputFormat::Json = format {
        let collections: Vec<_> = report
            .collections
            .iter()
            .map(|c| {
                json!({
                    "name": c.name,
                    "created": c.created,
                    "removed": c.removed,
                    "inserted": c.inserted,
                })
            })
            .collect();
        let body = json!({
            "database": report.database,
            "databaseCreated": report.database_created,
            "collections": collections,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    }

    Ok(())
}

async fn run_verify(client: &RemoteClient, config: &SeedConfig, format: &OutputFormat) -> CliResult {
    let report = verify(client, &config.arango.database, &Dataset::sample()).await?;

    match format {
        OutputFormat::Json => {
            let collections: Vec<_> = report
                .collections
                .iter()
                .map(|c| {
                    json!({
                        "name": c.name,
                        "expected": c.expected,
                        "actual": c.actual,
                        "matches": c.matches,
                    })
                })
                .collect();
            let problems: Vec<String> = report
                .violations
                .iter()
                .map(ToString::to_string)
                .chain(report.decode_errors.iter().map(ToString::to_string))
                .collect();
            let body = json!({
                "ok": report.is_ok(),
                "collections": collections,
                "problems": problems,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Collection", "Expected", "Actual", "Status"]);
            for check in &report.collections {
                let actual = match check.actual {
                    Some(n) => n.to_string(),
                    None => "missing".to_string(),
                };
                let status = if check.matches { "ok" } else { "MISMATCH" };
                table.add_row(vec![
                    check.name.clone(),
                    check.expected.to_string(),
                    actual,
                    status.to_string(),
                ]);
            }
            println!("{}", table);

            for violation in &report.violations {
                println!("violation: {}", violation);
            }
            for error in &report.decode_errors {
                println!("undecodable: {}", error);
            }
        }
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(format!(
            "database {} does not match the sample data",
            config.arango.database
        )
        .into())
    }
}

async fn run_inspect(
    client: &RemoteClient,
    config: &SeedConfig,
    filter: Option<&str>,
    size: usize,
    format: &OutputFormat,
) -> CliResult {
    let snapshots = load_collections(client, &config.arango.database, filter, size).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
        }
        OutputFormat::Table => {
            if snapshots.is_empty() {
                println!("(no collections)");
                return Ok(());
            }

            for snapshot in &snapshots {
                println!(
                    "{} ({} of {} document(s))",
                    snapshot.name, snapshot.size, snapshot.total_count
                );
                if snapshot.rows.is_empty() {
                    println!();
                    continue;
                }

                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(&snapshot.columns);
                for row in 0..snapshot.rows.len() {
                    let cells: Vec<String> = snapshot
                        .columns
                        .iter()
                        .map(|column| snapshot.cell(row, column))
                        .collect();
                    table.add_row(cells);
                }
                println!("{}", table);

                if snapshot.has_more() {
                    println!("more available: --size {}", snapshot.next_size());
                }
                println!();
            }
        }
    }

    Ok(())
}

async fn run_status(client: &RemoteClient, format: &OutputFormat) -> CliResult {
    let version = client.version().await?;
    let databases = client.list_databases().await?;

    match format {
        OutputFormat::Json => {
            let body = json!({
                "server": version.server,
                "version": version.version,
                "license": version.license,
                "databases": databases,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => {
            println!("Server:    {}", version.server);
            println!("Version:   {}", version.version);
            println!("Databases: {}", databases.join(", "));
        }
    }

    Ok(())
}
