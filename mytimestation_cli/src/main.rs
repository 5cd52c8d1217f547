mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mytimestation_api::{Client, Config};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "mts")]
#[command(about = "Manage MyTimeStation employees and departments")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Dump every request and response to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// API host (default: api.mytimestation.com)
    #[arg(long, global = true)]
    host: Option<String>,

    /// API version path segment (default: v1.2)
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// URL scheme (default: https)
    #[arg(long, global = true)]
    protocol: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long, global = true)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List, inspect and modify employees
    Employees(commands::employees::EmployeesArgs),
    /// List, create and delete departments
    Departments(commands::departments::DepartmentsArgs),
    /// Delete every employee and department whose name starts with a prefix
    Sweep(commands::sweep::SweepArgs),
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::new().with_debug(self.debug);
        if let Some(ref host) = self.host {
            config = config.with_host(host);
        }
        if let Some(ref api_version) = self.api_version {
            config = config.with_api_version(api_version);
        }
        if let Some(ref protocol) = self.protocol {
            config = config.with_protocol(protocol);
        }
        if let Some(ref user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("mytimestation={}", level).parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let dispatch = tracing::dispatcher::get_default(Clone::clone);
    let client = Client::new(cli.config().with_log_dispatch(dispatch))?;

    match &cli.command {
        Commands::Employees(args) => commands::employees::run(args, &client, &format).await?,
        Commands::Departments(args) => commands::departments::run(args, &client, &format).await?,
        Commands::Sweep(args) => commands::sweep::run(args, client).await?,
    }

    Ok(())
}
