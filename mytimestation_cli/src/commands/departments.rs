use anyhow::Result;
use clap::{Args, Subcommand};
use mytimestation_api::{Client, Department, DepartmentCreateRequest};

use crate::output::{
    print_departments_csv, print_departments_markdown, print_departments_table, print_json,
    OutputFormat,
};

#[derive(Args)]
pub struct DepartmentsArgs {
    #[command(subcommand)]
    pub command: DepartmentsCommand,
}

#[derive(Subcommand)]
pub enum DepartmentsCommand {
    /// List all departments
    List,
    /// Create a department
    Create {
        /// Department name
        name: String,
    },
    /// Delete a department
    Delete {
        /// Department id
        id: String,
    },
}

pub async fn run(args: &DepartmentsArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let department = match &args.command {
        DepartmentsCommand::List => {
            let departments = client.departments().list().await?;
            eprintln!("{} departments", departments.len());
            return print_departments(&departments, format, || print_json(&departments));
        }
        DepartmentsCommand::Create { name } => {
            client
                .departments()
                .create(&DepartmentCreateRequest::new(name))
                .await?
        }
        DepartmentsCommand::Delete { id } => client.departments().delete(id).await?,
    };

    print_departments(std::slice::from_ref(&department), format, || {
        print_json(&department)
    })
}

fn print_departments(
    departments: &[Department],
    format: &OutputFormat,
    json: impl FnOnce(),
) -> Result<()> {
    match format {
        OutputFormat::Table => print_departments_table(departments),
        OutputFormat::Json => json(),
        OutputFormat::Csv => print_departments_csv(departments)?,
        OutputFormat::Markdown => print_departments_markdown(departments),
    }
    Ok(())
}
