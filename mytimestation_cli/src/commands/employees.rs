use std::collections::BTreeMap;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use mytimestation_api::{Client, Employee, EmployeeCreateRequest, EmployeeUpdateRequest};

use crate::output::{
    print_employees_csv, print_employees_markdown, print_employees_table, print_json,
    OutputFormat,
};

#[derive(Args)]
pub struct EmployeesArgs {
    #[command(subcommand)]
    pub command: EmployeesCommand,
}

#[derive(Subcommand)]
pub enum EmployeesCommand {
    /// List all employees
    List,
    /// Show one employee
    Get {
        /// Employee id
        id: String,
    },
    /// Create an employee
    Create(CreateArgs),
    /// Update an employee
    Update(UpdateArgs),
    /// Delete an employee
    Delete {
        /// Employee id
        id: String,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Department id to assign (or use --department-name)
    #[arg(long)]
    pub department_id: Option<String>,

    /// Department name to assign; created when missing
    #[arg(long)]
    pub department_name: Option<String>,

    /// Company-defined employee id
    #[arg(long)]
    pub custom_employee_id: Option<String>,

    /// Job title
    #[arg(long)]
    pub title: Option<String>,

    /// Hourly pay rate
    #[arg(long)]
    pub hourly_rate: Option<f64>,

    /// 4-digit PIN
    #[arg(long)]
    pub pin: Option<String>,

    /// Custom field as NAME=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Employee id
    pub id: String,

    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// New primary department id
    #[arg(long)]
    pub department_id: Option<String>,

    /// New primary department name
    #[arg(long)]
    pub department_name: Option<String>,

    /// Company-defined employee id
    #[arg(long)]
    pub custom_employee_id: Option<String>,

    /// Job title
    #[arg(long)]
    pub title: Option<String>,

    /// Hourly pay rate
    #[arg(long)]
    pub hourly_rate: Option<f64>,

    /// 4-digit PIN
    #[arg(long)]
    pub pin: Option<String>,

    /// Custom field as NAME=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Keep the old primary department as a secondary one
    #[arg(long)]
    pub convert_primary_department: bool,
}

impl CreateArgs {
    fn to_request(&self) -> Result<EmployeeCreateRequest> {
        if self.department_id.is_none() && self.department_name.is_none() {
            bail!("either --department-id or --department-name is required");
        }
        Ok(EmployeeCreateRequest {
            name: self.name.clone(),
            department_id: self.department_id.clone().unwrap_or_default(),
            department_name: self.department_name.clone().unwrap_or_default(),
            custom_employee_id: self.custom_employee_id.clone().unwrap_or_default(),
            title: self.title.clone().unwrap_or_default(),
            hourly_rate: self.hourly_rate,
            pin: self.pin.clone().unwrap_or_default(),
            custom_fields: self.fields.iter().cloned().collect(),
        })
    }
}

impl UpdateArgs {
    fn to_request(&self) -> EmployeeUpdateRequest {
        EmployeeUpdateRequest {
            name: self.name.clone(),
            department_id: self.department_id.clone(),
            department_name: self.department_name.clone(),
            custom_employee_id: self.custom_employee_id.clone(),
            title: self.title.clone(),
            hourly_rate: self.hourly_rate,
            pin: self.pin.clone(),
            custom_fields: self.fields.iter().cloned().collect::<BTreeMap<_, _>>(),
            convert_primary_department: self.convert_primary_department.then_some(true),
        }
    }
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

pub async fn run(args: &EmployeesArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let employee = match &args.command {
        EmployeesCommand::List => {
            let employees = client.employees().list().await?;
            eprintln!("{} employees", employees.len());
            return print_employees(&employees, format, || print_json(&employees));
        }
        EmployeesCommand::Get { id } => client.employees().get(id).await?,
        EmployeesCommand::Create(create) => {
            client.employees().create(&create.to_request()?).await?
        }
        EmployeesCommand::Update(update) => {
            client
                .employees()
                .update(&update.id, &update.to_request())
                .await?
        }
        EmployeesCommand::Delete { id } => client.employees().delete(id).await?,
    };

    print_employees(std::slice::from_ref(&employee), format, || {
        print_json(&employee)
    })
}

/// Prints `employees` as rows; JSON output is left to `json` so a single
/// record is not wrapped in an array.
fn print_employees(
    employees: &[Employee],
    format: &OutputFormat,
    json: impl FnOnce(),
) -> Result<()> {
    match format {
        OutputFormat::Table => print_employees_table(employees),
        OutputFormat::Json => json(),
        OutputFormat::Csv => print_employees_csv(employees)?,
        OutputFormat::Markdown => print_employees_markdown(employees),
    }
    Ok(())
}
