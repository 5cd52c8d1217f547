use anyhow::Result;
use mytimestation_api::{Department, Employee, EmployeeStatus};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct EmployeeRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Department")]
    #[serde(rename = "Department")]
    department: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "PIN")]
    #[serde(rename = "PIN")]
    pin: String,
}

#[derive(Tabled, Serialize)]
struct DepartmentRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
}

// -- Row builders --

fn build_employee_rows(employees: &[Employee]) -> Vec<EmployeeRow> {
    employees
        .iter()
        .map(|e| EmployeeRow {
            id: e.id.clone(),
            name: e.name.clone(),
            title: e.title.clone().unwrap_or_default(),
            department: e
                .current_department
                .clone()
                .or_else(|| e.primary_department.clone())
                .unwrap_or_default(),
            status: format_status(e.status.as_ref()),
            pin: e.pin.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_department_rows(departments: &[Department]) -> Vec<DepartmentRow> {
    departments
        .iter()
        .map(|d| DepartmentRow {
            id: d.id.clone(),
            name: d.name.clone(),
        })
        .collect()
}

fn format_status(status: Option<&EmployeeStatus>) -> String {
    match status {
        Some(EmployeeStatus::In) => "in".to_string(),
        Some(EmployeeStatus::Out) => "out".to_string(),
        Some(EmployeeStatus::Other(s)) => s.clone(),
        None => String::new(),
    }
}

// -- Table output --

pub fn print_employees_table(employees: &[Employee]) {
    println!("{}", Table::new(build_employee_rows(employees)));
}

pub fn print_departments_table(departments: &[Department]) {
    println!("{}", Table::new(build_department_rows(departments)));
}

// -- Markdown output --

pub fn print_employees_markdown(employees: &[Employee]) {
    let mut table = Table::new(build_employee_rows(employees));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_departments_markdown(departments: &[Department]) {
    let mut table = Table::new(build_department_rows(departments));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

fn write_csv<T: Serialize>(rows: &[T], out: impl std::io::Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_employees_csv(employees: &[Employee]) -> Result<()> {
    write_csv(&build_employee_rows(employees), std::io::stdout())
}

pub fn print_departments_csv(departments: &[Department]) -> Result<()> {
    write_csv(&build_department_rows(departments), std::io::stdout())
}

// -- JSON output --

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
