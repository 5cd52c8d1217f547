//! Employee types and API methods.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

use crate::client::Client;
use crate::http::{BodyKind, RequestBody};
use crate::Error;

/// Employee related MyTimeStation API methods.
///
/// Ids are joined into the request path unescaped and the URL is then
/// normalized, so an id containing `/` or `..` addresses a different path
/// and spaces are sent as `%20`.
#[derive(Clone, Copy, Debug)]
pub struct EmployeeClient<'a> {
    client: &'a Client,
}

impl<'a> EmployeeClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Creates a new employee.
    pub async fn create(&self, req: &EmployeeCreateRequest) -> Result<Employee, Error> {
        let resp: EmployeeResponse = self.client.post("/employees", req).await?;
        Ok(resp.employee)
    }

    /// Gets an employee by id. `id` must be URL-safe.
    pub async fn get(&self, id: &str) -> Result<Employee, Error> {
        let resp: EmployeeResponse = self.client.get(&format!("/employees/{}", id)).await?;
        Ok(resp.employee)
    }

    /// Lists all employees.
    pub async fn list(&self) -> Result<Vec<Employee>, Error> {
        let resp: EmployeeListResponse = self.client.get("/employees").await?;
        Ok(resp.employees)
    }

    /// Updates an employee by id. `id` must be URL-safe.
    pub async fn update(&self, id: &str, req: &EmployeeUpdateRequest) -> Result<Employee, Error> {
        let resp: EmployeeResponse = self
            .client
            .put(&format!("/employees/{}", id), req)
            .await?;
        Ok(resp.employee)
    }

    /// Deletes an employee by id, returning the deleted record. `id` must
    /// be URL-safe.
    pub async fn delete(&self, id: &str) -> Result<Employee, Error> {
        let resp: EmployeeResponse = self.client.delete(&format!("/employees/{}", id)).await?;
        Ok(resp.employee)
    }
}

/// Clock-in state of an employee.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum EmployeeStatus {
    /// Clocked in.
    In,
    /// Clocked out.
    Out,
    /// Any value the API returns besides `in` and `out`.
    Other(String),
}

impl From<String> for EmployeeStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "in" => Self::In,
            "out" => Self::Out,
            _ => Self::Other(value),
        }
    }
}

impl From<EmployeeStatus> for String {
    fn from(status: EmployeeStatus) -> Self {
        match status {
            EmployeeStatus::In => "in".to_string(),
            EmployeeStatus::Out => "out".to_string(),
            EmployeeStatus::Other(value) => value,
        }
    }
}

/// An employee of a customer company.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Employee {
    /// Unique identifier of the employee within MyTimeStation.
    #[serde(rename = "employee_id", default)]
    pub id: String,

    /// Full name of the employee.
    #[serde(default)]
    pub name: String,

    /// Job title (e.g. Payroll Manager).
    #[serde(default)]
    pub title: Option<String>,

    /// Main department where the employee works.
    #[serde(default)]
    pub primary_department: Option<String>,

    #[serde(default)]
    pub primary_department_id: Option<String>,

    /// Department the employee is currently working in; may differ from the
    /// primary one.
    #[serde(default)]
    pub current_department: Option<String>,

    #[serde(default)]
    pub current_department_id: Option<String>,

    /// Current clock-in status.
    #[serde(default)]
    pub status: Option<EmployeeStatus>,

    /// Company-defined employee id, independent of [`Employee::id`].
    #[serde(default)]
    pub custom_employee_id: Option<String>,

    /// Personal identification number.
    #[serde(default)]
    pub pin: Option<String>,

    /// Physical card number used for clocking in/out.
    #[serde(default)]
    pub card_number: Option<String>,

    /// QR code printed on the employee's card.
    #[serde(default)]
    pub card_qr_code: Option<String>,

    /// Additional fields such as phone number or start date.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: HashMap<String, String>,
}

/// Response of the List method.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EmployeeListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub employees: Vec<Employee>,
}

/// Response of the Create, Get, Update and Delete methods.
#[derive(Debug, Deserialize, Serialize)]
pub struct EmployeeResponse {
    pub employee: Employee,
}

/// Form body for creating an employee. Empty optional fields are not sent.
///
/// Either `department_id` or `department_name` must be supplied.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EmployeeCreateRequest {
    /// Full name of the employee. Required.
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub department_id: String,

    /// Name of the department to assign; created when it does not exist.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub department_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub custom_employee_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,

    /// 4-digit PIN.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pin: String,

    /// Sent as `custom_fields[<name>]=<value>`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

impl EmployeeCreateRequest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl RequestBody for EmployeeCreateRequest {
    const KIND: BodyKind = BodyKind::Form;
}

/// JSON body for updating an employee.
///
/// `name` is always sent (as `null` when unset); every other field is only
/// sent when set.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EmployeeUpdateRequest {
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_employee_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,

    /// Keep the previous primary department as a secondary one when the
    /// primary department changes. Applies to this request only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convert_primary_department: Option<bool>,
}

impl RequestBody for EmployeeUpdateRequest {}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
