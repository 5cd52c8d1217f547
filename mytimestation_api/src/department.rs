//! Department types and API methods.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::employee::null_as_default;
use crate::http::{BodyKind, RequestBody};
use crate::Error;

/// Department related MyTimeStation API methods.
///
/// As with [`EmployeeClient`](crate::EmployeeClient), ids go into the path
/// unescaped: `..` segments are resolved and spaces become `%20`.
#[derive(Clone, Copy, Debug)]
pub struct DepartmentClient<'a> {
    client: &'a Client,
}

impl<'a> DepartmentClient<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Creates a new department.
    pub async fn create(&self, req: &DepartmentCreateRequest) -> Result<Department, Error> {
        let resp: DepartmentResponse = self.client.post("/departments", req).await?;
        Ok(resp.department)
    }

    pub async fn list(&self) -> Result<Vec<Department>, Error> {
        let resp: DepartmentListResponse = self.client.get("/departments").await?;
        Ok(resp.departments)
    }

    /// Deletes a department by id, returning the deleted record. `id` must
    /// be URL-safe.
    pub async fn delete(&self, id: &str) -> Result<Department, Error> {
        let resp: DepartmentResponse = self
            .client
            .delete(&format!("/departments/{}", id))
            .await?;
        Ok(resp.department)
    }
}

/// A department at a customer company.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Department {
    /// Unique identifier of the department within MyTimeStation.
    #[serde(rename = "department_id", default)]
    pub id: String,

    #[serde(default)]
    pub name: String,
}

/// Form body for creating a department.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DepartmentCreateRequest {
    /// Name of the department. Required.
    pub name: String,
}

impl DepartmentCreateRequest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl RequestBody for DepartmentCreateRequest {
    const KIND: BodyKind = BodyKind::Form;
}

/// Response of the List method.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DepartmentListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub departments: Vec<Department>,
}

/// Response of the Create and Delete methods.
#[derive(Debug, Deserialize, Serialize)]
pub struct DepartmentResponse {
    pub department: Department,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::encode_form;

    #[test]
    fn create_request_is_form_encoded() {
        let req = DepartmentCreateRequest::new("Research & Development");
        insta::assert_snapshot!(encode_form(&req).unwrap(), @"name=Research+%26+Development");
    }

    #[test]
    fn list_response_tolerates_null() {
        let resp: DepartmentListResponse =
            serde_json::from_str(r#"{"departments":null}"#).unwrap();
        assert!(resp.departments.is_empty());

        let resp: DepartmentListResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.departments.is_empty());
    }

    #[test]
    fn department_uses_wire_id_name() {
        let department: Department =
            serde_json::from_str(r#"{"department_id":"dep_9","name":"Ops"}"#).unwrap();
        assert_eq!(department.id, "dep_9");
        assert_eq!(
            serde_json::to_value(&department).unwrap(),
            serde_json::json!({ "department_id": "dep_9", "name": "Ops" })
        );
    }
}
