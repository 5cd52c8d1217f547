//! Cleanup of temporary and test resources.

use tokio::sync::Mutex;

use crate::client::Client;
use crate::errors::{Error, ErrorList};

/// Tracks employees and departments slated for deletion and deletes them on
/// [`Sweeper::sweep`].
#[derive(Debug)]
pub struct Sweeper {
    client: Client,
    slate: Mutex<Slate>,
}

#[derive(Debug, Default)]
struct Slate {
    employee_ids: Vec<String>,
    department_ids: Vec<String>,
}

impl Sweeper {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            slate: Mutex::new(Slate::default()),
        }
    }

    /// Slates every employee and department whose name starts with `prefix`.
    pub async fn collect_with_prefix(&self, prefix: &str) -> Result<(), Error> {
        let mut slate = self.slate.lock().await;

        let employees = self.client.employees().list().await?;
        slate.employee_ids.extend(
            employees
                .into_iter()
                .filter(|e| e.name.starts_with(prefix))
                .map(|e| e.id),
        );

        let departments = self.client.departments().list().await?;
        slate.department_ids.extend(
            departments
                .into_iter()
                .filter(|d| d.name.starts_with(prefix))
                .map(|d| d.id),
        );

        Ok(())
    }

    /// Slates an employee for deletion.
    pub async fn add_employee(&self, id: &str) {
        self.slate.lock().await.employee_ids.push(id.to_string());
    }

    /// Slates a department for deletion.
    pub async fn add_department(&self, id: &str) {
        self.slate.lock().await.department_ids.push(id.to_string());
    }

    /// Number of slated employees and departments.
    pub async fn pending(&self) -> (usize, usize) {
        let slate = self.slate.lock().await;
        (slate.employee_ids.len(), slate.department_ids.len())
    }

    /// Deletes every slated employee, then every slated department.
    ///
    /// Each deletion is attempted regardless of earlier failures; all
    /// failures are returned together. The slate is emptied either way.
    pub async fn sweep(&self) -> Result<(), ErrorList> {
        let slate = std::mem::take(&mut *self.slate.lock().await);
        let mut errors = ErrorList::new();

        for id in &slate.employee_ids {
            match self.client.employees().delete(id).await {
                Ok(_) => self
                    .client
                    .logger()
                    .scope(|| tracing::info!(employee_id = %id, "deleted employee")),
                Err(e) => errors.push(e),
            }
        }

        for id in &slate.department_ids {
            match self.client.departments().delete(id).await {
                Ok(_) => self
                    .client
                    .logger()
                    .scope(|| tracing::info!(department_id = %id, "deleted department")),
                Err(e) => errors.push(e),
            }
        }

        errors.into_result()
    }
}
