//! Typed client for the MyTimeStation time-and-attendance API.
//!
//! Requests go through an [`AuthTransport`] that adds Basic auth and the
//! standard headers, optionally dumps wire traffic for debugging, and maps
//! non-2xx responses to [`ServiceError`]s. Resource access is grouped under
//! [`Client::employees`] and [`Client::departments`].

mod client;
mod config;
pub mod department;
pub mod employee;
mod errors;
mod http;
mod logging;
pub mod sweeper;
mod transport;

pub use self::client::Client;
pub use self::config::{Config, Settings, AUTH_TOKEN_ENV_VAR};
pub use self::department::{
    Department, DepartmentClient, DepartmentCreateRequest, DepartmentListResponse,
    DepartmentResponse,
};
pub use self::employee::{
    Employee, EmployeeClient, EmployeeCreateRequest, EmployeeListResponse, EmployeeResponse,
    EmployeeStatus, EmployeeUpdateRequest,
};
pub use self::errors::{Error, ErrorList, ErrorResponse, ServiceError};
pub use self::http::{BodyKind, RequestBody};
pub use self::sweeper::Sweeper;
pub use self::transport::{AuthTransport, Transport};
