mod common;

use common::{client_for, load_fixture};
use mytimestation_api::Sweeper;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PREFIX: &str = "mtstest";

async fn mount_listings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1.2/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("employees.json")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.2/departments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("departments.json")),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn collects_only_prefixed_resources_and_deletes_them() {
    let mock_server = MockServer::start().await;
    mount_listings(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path("/v1.2/employees/emp_2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("employee.json")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1.2/departments/dep_2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("department.json")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1.2/employees/emp_1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let sweeper = Sweeper::new(client_for(&mock_server));
    sweeper.collect_with_prefix(PREFIX).await.unwrap();
    assert_eq!(sweeper.pending().await, (1, 1));

    sweeper.sweep().await.unwrap();
    assert_eq!(sweeper.pending().await, (0, 0));

    // nothing left to delete, so a second sweep makes no calls
    sweeper.sweep().await.unwrap();
}

#[tokio::test]
async fn failures_are_aggregated_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1.2/employees/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1.2/employees/emp_1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("employee.json")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1.2/departments/dep_1"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            r#"{"error":{"error_code":500,"error_text":"department has employees"}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sweeper = Sweeper::new(client_for(&mock_server));
    sweeper.add_employee("gone").await;
    sweeper.add_employee("emp_1").await;
    sweeper.add_department("dep_1").await;

    let errors = sweeper.sweep().await.unwrap_err();
    assert_eq!(errors.len(), 2);

    let codes: Vec<_> = errors
        .iter()
        .map(|e| e.service().map(|s| s.code))
        .collect();
    assert_eq!(codes, vec![Some(404), Some(500)]);
    assert_eq!(
        errors.to_string(),
        "errors: [404] Not Found; [500] department has employees;"
    );
}

#[tokio::test]
async fn listing_failure_is_returned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.2/employees"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let sweeper = Sweeper::new(client_for(&mock_server));
    let err = sweeper.collect_with_prefix(PREFIX).await.unwrap_err();
    assert_eq!(err.service().map(|s| s.code), Some(401));
    assert_eq!(sweeper.pending().await, (0, 0));
}
