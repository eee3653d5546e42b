//! End-to-end tests of the generic resource routes
//!
//! These tests verify the complete flow from HTTP request to response,
//! including `fields` / `expand` shaping and the error envelope.

use axum::http::StatusCode;
use axum_test::TestServer;
use schoolyard::prelude::*;
use std::sync::Arc;

// =============================================================================
// Fixtures
// =============================================================================

struct Fixture {
    server: TestServer,
    records: Arc<InMemoryRecordService>,
    subject_id: String,
}

async fn create_test_server() -> Fixture {
    let records = Arc::new(InMemoryRecordService::new());

    let grade = json!({
        "id": Uuid::new_v4().to_string(),
        "grade": "Grade 9",
        "level": 9,
        "has_stream": false,
        "sections": []
    });
    let teacher = json!({
        "id": Uuid::new_v4().to_string(),
        "first_name": "Abebe",
        "last_name": "Kebede",
        "email": "abebe@school.example",
        "phone": "+251911000000"
    });
    let subject = records
        .create(
            "subject",
            json!({
                "name": "Mathematics",
                "code": "MATH-9",
                "grades": [grade],
                "teachers": [teacher]
            }),
        )
        .await
        .expect("seed subject");
    records.create("grade", grade).await.expect("seed grade");
    records.create("teacher", teacher).await.expect("seed teacher");

    let app = ServerBuilder::new()
        .with_shared_record_service(records.clone())
        .with_schema(SchemaConfig::default_config())
        .build()
        .expect("Failed to build app");

    let server = TestServer::try_new(app).expect("Failed to create test server");

    Fixture {
        server,
        records,
        subject_id: subject["id"].as_str().unwrap().to_string(),
    }
}

// =============================================================================
// Health Check Tests
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let fixture = create_test_server().await;

        let response = fixture.server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let fixture = create_test_server().await;

        let response = fixture.server.get("/healthz").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

// =============================================================================
// Read Tests
// =============================================================================

mod read_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_uses_default_fields() {
        let fixture = create_test_server().await;

        let response = fixture.server.get("/teachers").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let teacher = &body["data"][0];
        assert_eq!(teacher["first_name"], "Abebe");
        assert_eq!(teacher["last_name"], "Kebede");
        assert!(teacher["id"].is_string());
        assert!(teacher.get("email").is_none());
        assert!(teacher.get("subjects").is_none());
    }

    #[tokio::test]
    async fn test_list_with_fields_and_expand() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .get("/subjects")
            .add_query_param("fields", "name")
            .add_query_param("expand", "grades")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let subject = &body["data"][0];
        assert_eq!(subject["name"], "Mathematics");
        assert!(subject.get("code").is_none());
        assert!(subject.get("teachers").is_none());

        let grade = &subject["grades"][0];
        assert_eq!(grade["grade"], "Grade 9");
        assert_eq!(grade["level"], 9);
        assert!(grade.get("sections").is_none());
    }

    #[tokio::test]
    async fn test_nested_fields_narrow_expansion() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .get("/subjects")
            .add_query_param("fields", "name,teachers.email")
            .add_query_param("expand", "teachers")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let teacher = &body["data"][0]["teachers"][0];
        assert_eq!(teacher["email"], "abebe@school.example");
        assert!(teacher["id"].is_string());
        assert!(teacher.get("first_name").is_none());
    }

    #[tokio::test]
    async fn test_get_record_by_id() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .get(&format!("/subjects/{}", fixture.subject_id))
            .add_query_param("fields", "code")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body, json!({ "code": "MATH-9", "id": fixture.subject_id }));
    }

    #[tokio::test]
    async fn test_pagination() {
        let fixture = create_test_server().await;
        for n in 0..4 {
            fixture
                .records
                .create("student", json!({ "student_number": format!("S-{:04}", n) }))
                .await
                .unwrap();
        }

        let response = fixture
            .server
            .get("/students")
            .add_query_param("page", "2")
            .add_query_param("limit", "3")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["student_number"], "S-0003");
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["pagination"]["limit"], 3);
        assert_eq!(body["pagination"]["total"], 4);
    }

    #[tokio::test]
    async fn test_page_past_usize_range_is_empty() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .get("/subjects")
            .add_query_param("page", usize::MAX.to_string())
            .add_query_param("limit", "100")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["pagination"]["has_next"], false);
        assert_eq!(body["pagination"]["total"], 1);
    }
}

// =============================================================================
// Rejected Query Tests
// =============================================================================

mod rejected_query_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_field_envelope() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .get("/subjects")
            .add_query_param("fields", "nickname")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({
                "message": "Invalid field requested",
                "meta": {
                    "invalid_field": "nickname",
                    "allowed_fields": ["id", "name", "code"]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_expand_envelope() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .get("/subjects")
            .add_query_param("expand", "students")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid expand requested");
        assert_eq!(body["meta"]["invalid_expand"], "students");
        assert_eq!(body["meta"]["allowed_expansions"], json!(["grades", "teachers"]));
    }

    #[tokio::test]
    async fn test_nested_invalid_field_reports_nested_allowed_set() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .get(&format!("/subjects/{}", fixture.subject_id))
            .add_query_param("fields", "grades.nickname")
            .add_query_param("expand", "grades")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["meta"]["invalid_field"], "nickname");
        assert_eq!(
            body["meta"]["allowed_fields"],
            json!(["id", "grade", "level", "has_stream"])
        );
    }
}

// =============================================================================
// Extractor Rejection Tests
// =============================================================================

mod rejection_tests {
    use super::*;
    use axum::body::Bytes;

    #[tokio::test]
    async fn test_malformed_query_uses_envelope() {
        let fixture = create_test_server().await;

        let response = fixture.server.get("/subjects?page=abc").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid query string")
        );
    }

    #[tokio::test]
    async fn test_non_json_body_uses_envelope() {
        let fixture = create_test_server().await;

        let response = fixture.server.post("/students").text("first_name=Liya").await;
        response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "Expected request with Content-Type: application/json"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_uses_envelope() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .post("/students")
            .bytes(Bytes::from_static(b"{\"first_name\": "))
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body")
        );
        assert_eq!(fixture.records.count("student"), 0);
    }
}

// =============================================================================
// Routing Error Tests
// =============================================================================

mod routing_error_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_resource_returns_404() {
        let fixture = create_test_server().await;

        let response = fixture.server.get("/lockers").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["meta"]["resource"], "lockers");
        assert!(
            body["meta"]["available"]
                .as_array()
                .unwrap()
                .contains(&json!("subjects"))
        );
    }

    #[tokio::test]
    async fn test_missing_record_returns_404() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .get(&format!("/subjects/{}", Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_returns_400() {
        let fixture = create_test_server().await;

        let response = fixture.server.get("/subjects/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("not-a-uuid"));
    }
}

// =============================================================================
// Write Tests
// =============================================================================

mod write_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_record() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .post("/students")
            .json(&json!({
                "student_number": "S-0100",
                "first_name": "Liya",
                "last_name": "Girma"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["first_name"], "Liya");
        assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
        assert_eq!(fixture.records.count("student"), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_non_object_body() {
        let fixture = create_test_server().await;

        let response = fixture.server.post("/students").json(&json!([1, 2])).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(fixture.records.count("student"), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_id() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .post("/students")
            .json(&json!({ "id": 42, "first_name": "Liya" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_with_existing_id_conflicts() {
        let fixture = create_test_server().await;

        let response = fixture
            .server
            .post("/subjects")
            .json(&json!({ "id": fixture.subject_id, "name": "Physics" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = response.json();
        assert_eq!(body["meta"]["resource"], "subjects");
        assert_eq!(body["meta"]["id"], fixture.subject_id);

        let response = fixture
            .server
            .get(&format!("/subjects/{}", fixture.subject_id))
            .add_query_param("fields", "name")
            .await;
        let body: Value = response.json();
        assert_eq!(body["name"], "Mathematics");
    }

    #[tokio::test]
    async fn test_delete_record() {
        let fixture = create_test_server().await;
        let path = format!("/subjects/{}", fixture.subject_id);

        let response = fixture.server.delete(&path).await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = fixture.server.get(&path).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = fixture.server.delete(&path).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
