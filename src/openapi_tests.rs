use crate::schemas::ApiDoc;
use utoipa::openapi::{PathItemType, RefOr, schema::Schema};
use utoipa::OpenApi;

#[test]
fn test_openapi_schema_generation() {
    let openapi = ApiDoc::openapi();

    let components = openapi.components.as_ref().unwrap();
    for name in [
        "ErrorResponse",
        "HealthResponse",
        "AutomaticTransactionDto",
        "CreateAutomaticTransactionRequest",
        "BatchResultDto",
    ] {
        assert!(components.schemas.contains_key(name), "missing schema {}", name);
    }

    assert!(serde_json::to_string(&openapi).is_ok());
}

#[test]
fn test_error_response_schema_structure() {
    let openapi = ApiDoc::openapi();
    let components = openapi.components.as_ref().unwrap();

    if let Some(RefOr::T(Schema::Object(obj))) = components.schemas.get("ErrorResponse") {
        assert!(obj.properties.contains_key("error"));
        assert!(obj.properties.contains_key("code"));
        assert!(obj.properties.contains_key("success"));
    } else {
        panic!("ErrorResponse should be an object schema");
    }
}

#[test]
fn test_batch_result_schema_structure() {
    let openapi = ApiDoc::openapi();
    let components = openapi.components.as_ref().unwrap();

    if let Some(RefOr::T(Schema::Object(obj))) = components.schemas.get("BatchResultDto") {
        assert!(obj.properties.contains_key("processed_count"));
        assert!(obj.properties.contains_key("errors"));
    } else {
        panic!("BatchResultDto should be an object schema");
    }
}

#[test]
fn test_openapi_paths() {
    let openapi = ApiDoc::openapi();
    let paths = &openapi.paths.paths;

    let expected = [
        ("/health", PathItemType::Get),
        ("/api/v1/automatic-transactions", PathItemType::Post),
        ("/api/v1/automatic-transactions", PathItemType::Get),
        ("/api/v1/automatic-transactions/{id}", PathItemType::Get),
        ("/api/v1/automatic-transactions/{id}", PathItemType::Put),
        ("/api/v1/automatic-transactions/{id}/cancel", PathItemType::Post),
        ("/api/v1/automatic-transactions/{id}/pause", PathItemType::Post),
        ("/api/v1/automatic-transactions/{id}/resume", PathItemType::Post),
        ("/api/v1/automatic-transactions/{id}/preview", PathItemType::Get),
        ("/api/v1/automatic-transactions/{id}/occurrences", PathItemType::Get),
        ("/api/v1/cron/process", PathItemType::Post),
        ("/api/v1/admin/owners/{owner_id}/recalculate", PathItemType::Post),
    ];
    for (path, method) in expected {
        let item = paths
            .get(path)
            .unwrap_or_else(|| panic!("missing path {}", path));
        assert!(item.operations.contains_key(&method), "missing {:?} {}", method, path);
    }

    let process = paths.get("/api/v1/cron/process").unwrap();
    let responses = &process.operations.get(&PathItemType::Post).unwrap().responses;
    assert!(responses.responses.contains_key("200"));
    assert!(responses.responses.contains_key("401"));
    assert!(responses.responses.contains_key("500"));
}

#[test]
fn test_error_responses_reference_schema_by_name() {
    let openapi_json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

    assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
    assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
    assert!(openapi_json.contains("ErrorResponse"));
}
