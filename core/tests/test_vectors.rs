//! Verify build/parse/classify against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use realtycloud::{
    classify, ApiError, ClientConfig, EgrnClient, Error, HttpMethod, HttpRequest, HttpResponse, RealtyObject,
    StatusClient,
};

const BASE_URL: &str = "http://localhost:3000";

fn config() -> ClientConfig {
    ClientConfig::new("vector-key").with_base_url(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    assert_eq!(req.header("API-Key"), Some("vector-key"), "{name}: api key");
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, expected["body"], "{name}: body");
}

fn kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::BadRequest(_) => "BadRequest",
        ApiError::Forbidden(_) => "Forbidden",
        ApiError::NotFound(_) => "NotFound",
        ApiError::ServerError(_) => "ServerError",
        ApiError::InvalidKey(_) => "InvalidKey",
        ApiError::FieldError(_) => "FieldError",
        ApiError::RequestLimitExceeded(_) => "RequestLimitExceeded",
        ApiError::Status(_) => "Status",
    }
}

fn check_outcome(name: &str, case: &serde_json::Value, result: Result<Option<serde_json::Value>, Error>) {
    if let Some(expected_error) = case.get("expected_error") {
        match result.unwrap_err() {
            Error::Api(err) => assert_eq!(kind(&err), expected_error.as_str().unwrap(), "{name}: error kind"),
            other => panic!("{name}: expected API error, got {other:?}"),
        }
    } else {
        let data = result.unwrap().unwrap_or(serde_json::Value::Null);
        assert_eq!(data, case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Classify
// ---------------------------------------------------------------------------

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: vec![("Retry-After".to_string(), "60".to_string())],
            body: case["body"].as_str().unwrap().to_string(),
        };
        let err = classify(&response);
        assert_eq!(kind(&err), case["expected_kind"].as_str().unwrap(), "{name}: kind");
        assert_eq!(err.message(), case["expected_message"].as_str().unwrap(), "{name}: message");
        assert_eq!(err.status(), response.status, "{name}: status");
        assert_eq!(err.headers().get("retry-after").map(String::as_str), Some("60"), "{name}: headers");
    }
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

#[test]
fn order_test_vectors() {
    let raw = include_str!("../../test-vectors/order.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = EgrnClient::new(&config());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let priority = case["priority"].as_bool().unwrap();
        let objects: Vec<RealtyObject> = case["objects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| RealtyObject::new(o["key"].as_str().unwrap(), o["address"].as_str().unwrap()).unwrap())
            .collect();

        // Verify build
        let req = match case["operation"].as_str().unwrap() {
            "object" => c.build_object_order(&objects, priority),
            "right_list" => c.build_right_list_order(&objects, priority),
            "full_data" => c.build_full_data_order(&objects, priority),
            other => panic!("{name}: unknown operation: {other}"),
        }
        .unwrap();
        assert_request(name, &req, &case["expected_request"]);

        // Verify parse
        check_outcome(name, case, c.parse_order(simulated_response(case)));
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[test]
fn status_test_vectors() {
    let raw = include_str!("../../test-vectors/status.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = StatusClient::new(&config());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let ids: Vec<String> = serde_json::from_value(case["order_item_ids"].clone()).unwrap();
        let offset = case["offset"].as_u64().unwrap() as u32;
        let limit = case["limit"].as_u64().unwrap() as u32;

        // Verify build
        let req = c.build_status(&ids, offset, limit).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        // Verify parse
        check_outcome(name, case, c.parse_status(simulated_response(case)));
    }
}
