//! Request builders and response parsers for the four endpoint groups.
//!
//! # Design
//! Each group client holds its endpoint URL and the API key and nothing
//! else. `build_*` methods produce an `HttpRequest`, `parse_*` methods
//! consume an `HttpResponse`; neither touches the network. Any non-2xx
//! response is turned into an `ApiError` by `classify` before the body is
//! looked at.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{classify, Error};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::settings::{ClientConfig, API_KEY_HEADER};
use crate::types::{
    OrderItem, OrderMetadata, OrderRequest, Product, RawSuggestion, RealtyObject, RealtyOwner, StatusRequest,
    Suggestion,
};

/// URL plus credentials; shared shape of every group client.
#[derive(Debug, Clone)]
struct Endpoint {
    url: String,
    api_key: String,
}

impl Endpoint {
    fn new(url: &str, api_key: &str) -> Self {
        Self {
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "application/json".to_string()),
            (API_KEY_HEADER.to_string(), self.api_key.clone()),
        ]
    }

    fn get(&self, query: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url.clone(),
            query,
            headers: self.headers(),
            body: None,
        }
    }

    fn post<T: Serialize>(&self, payload: &T) -> Result<HttpRequest, Error> {
        let body = serde_json::to_string(payload).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url.clone(),
            query: Vec::new(),
            headers: self.headers(),
            body: Some(body),
        })
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// Fail with the classified `ApiError` unless the status is 2xx.
fn check_status(response: &HttpResponse) -> Result<(), Error> {
    if response.is_success() {
        return Ok(());
    }
    Err(classify(response).into())
}

fn parse_data<T: DeserializeOwned>(response: HttpResponse) -> Result<Option<T>, Error> {
    check_status(&response)?;
    let envelope: Envelope<T> =
        serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))?;
    Ok(envelope.data)
}

/// EGRN object and right-transfer-history reports.
#[derive(Debug, Clone)]
pub struct EgrnClient {
    endpoint: Endpoint,
}

impl EgrnClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoint: Endpoint::new(&config.order_url, &config.api_key),
        }
    }

    pub fn build_object_order(&self, objects: &[RealtyObject], priority: bool) -> Result<HttpRequest, Error> {
        self.build_order(objects, &[Product::object(priority)])
    }

    pub fn build_right_list_order(&self, objects: &[RealtyObject], priority: bool) -> Result<HttpRequest, Error> {
        self.build_order(objects, &[Product::right_list(priority)])
    }

    /// Both reports for every object, object report first.
    pub fn build_full_data_order(&self, objects: &[RealtyObject], priority: bool) -> Result<HttpRequest, Error> {
        self.build_order(objects, &[Product::object(priority), Product::right_list(priority)])
    }

    fn build_order(&self, objects: &[RealtyObject], products: &[Product]) -> Result<HttpRequest, Error> {
        let order_items: Vec<OrderItem> = objects
            .iter()
            .flat_map(|object| products.iter().map(move |product| object.to_payload(*product)))
            .collect();
        self.endpoint.post(&OrderRequest {
            order_items: &order_items,
        })
    }

    pub fn parse_order(&self, response: HttpResponse) -> Result<Option<Value>, Error> {
        parse_data(response)
    }
}

/// Owner risk assessment for one object.
#[derive(Debug, Clone)]
pub struct RiskClient {
    endpoint: Endpoint,
}

impl RiskClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoint: Endpoint::new(&config.order_url, &config.api_key),
        }
    }

    pub fn build_risk_assessment(
        &self,
        object: &RealtyObject,
        owners: &[RealtyOwner],
        priority: bool,
    ) -> Result<HttpRequest, Error> {
        let mut item = object.to_payload(Product::risk_assessment(priority));
        item.metadata = Some(OrderMetadata {
            owners_data: owners.iter().map(RealtyOwner::to_payload).collect(),
        });
        self.endpoint.post(&OrderRequest {
            order_items: std::slice::from_ref(&item),
        })
    }

    pub fn parse_order(&self, response: HttpResponse) -> Result<Option<Value>, Error> {
        parse_data(response)
    }
}

/// Cadastral number lookup by free-text address.
#[derive(Debug, Clone)]
pub struct SuggestClient {
    endpoint: Endpoint,
}

impl SuggestClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoint: Endpoint::new(&config.search_url, &config.api_key),
        }
    }

    pub fn build_suggest(&self, query: &str) -> HttpRequest {
        self.endpoint.get(vec![("query".to_string(), query.to_string())])
    }

    pub fn parse_suggest(&self, response: HttpResponse) -> Result<Vec<Suggestion>, Error> {
        let items: Option<Vec<RawSuggestion>> = parse_data(response)?;
        Ok(items.unwrap_or_default().into_iter().map(Suggestion::from).collect())
    }
}

/// Order item status polling.
#[derive(Debug, Clone)]
pub struct StatusClient {
    endpoint: Endpoint,
}

impl StatusClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoint: Endpoint::new(&config.status_url, &config.api_key),
        }
    }

    pub fn build_status(&self, order_item_ids: &[String], offset: u32, limit: u32) -> Result<HttpRequest, Error> {
        self.endpoint.post(&StatusRequest {
            order_item_ids,
            offset,
            limit,
        })
    }

    pub fn parse_status(&self, response: HttpResponse) -> Result<Option<Value>, Error> {
        parse_data(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::types::IndividualOwner;

    fn config() -> ClientConfig {
        ClientConfig::new("test-key").with_base_url("http://localhost:3000")
    }

    fn body_json(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn objects() -> Vec<RealtyObject> {
        vec![
            RealtyObject::new("77:01:0001001:1", "Москва").unwrap(),
            RealtyObject::with_key("50:21:0100101:22").unwrap(),
        ]
    }

    #[test]
    fn requests_carry_api_key_and_json_headers() {
        let req = SuggestClient::new(&config()).build_suggest("Тверская 1");
        assert_eq!(req.header("API-Key"), Some("test-key"));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("Accept"), Some("application/json"));
    }

    #[test]
    fn build_suggest_produces_get_with_query() {
        let req = SuggestClient::new(&config()).build_suggest("Тверская 1");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/search/");
        assert_eq!(req.query, vec![("query".to_string(), "Тверская 1".to_string())]);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_object_order_batches_all_objects() {
        let req = EgrnClient::new(&config()).build_object_order(&objects(), false).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/order/");
        let body = body_json(&req);
        let items = body["order_items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["product_name"], "EgrnObject");
        assert_eq!(items[0]["object_address"], "Москва");
        assert_eq!(items[1]["object_key"], "50:21:0100101:22");
        assert_eq!(items[1]["object_address"], "");
        assert!(items[0].get("metadata").is_none());
    }

    #[test]
    fn build_right_list_order_priority() {
        let req = EgrnClient::new(&config())
            .build_right_list_order(&objects()[..1], true)
            .unwrap();
        assert_eq!(body_json(&req)["order_items"][0]["product_name"], "EgrnRightListFast");
    }

    #[test]
    fn build_full_data_order_pairs_products_per_object() {
        let req = EgrnClient::new(&config()).build_full_data_order(&objects(), true).unwrap();
        let body = body_json(&req);
        let pairs: Vec<(String, String)> = body["order_items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| {
                (
                    item["product_name"].as_str().unwrap().to_string(),
                    item["object_key"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("EgrnObjectFast".to_string(), "77:01:0001001:1".to_string()),
                ("EgrnRightListFast".to_string(), "77:01:0001001:1".to_string()),
                ("EgrnObjectFast".to_string(), "50:21:0100101:22".to_string()),
                ("EgrnRightListFast".to_string(), "50:21:0100101:22".to_string()),
            ]
        );
    }

    #[test]
    fn build_risk_assessment_embeds_owners() {
        let owner = RealtyOwner::individual(IndividualOwner {
            last_name: "Иванов".to_string(),
            first_name: "Иван".to_string(),
            birthday: Some("01.02.2020".to_string()),
            ..Default::default()
        })
        .unwrap();
        let req = RiskClient::new(&config())
            .build_risk_assessment(&objects()[0], &[owner], false)
            .unwrap();
        let body = body_json(&req);
        let item = &body["order_items"][0];
        assert_eq!(item["product_name"], "RiskAssessmentV2");
        assert_eq!(item["object_key"], "77:01:0001001:1");
        let owners = item["metadata"]["ownersData"].as_array().unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0]["surname"], "Иванов");
        assert_eq!(owners[0]["birthday"], "2020-02-01T00:01:00.0Z");
        assert_eq!(owners[0]["owner_type"], 0);
    }

    #[test]
    fn build_risk_assessment_without_owners() {
        let req = RiskClient::new(&config())
            .build_risk_assessment(&objects()[0], &[], true)
            .unwrap();
        let body = body_json(&req);
        assert_eq!(body["order_items"][0]["product_name"], "RiskAssessmentFastV2");
        assert_eq!(body["order_items"][0]["metadata"]["ownersData"], serde_json::json!([]));
    }

    #[test]
    fn build_status_accepts_empty_ids() {
        let req = StatusClient::new(&config()).build_status(&[], 0, 1000).unwrap();
        assert_eq!(req.url, "http://localhost:3000/orders/");
        assert_eq!(
            body_json(&req),
            serde_json::json!({"order_item_ids": [], "offset": 0, "limit": 1000})
        );
    }

    #[test]
    fn parse_order_returns_data_field() {
        let data = EgrnClient::new(&config())
            .parse_order(response(200, r#"{"data": [{"order_item_id": "1"}], "meta": {}}"#))
            .unwrap();
        assert_eq!(data, Some(serde_json::json!([{"order_item_id": "1"}])));
    }

    #[test]
    fn parse_order_without_data_is_none() {
        let data = EgrnClient::new(&config()).parse_order(response(201, "{}")).unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn parse_order_bad_json() {
        let err = EgrnClient::new(&config())
            .parse_order(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn parse_status_classifies_errors() {
        let err = StatusClient::new(&config())
            .parse_status(response(500, r#"{"error": "невалидный ключ"}"#))
            .unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::InvalidKey(_))));
    }

    #[test]
    fn parse_suggest_reshapes_items() {
        let body = r#"{"data": [{"ObjectType": "Здание", "Number": "77:01:0001001:1", "Address": "Москва", "Area": "120", "kad_price": 5000000, "Status": "Актуально"}]}"#;
        let suggestions = SuggestClient::new(&config())
            .parse_suggest(response(200, body))
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].object_type, Some(serde_json::json!("Здание")));
        assert_eq!(suggestions[0].cadastral_price, Some(serde_json::json!(5000000)));
    }

    #[test]
    fn parse_suggest_accepts_numeric_object_type() {
        let body = r#"{"data": [{"ObjectType": 1, "Number": "77:01:0001001:1", "Status": 0}]}"#;
        let suggestions = SuggestClient::new(&config())
            .parse_suggest(response(200, body))
            .unwrap();
        assert_eq!(suggestions[0].object_type, Some(serde_json::json!(1)));
        assert_eq!(suggestions[0].status, Some(serde_json::json!(0)));
        assert_eq!(suggestions[0].address, None);
    }

    #[test]
    fn parse_suggest_missing_data_is_empty() {
        let suggestions = SuggestClient::new(&config())
            .parse_suggest(response(200, r#"{"data": null}"#))
            .unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn parse_suggest_not_found() {
        let err = SuggestClient::new(&config())
            .parse_suggest(response(404, ""))
            .unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::NotFound(_))));
    }
}
