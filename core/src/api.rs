//! `Realtycloud`, the entry point application code talks to.
//!
//! Each method builds one request with the matching group client, runs it
//! through the transport and parses the response. One method call is one
//! HTTP round trip; nothing is retried or cached.

use serde_json::Value;
use tracing::debug;

use crate::client::{EgrnClient, RiskClient, StatusClient, SuggestClient};
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};
use crate::settings::ClientConfig;
use crate::transport::{Transport, UreqTransport};
use crate::types::{RealtyObject, RealtyOwner, Suggestion};

/// Synchronous Realtycloud API client.
///
/// The underlying connection pool lives as long as this value and is
/// released on drop; reuse one instance for sequential calls.
#[derive(Debug)]
pub struct Realtycloud<T = UreqTransport> {
    egrn: EgrnClient,
    risk: RiskClient,
    suggest: SuggestClient,
    status: StatusClient,
    transport: T,
}

impl Realtycloud<UreqTransport> {
    /// Production endpoints, 30 second timeout.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Realtycloud<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, Error> {
        config.check()?;
        Ok(Self {
            egrn: EgrnClient::new(&config),
            risk: RiskClient::new(&config),
            suggest: SuggestClient::new(&config),
            status: StatusClient::new(&config),
            transport,
        })
    }

    fn call(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.execute(request)?;
        debug!(method = method.as_str(), %url, status = response.status, "realtycloud call finished");
        Ok(response)
    }

    /// Cadastral numbers matching a free-text address.
    pub fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, Error> {
        let response = self.call(self.suggest.build_suggest(query))?;
        self.suggest.parse_suggest(response)
    }

    /// Object characteristics report.
    pub fn order_single_object(&self, object: &RealtyObject, priority: bool) -> Result<Option<Value>, Error> {
        self.order_multiple_objects(std::slice::from_ref(object), priority)
    }

    pub fn order_multiple_objects(&self, objects: &[RealtyObject], priority: bool) -> Result<Option<Value>, Error> {
        let response = self.call(self.egrn.build_object_order(objects, priority)?)?;
        self.egrn.parse_order(response)
    }

    /// Right-transfer-history report.
    pub fn order_single_right_list(&self, object: &RealtyObject, priority: bool) -> Result<Option<Value>, Error> {
        self.order_multiple_right_lists(std::slice::from_ref(object), priority)
    }

    pub fn order_multiple_right_lists(
        &self,
        objects: &[RealtyObject],
        priority: bool,
    ) -> Result<Option<Value>, Error> {
        let response = self.call(self.egrn.build_right_list_order(objects, priority)?)?;
        self.egrn.parse_order(response)
    }

    /// Characteristics and right-transfer-history reports in one order.
    pub fn order_single_full_data(&self, object: &RealtyObject, priority: bool) -> Result<Option<Value>, Error> {
        self.order_multiple_full_data(std::slice::from_ref(object), priority)
    }

    pub fn order_multiple_full_data(
        &self,
        objects: &[RealtyObject],
        priority: bool,
    ) -> Result<Option<Value>, Error> {
        let response = self.call(self.egrn.build_full_data_order(objects, priority)?)?;
        self.egrn.parse_order(response)
    }

    /// Risk assessment of the owners tied to `object`.
    pub fn order_risk_assessment_for_individual(
        &self,
        object: &RealtyObject,
        owners: &[RealtyOwner],
        priority: bool,
    ) -> Result<Option<Value>, Error> {
        let response = self.call(self.risk.build_risk_assessment(object, owners, priority)?)?;
        self.risk.parse_order(response)
    }

    /// Current status of previously ordered items.
    ///
    /// Statuses are `done`, `refund`, `deleted`, `waitingforpayment`,
    /// `actionrequired` and `inprogress`. Finished items carry download links
    /// such as `file_pdf_url`. Polling more often than every three minutes
    /// gains nothing. Pass `settings::DEFAULT_STATUS_LIMIT` as `limit` for
    /// the API default page size.
    pub fn check_status(&self, order_item_ids: &[String], offset: u32, limit: u32) -> Result<Option<Value>, Error> {
        let response = self.call(self.status.build_status(order_item_ids, offset, limit)?)?;
        self.status.parse_status(response)
    }
}
