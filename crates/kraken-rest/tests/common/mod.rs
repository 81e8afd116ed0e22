//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use kraken_rest::{
    ClientConfig, Credentials, HttpRequest, KrakenRestClient, Transport, TransportError,
};
use parking_lot::Mutex;

/// Secret from Kraken's REST authentication guide
pub const DOCS_SECRET: &str =
    "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";

/// Second secret used for a pinned AddOrder signature
pub const ALT_SECRET: &str =
    "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNGsBpl/jEP4bWJR4Y49DV+IQjCqFzZXVXuQ5t2l8rVMpo5c0dmSgA==";

/// Empty successful response
pub const EMPTY_OK: &str = r#"{"error":[],"result":{}}"#;

/// Sample Balance response
pub const BALANCE_RESPONSE: &str = r#"{
    "error": [],
    "result": {
        "ZUSD": "3415.8014",
        "ZEUR": "155.5649",
        "XXBT": "149.9688412800",
        "XXRP": "499889.51600000"
    }
}"#;

/// Sample AddOrder response for an order with a conditional close
pub const ADD_ORDER_RESPONSE: &str = r#"{
    "error": [],
    "result": {
        "descr": {
            "order": "buy 2.12345678 XBTUSD @ limit 101.9901 with 2:1 leverage",
            "close": "close position @ stop loss -5.0000%, take profit +10.00000"
        },
        "txid": ["OFMYYE-POAPQ-63IMWL"]
    }
}"#;

/// Sample rejection
pub const INSUFFICIENT_FUNDS: &str = r#"{"error":["EOrder:Insufficient funds"]}"#;

/// Transport that records requests and replays queued responses
///
/// When the queue is empty it answers with [`EMPTY_OK`].
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body
    pub fn respond(self, body: &str) -> Self {
        self.responses.lock().push_back(Ok(body.as_bytes().to_vec()));
        self
    }

    /// Queue a transport failure
    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Requests sent so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(EMPTY_OK.as_bytes().to_vec()))
    }
}

/// Client without credentials
pub fn public_client(transport: MockTransport) -> KrakenRestClient<MockTransport> {
    KrakenRestClient::with_transport(ClientConfig::default(), transport)
}

/// Client with credentials built from `secret`
pub fn private_client(secret: &str, transport: MockTransport) -> KrakenRestClient<MockTransport> {
    let creds = Credentials::new("API_KEY", secret).unwrap();
    KrakenRestClient::with_transport(ClientConfig::default().with_credentials(creds), transport)
}

/// Split a form body into `(key, value)` pairs, still percent-encoded
pub fn form_pairs(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (k, v) = p.split_once('=').unwrap_or((p, ""));
            (k.to_string(), v.to_string())
        })
        .collect()
}

/// Value of a top-level form field
pub fn form_value(body: &str, key: &str) -> Option<String> {
    form_pairs(body)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}
