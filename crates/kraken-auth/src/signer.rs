//! Request signing for private endpoints

use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::nonce::{Clock, MonotonicClock, SystemClock};
use crate::params::{ParamValue, RequestParams};

/// Default API version segment
pub const DEFAULT_API_VERSION: &str = "0";

/// Name of the nonce parameter
pub const NONCE_PARAM: &str = "nonce";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "API-Key";
/// Header carrying the request signature
pub const API_SIGN_HEADER: &str = "API-Sign";

/// A signed private request, ready to hand to an HTTP transport
///
/// The body must be sent byte-for-byte as produced; it is the exact input
/// the signature was computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// URL path, e.g. `/0/private/Balance`
    pub path: String,
    /// Form-encoded POST body, including the nonce
    pub body: String,
    /// Nonce used for this request
    pub nonce: String,
    /// Value of the `API-Key` header
    pub api_key: String,
    /// Value of the `API-Sign` header
    pub api_sign: String,
}

impl SignedRequest {
    /// The authentication headers, in order
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [
            (API_KEY_HEADER, self.api_key.as_str()),
            (API_SIGN_HEADER, self.api_sign.as_str()),
        ]
    }

    /// The POST body as bytes
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }
}

/// Builds signed requests for Kraken's private endpoints
///
/// The signer holds no mutable state of its own. The default clock is a
/// [`MonotonicClock`] over the system clock, so requests signed through the
/// same signer always get distinct, increasing nonces.
///
/// # Example
///
/// ```
/// use kraken_auth::{Credentials, FixedClock, RequestParams, RequestSigner};
///
/// let creds = Credentials::new("API_KEY", "c2VjcmV0").unwrap();
/// let signer = RequestSigner::new(creds).with_clock(FixedClock::new(1616492376, 594));
///
/// let signed = signer
///     .sign("Balance", RequestParams::new())
///     .unwrap();
///
/// assert_eq!(signed.path, "/0/private/Balance");
/// assert_eq!(signed.body, "nonce=1616492376000594");
/// ```
#[derive(Debug)]
pub struct RequestSigner<C = MonotonicClock<SystemClock>> {
    credentials: Credentials,
    version: String,
    path_prefix: String,
    clock: C,
}

impl RequestSigner {
    /// Create a signer using the system clock and API version `0`
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            version: DEFAULT_API_VERSION.to_string(),
            path_prefix: String::new(),
            clock: MonotonicClock::new(SystemClock),
        }
    }
}

impl<C: Clock> RequestSigner<C> {
    /// Replace the clock used for nonce generation
    pub fn with_clock<D: Clock>(self, clock: D) -> RequestSigner<D> {
        RequestSigner {
            credentials: self.credentials,
            version: self.version,
            path_prefix: self.path_prefix,
            clock,
        }
    }

    /// Set the API version segment of the path
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set a prefix placed in front of the versioned path
    ///
    /// Needed when the API is served below a sub-path of the host. The
    /// prefix is part of the signed path.
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// The credentials used for signing
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The API version segment
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The clock used for nonce generation
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// URL path of a private method
    pub fn private_path(&self, method: &str) -> String {
        format!("{}/{}/private/{}", self.path_prefix, self.version, method)
    }

    /// Sign a call to a private method
    ///
    /// A `nonce` already present in `params` is used unmodified; the caller
    /// is then responsible for it being larger than any nonce previously
    /// used with these credentials. Otherwise one is generated from a single
    /// clock reading.
    pub fn sign(&self, method: &str, mut params: RequestParams) -> AuthResult<SignedRequest> {
        let nonce = match params.get(NONCE_PARAM) {
            Some(ParamValue::Text(nonce)) => nonce.clone(),
            Some(_) => {
                return Err(AuthError::InvalidParameter(
                    "nonce must be a plain value".to_string(),
                ))
            }
            None => {
                let nonce = self.clock.now().to_nonce();
                params.insert(NONCE_PARAM, nonce.clone());
                nonce
            }
        };

        let body = params.to_form()?;
        let path = self.private_path(method);
        let api_sign = self.credentials.sign(&path, &nonce, &body)?;

        debug!(method, path = %path, "Signed private request");

        Ok(SignedRequest {
            path,
            body,
            nonce,
            api_key: self.credentials.api_key().to_string(),
            api_sign,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonce::FixedClock;

    const DOCS_SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";
    const ALT_SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNGsBpl/jEP4bWJR4Y49DV+IQjCqFzZXVXuQ5t2l8rVMpo5c0dmSgA==";

    fn add_order_params(pair: &str) -> RequestParams {
        RequestParams::new()
            .with("nonce", "1616492376594")
            .with("ordertype", "limit")
            .with("pair", pair)
            .with("price", "37500")
            .with("type", "buy")
            .with("volume", "1.25")
    }

    fn signer(secret: &str) -> RequestSigner {
        RequestSigner::new(Credentials::new("API_KEY", secret).unwrap())
    }

    #[test]
    fn test_documented_add_order_vector() {
        let signed = signer(DOCS_SECRET)
            .sign("AddOrder", add_order_params("XBTUSD"))
            .unwrap();

        assert_eq!(signed.path, "/0/private/AddOrder");
        assert_eq!(
            signed.body,
            "nonce=1616492376594&ordertype=limit&pair=XBTUSD&price=37500&type=buy&volume=1.25"
        );
        assert_eq!(signed.nonce, "1616492376594");
        assert_eq!(
            signed.api_sign,
            "4/dpxb3iT4tp/ZCVEwSnEsLxx0bqyhLpdfOpc6fn7OR8+UClSV5n9E6aSS8MPtnRfp32bAb0nmbRn6H8ndwLUQ=="
        );
    }

    #[test]
    fn test_second_add_order_vector() {
        let signed = signer(ALT_SECRET)
            .sign("AddOrder", add_order_params("XBTCUSD"))
            .unwrap();

        assert_eq!(
            signed.body,
            "nonce=1616492376594&ordertype=limit&pair=XBTCUSD&price=37500&type=buy&volume=1.25"
        );
        assert_eq!(
            signed.api_sign,
            "FodRO+i6fL5c+P70iPZgNm/WGkzHbtWDh33lqBQihG8HEBxKzpi6e6J0H1n9NZalDPKSiHQbBNQS2gf/ChNpHA=="
        );
    }

    #[test]
    fn test_generated_nonce_with_fixed_clock() {
        let signer = signer(ALT_SECRET).with_clock(FixedClock::new(1616492376, 594));
        let signed = signer.sign("Balance", RequestParams::new()).unwrap();

        assert_eq!(signed.nonce, "1616492376000594");
        assert_eq!(signed.body, "nonce=1616492376000594");
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = signer(ALT_SECRET);
        let first = signer.sign("AddOrder", add_order_params("XBTUSD")).unwrap();
        let second = signer.sign("AddOrder", add_order_params("XBTUSD")).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.body_bytes(), second.body_bytes());
        assert_eq!(first.headers(), second.headers());
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let signer = signer(ALT_SECRET);
        let params = RequestParams::new().with("trades", true);

        let first = signer.sign("OpenOrders", params.clone()).unwrap();
        let second = signer.sign("OpenOrders", params).unwrap();

        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.api_sign, second.api_sign);
        assert!(first.nonce.parse::<u128>().unwrap() < second.nonce.parse::<u128>().unwrap());
    }

    #[test]
    fn test_headers() {
        let signed = signer(ALT_SECRET)
            .sign("Balance", add_order_params("XBTUSD"))
            .unwrap();
        let headers = signed.headers();

        assert_eq!(headers[0], ("API-Key", "API_KEY"));
        assert_eq!(headers[1].0, "API-Sign");
        assert_eq!(headers[1].1, signed.api_sign);
    }

    #[test]
    fn test_version_and_prefix_in_path() {
        let prefixed = signer(ALT_SECRET)
            .with_version("1")
            .with_path_prefix("/proxy");
        assert_eq!(prefixed.private_path("Balance"), "/proxy/1/private/Balance");

        let signed = prefixed.sign("Balance", add_order_params("XBTUSD")).unwrap();
        let unprefixed = signer(ALT_SECRET)
            .sign("Balance", add_order_params("XBTUSD"))
            .unwrap();
        assert_eq!(signed.body, unprefixed.body);
        assert_ne!(signed.api_sign, unprefixed.api_sign);
    }

    #[test]
    fn test_structured_nonce_rejected() {
        let params = RequestParams::new().with("nonce", vec!["1", "2"]);
        let result = signer(ALT_SECRET).sign("Balance", params);
        assert!(matches!(result, Err(AuthError::InvalidParameter(_))));
    }
}
