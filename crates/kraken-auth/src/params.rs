//! Request parameters and form encoding
//!
//! Parameters are kept in key order, so the encoded body for a given set of
//! parameters is always the same byte string no matter the order in which
//! they were inserted. Nested values use the bracket convention understood
//! by Kraken:
//!
//! ```text
//! close => { ordertype => "limit", price => "100" }
//!     close[ordertype]=limit&close[price]=100      (before percent-encoding)
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{AuthError, AuthResult};

/// A single request parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Plain text value, sent as-is
    Text(String),
    /// Sequence, encoded as `key[0]`, `key[1]`, ...
    List(Vec<ParamValue>),
    /// Nested mapping, encoded as `key[sub]`
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// The text value, if this is a plain value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn flatten_into(&self, key: String, out: &mut Vec<(String, String)>) {
        match self {
            Self::Text(text) => out.push((key, text.clone())),
            Self::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    item.flatten_into(format!("{}[{}]", key, index), out);
                }
            }
            Self::Map(entries) => {
                for (sub_key, value) in entries {
                    value.flatten_into(format!("{}[{}]", key, sub_key), out);
                }
            }
        }
    }

    fn from_json(value: Value) -> AuthResult<Self> {
        Ok(match value {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Text(n.to_string()),
            Value::Bool(b) => Self::from(b),
            Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(Self::from_json)
                    .collect::<AuthResult<_>>()?,
            ),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| -> AuthResult<(String, Self)> { Ok((k, Self::from_json(v)?)) })
                    .collect::<AuthResult<_>>()?,
            ),
            Value::Null => {
                return Err(AuthError::InvalidParameter(
                    "null is not a valid parameter value".to_string(),
                ))
            }
        })
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

/// Flags are sent as `true`/`false`, the convention Kraken documents for
/// boolean fields such as `trades` and `validate`.
///
/// PHP's reference client encodes booleans through `http_build_query`,
/// which sends `1`/`0` instead. Kraken accepts both forms; insert the text
/// `"1"` or `"0"` to reproduce those bodies exactly.
impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Text(if value { "true" } else { "false" }.to_string())
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl<V: Into<ParamValue>> From<Vec<V>> for ParamValue {
    fn from(values: Vec<V>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<RequestParams> for ParamValue {
    fn from(params: RequestParams) -> Self {
        Self::Map(params.0)
    }
}

/// Parameters of a single API call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(BTreeMap<String, ParamValue>);

impl RequestParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from a JSON object
    ///
    /// Numbers keep their JSON text, booleans become `true`/`false`, arrays
    /// and objects become nested values.
    pub fn from_json(value: Value) -> AuthResult<Self> {
        match ParamValue::from_json(value)? {
            ParamValue::Map(entries) => Ok(Self(entries)),
            _ => Err(AuthError::InvalidParameter(
                "request parameters must be a JSON object".to_string(),
            )),
        }
    }

    /// Insert a parameter, returning the previous value for that key
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert the parameter only when a value is present
    pub fn with_opt<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Whether a parameter is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over top-level parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten nested values into `key[sub]` pairs, in key order
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            value.flatten_into(key.clone(), &mut pairs);
        }
        pairs
    }

    /// Encode as an `application/x-www-form-urlencoded` body
    pub fn to_form(&self) -> AuthResult<String> {
        serde_urlencoded::to_string(self.flatten())
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for RequestParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
