//! Deluge Web JSON-RPC envelopes.

use crate::error::{DelugeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cookie carrying the web session.
pub const SESSION_COOKIE: &str = "_session_id";

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub method: &'a str,
    pub params: Value,
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
    #[serde(default)]
    pub id: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: i64,
}

impl RpcResponse {
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(DelugeError::Rpc {
                code: err.code,
                message: err.message,
            }),
            None => Ok(self.result),
        }
    }
}

/// Decode a response body and unwrap its result.
pub fn decode_response(body: &str) -> Result<Value> {
    let response: RpcResponse = serde_json::from_str(body)?;
    response.into_result()
}

/// Normalize a server URL to its JSON-RPC endpoint.
pub fn endpoint_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(DelugeError::InvalidUrl(url.to_string()));
    }
    if trimmed.ends_with("/json") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}/json", trimmed))
    }
}

/// Session id from a `Set-Cookie` header value, if it sets the session
/// cookie.
pub fn session_cookie(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
}

pub fn expect_bool(method: &str, result: Value) -> Result<bool> {
    match result {
        Value::Bool(b) => Ok(b),
        other => Err(DelugeError::UnexpectedResult {
            method: method.to_string(),
            result: other,
        }),
    }
}

/// `enabled_plugins` from a `web.get_plugins` result.
pub fn enabled_plugins(result: Value) -> Result<Vec<String>> {
    #[derive(Deserialize)]
    struct Plugins {
        enabled_plugins: Vec<String>,
    }

    match serde_json::from_value::<Plugins>(result.clone()) {
        Ok(plugins) => Ok(plugins.enabled_plugins),
        Err(_) => Err(DelugeError::UnexpectedResult {
            method: "web.get_plugins".to_string(),
            result,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:8112").unwrap(),
            "http://localhost:8112/json"
        );
        assert_eq!(
            endpoint_url("https://box.lan/deluge/").unwrap(),
            "https://box.lan/deluge/json"
        );
        assert_eq!(
            endpoint_url("http://localhost:8112/json").unwrap(),
            "http://localhost:8112/json"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_other_schemes() {
        assert!(matches!(
            endpoint_url("localhost:8112"),
            Err(DelugeError::InvalidUrl(_))
        ));
        assert!(endpoint_url("ftp://box").is_err());
    }

    #[test]
    fn test_request_shape() {
        let req = RpcRequest {
            method: "tagging.get_tag_updates_dict",
            params: json!([]),
            id: 3,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"method": "tagging.get_tag_updates_dict", "params": [], "id": 3})
        );
    }

    #[test]
    fn test_response_ok() {
        let resp: RpcResponse =
            serde_json::from_value(json!({"result": true, "error": null, "id": 1})).unwrap();
        assert_eq!(resp.into_result().unwrap(), json!(true));
    }

    #[test]
    fn test_response_null_result() {
        let resp: RpcResponse =
            serde_json::from_value(json!({"result": null, "error": null, "id": 1})).unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_response_error() {
        let resp: RpcResponse = serde_json::from_value(json!({
            "result": null,
            "error": {"message": "Invalid tag", "code": 4},
            "id": 1
        }))
        .unwrap();
        match resp.into_result() {
            Err(DelugeError::Rpc { code, message }) => {
                assert_eq!(code, 4);
                assert_eq!(message, "Invalid tag");
            }
            other => panic!("expected RPC error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_response() {
        let value = decode_response(r#"{"result": [1, 2], "error": null, "id": 7}"#).unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_decode_response_not_json() {
        let err = decode_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, DelugeError::Json(_)));
    }

    #[test]
    fn test_decode_response_rpc_error() {
        let err = decode_response(r#"{"result": null, "error": {"message": "Not authenticated", "code": 1}, "id": 2}"#)
            .unwrap_err();
        assert!(matches!(err, DelugeError::Rpc { code: 1, .. }));
    }

    #[test]
    fn test_session_cookie() {
        assert_eq!(
            session_cookie("_session_id=abc123; Expires=Tue, 01 Jan 2030 00:00:00 GMT; Path=/json")
                .as_deref(),
            Some("abc123")
        );
        assert!(session_cookie("other=1; Path=/").is_none());
        assert!(session_cookie("_session_id=; Path=/").is_none());
        assert!(session_cookie("garbage").is_none());
    }

    #[test]
    fn test_expect_bool() {
        assert!(expect_bool("web.connected", json!(true)).unwrap());
        assert!(matches!(
            expect_bool("web.connected", json!("yes")),
            Err(DelugeError::UnexpectedResult { .. })
        ));
    }

    #[test]
    fn test_enabled_plugins() {
        let result = json!({
            "enabled_plugins": ["Label", "Tagging"],
            "available_plugins": ["Blocklist", "Label", "Tagging"]
        });
        assert_eq!(enabled_plugins(result).unwrap(), vec!["Label", "Tagging"]);
        assert!(enabled_plugins(json!(null)).is_err());
    }
}
