//! Host plugin calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CallId;

/// One call received from the host bridge: its id plus a JSON argument object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeCall {
    /// Identifier the eventual resolution is addressed to.
    pub id: CallId,
    /// Caller-supplied arguments.
    #[serde(default)]
    pub args: Value,
}

impl BridgeCall {
    /// Creates a call with the given arguments.
    #[must_use]
    pub fn new(id: impl Into<CallId>, args: Value) -> Self {
        Self {
            id: id.into(),
            args,
        }
    }

    /// Creates a call carrying an empty argument object.
    #[must_use]
    pub fn without_args(id: impl Into<CallId>) -> Self {
        Self::new(id, Value::Object(serde_json::Map::new()))
    }

    /// Reads a string argument.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(Value::as_str)
    }

    /// Reads a string argument, falling back to `default` when absent or not a string.
    #[must_use]
    pub fn string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.string(key).unwrap_or(default)
    }

    /// Reads a boolean argument.
    #[must_use]
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.args.get(key).and_then(Value::as_bool)
    }

    /// Reads an array-of-strings argument.
    ///
    /// Returns `None` when the key is missing, is not an array, or holds a
    /// non-string element.
    #[must_use]
    pub fn string_array(&self, key: &str) -> Option<Vec<String>> {
        self.args
            .get(key)?
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(String::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_array_accepts_strings_only() {
        let call = BridgeCall::new("cb-1", json!({ "permissions": ["email", "public_profile"] }));
        assert_eq!(
            call.string_array("permissions"),
            Some(vec!["email".to_string(), "public_profile".to_string()])
        );

        let call = BridgeCall::new("cb-2", json!({ "permissions": ["email", 7] }));
        assert_eq!(call.string_array("permissions"), None);

        let call = BridgeCall::new("cb-3", json!({ "permissions": "email" }));
        assert_eq!(call.string_array("permissions"), None);

        let call = BridgeCall::without_args("cb-4");
        assert_eq!(call.string_array("permissions"), None);
    }

    #[test]
    fn test_scalar_accessors() {
        let call = BridgeCall::new("cb-1", json!({ "eventName": "purchase", "enabled": true }));
        assert_eq!(call.string("eventName"), Some("purchase"));
        assert_eq!(call.bool("enabled"), Some(true));
        assert_eq!(call.string_or("nonce", ""), "");
        assert_eq!(call.bool("missing"), None);
    }
}
