//! Optional query/body parameters accepted by every endpoint.

use serde::{ser::SerializeMap, Serialize, Serializer};
use std::{fmt, iter::FromIterator};

/// Key extracted by `watched` to pick the user whose subscriptions are listed
pub const USER_KEY: &str = "user";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::String(s.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Integer(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Integer(i.into())
    }
}

impl From<u32> for ParamValue {
    fn from(i: u32) -> Self {
        ParamValue::Integer(i.into())
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Boolean(b)
    }
}

/// An insertion ordered set of parameters.
///
/// Inserting a key that is already present replaces the value but keeps the original position.
/// Serializes as a map, so the same set can be sent as a query string or as a json body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<K: Into<String>, V: Into<ParamValue>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| if k == key { Some(v) } else { None })
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Removes the `user` key, if present, returning its value as a string
    pub fn take_user(&mut self) -> Option<String> {
        self.remove(USER_KEY).map(|v| v.to_string())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<ParamValue>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Params {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Canonicalizes a caller supplied parameter set before it is sent.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, params: Params) -> Params;
}

/// The default `Normalizer`.
///
/// A leading `:` (symbol style, `:per_page`) is stripped, nothing else about the key changes.
/// Keys which collapse onto one another keep the last value.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyNormalizer;

impl KeyNormalizer {
    pub fn canonical_key(key: &str) -> &str {
        key.strip_prefix(':').unwrap_or(key)
    }
}

impl Normalizer for KeyNormalizer {
    fn normalize(&self, params: Params) -> Params {
        params
            .into_iter()
            .map(|(k, v)| {
                if k.starts_with(':') {
                    (Self::canonical_key(&k).to_owned(), v)
                } else {
                    (k, v)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::{KeyNormalizer, Normalizer, ParamValue, Params};

    #[test]
    fn insert_keeps_position() {
        let mut params = Params::new().with("a", 1).with("b", "two");
        assert_eq!(params.insert("a", true), Some(ParamValue::Integer(1)));

        let keys: Vec<_> = params.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(params.get("a"), Some(&ParamValue::Boolean(true)));
    }

    #[test]
    fn take_user() {
        let mut params = Params::new().with("user", "bob").with("per_page", 10);
        assert_eq!(params.take_user().as_deref(), Some("bob"));
        assert!(!params.contains_key("user"));
        assert_eq!(params.len(), 1);

        // Nothing to take
        assert_eq!(params.take_user(), None);
        assert_eq!(params.len(), 1);

        // Case sensitive
        let mut params = Params::new().with("User", "bob");
        assert_eq!(params.take_user(), None);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn normalize_keys() {
        let params = Params::new()
            .with(":per_page", 30)
            .with(":user", "bob")
            .with("per_page", 100);

        let params = KeyNormalizer.normalize(params);
        let entries: Vec<_> = params.iter().collect();
        assert_eq!(
            entries,
            [
                ("per_page", &ParamValue::Integer(100)),
                ("user", &ParamValue::String("bob".into())),
            ]
        );
    }

    #[test]
    fn normalize_keeps_whitespace() {
        let params = Params::new().with(" user ", "bob").with("user", "alice");

        let mut params = KeyNormalizer.normalize(params);
        assert_eq!(params.len(), 2);
        assert_eq!(params.take_user().as_deref(), Some("alice"));
        assert_eq!(params.get(" user "), Some(&ParamValue::String("bob".into())));
    }

    #[test]
    fn normalize_preserves_case() {
        let params = KeyNormalizer.normalize(Params::new().with("Subscribed", true));
        assert!(params.contains_key("Subscribed"));
    }

    #[test]
    fn serialize_as_json_object() {
        let params = Params::new()
            .with("subscribed", true)
            .with("ignored", false)
            .with("reason", "notifications");

        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"subscribed":true,"ignored":false,"reason":"notifications"}"#
        );
    }

    #[test]
    fn display() {
        assert_eq!(ParamValue::from(42).to_string(), "42");
        assert_eq!(ParamValue::from(false).to_string(), "false");
        assert_eq!(ParamValue::from("octocat").to_string(), "octocat");
    }
}
