//! Query parameters for catalog requests.

/// Query-string key that carries the API credential. Never settable by callers.
pub const CREDENTIAL_KEY: &str = "api_key";

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Rendered comma-joined (`with_genres=28,12`).
    IdList(Vec<u64>),
}

impl ParamValue {
    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::IdList(ids) => ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        Self::Int(n as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<u64>> for ParamValue {
    fn from(ids: Vec<u64>) -> Self {
        Self::IdList(ids)
    }
}

/// Ordered query parameters; setting a key again replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layer `overrides` on top of `self`; later values win.
    pub fn merged(mut self, overrides: &Params) -> Self {
        for (k, v) in &overrides.entries {
            self.set(k, v.clone());
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Rendered pairs with the credential first. A caller-supplied
    /// credential key is dropped.
    pub fn to_query(&self, api_key: &str) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(self.entries.len() + 1);
        query.push((CREDENTIAL_KEY.to_string(), api_key.to_string()));
        query.extend(
            self.entries
                .iter()
                .filter(|(k, _)| k != CREDENTIAL_KEY)
                .map(|(k, v)| (k.clone(), v.render())),
        );
        query
    }
}
