//! Path parameters captured by route patterns.

use std::iter::FromIterator;

/// A single captured parameter, consisting of a key and a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Param {
    pub key: String,
    pub value: String,
}

/// The parameters visible to the unit currently running.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// Parameters are kept in capture order, so they can be read either by name
/// or by index:
///
/// ```rust
/// # use stackrouter::Params;
/// let mut params = Params::default();
/// params.insert("user", "gordon");
/// params.insert("post", "routers");
///
/// assert_eq!(params.get("user"), Some("gordon"));
/// assert_eq!(params[1].key, "post");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params(Vec<Param>);

impl Params {
    /// Returns the value of the first parameter registered under the given key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.0
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }

    /// Inserts a parameter, replacing the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|param| param.key == key) {
            Some(param) => param.value = value,
            None => self.0.push(Param { key, value }),
        }
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<String> {
        let key = key.as_ref();
        let index = self.0.iter().position(|param| param.key == key)?;
        Some(self.0.remove(index).value)
    }

    /// Layers `inner` over these parameters. Keys present in both take the
    /// value from `inner`.
    pub fn merge(&mut self, inner: Params) {
        for Param { key, value } in inner.0 {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|param| (param.key.as_str(), param.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Index<usize> for Params {
    type Output = Param;

    fn index(&self, index: usize) -> &Param {
        &self.0[index]
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::default();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
