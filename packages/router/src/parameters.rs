//! Case-insensitive, typed access to the parameters of a route hit.

use crate::matcher::RouteMatchResult;

/// The parameters extracted from a URL by a successful match.
///
/// All names are lower-cased when they are stored and when they are looked up, so lookups
/// never depend on how the route expression or the URL spelled a key. Values keep their
/// original casing. A parameter can be present without a value, which is what optional search
/// placeholders (`{*}`) produce when the URL leaves them out.
///
/// None of the getters panic or error: anything missing or unparsable is [`None`].
///
/// ```rust
/// # use waymark_router::RouteParameters;
/// let parameters: RouteParameters = [("Page", Some("12th")), ("Draft", Some("YES"))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(parameters.get("PAGE"), Some("12th"));
/// assert_eq!(parameters.get_as_int("page"), Some(12));
/// assert_eq!(parameters.get_as_bool("draft"), Some(true));
/// assert_eq!(parameters.get_as_float("missing"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteParameters {
    values: Vec<(String, Option<String>)>,
}

impl RouteParameters {
    /// Create an empty set of parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any earlier value for the same name.
    pub fn insert(&mut self, name: &str, value: Option<String>) {
        let name = name.to_lowercase();
        match self.values.iter_mut().find(|(k, _)| *k == name) {
            Some(existing) => existing.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Get the raw value of `name`.
    ///
    /// Returns [`None`] both for unknown names and for names that are present without a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.values
            .iter()
            .find(|(k, _)| *k == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Check whether `name` is present, with or without a value.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.values.iter().any(|(k, _)| *k == name)
    }

    /// Parse the leading integer of the value of `name`.
    ///
    /// Leading whitespace and a sign are accepted, anything after the digits is ignored. A
    /// value without leading digits, or one that doesn't fit an [`i64`], gives [`None`].
    pub fn get_as_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(int_prefix)
    }

    /// Parse the leading decimal number of the value of `name`.
    ///
    /// Accepts a sign, a fraction, an exponent and `Infinity`; anything after the number is
    /// ignored.
    pub fn get_as_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(float_prefix)
    }

    /// Interpret the value of `name` as a boolean.
    ///
    /// `true`, `yes` and `1` are [`true`], `false`, `no` and `0` are [`false`], ignoring
    /// case. Anything else is [`None`].
    pub fn get_as_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)?.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    /// Iterate over all parameters in the order they were extracted.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// The number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether there are no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, Option<V>)> for RouteParameters {
    fn from_iter<T: IntoIterator<Item = (K, Option<V>)>>(iter: T) -> Self {
        let mut parameters = Self::new();
        for (name, value) in iter {
            parameters.insert(name.as_ref(), value.map(Into::into));
        }
        parameters
    }
}

impl From<RouteMatchResult> for RouteParameters {
    fn from(result: RouteMatchResult) -> Self {
        result.parameters.into_iter().collect()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RouteParameters {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn int_prefix(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let bytes = value.as_bytes();

    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = bytes[sign..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();

    if digits == 0 {
        return None;
    }
    value[..sign + digits].parse().ok()
}

fn float_prefix(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let bytes = value.as_bytes();
    let len = bytes.len();
    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if value[end..].starts_with("Infinity") {
        return value[..end + "Infinity".len()].parse().ok();
    }

    let integer_digits = count_digits(end);
    end += integer_digits;
    let mut mantissa_digits = integer_digits;

    if end < len && bytes[end] == b'.' {
        let fraction_digits = count_digits(end + 1);
        if mantissa_digits + fraction_digits > 0 {
            end += 1 + fraction_digits;
            mantissa_digits += fraction_digits;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exponent = end + 1;
        if exponent < len && matches!(bytes[exponent], b'+' | b'-') {
            exponent += 1;
        }
        let exponent_digits = count_digits(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    value[..end].parse().ok()
}
