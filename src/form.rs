//! Flat `application/x-www-form-urlencoded` bodies
//!
//! [`FormData`] keeps fields in insertion order so the encoded body is
//! deterministic. The default [`FormEncoding::Verbatim`] mode inserts keys
//! and values as-is: a value containing `&` or `=` corrupts the body and the
//! caller must sanitize it first. [`FormEncoding::Percent`] escapes them.

use url::form_urlencoded;

/// How keys and values are written into the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormEncoding {
    /// `key=value` pairs inserted without escaping
    #[default]
    Verbatim,
    /// `key=value` pairs percent-encoded per the urlencoded form rules
    Percent,
}

/// Ordered flat mapping from field name to value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Re-inserting a key replaces its value and keeps its
    /// original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode without escaping: `k1=v1&k2=v2`
    pub fn encode(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Encode with percent-escaping of reserved characters
    pub fn encode_escaped(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Encode using the given mode
    pub fn encode_with(&self, encoding: FormEncoding) -> String {
        match encoding {
            FormEncoding::Verbatim => self.encode(),
            FormEncoding::Percent => self.encode_escaped(),
        }
    }

    /// Split a verbatim body back into fields.
    ///
    /// Only the first `=` of each pair separates key from value; a pair
    /// without `=` becomes a key with an empty value.
    pub fn decode(body: &str) -> Self {
        body.split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (k, v) in iter {
            form.insert(k, v);
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::{FormData, FormEncoding};

    #[test]
    fn empty_form_encodes_to_empty_string() {
        assert_eq!(FormData::new().encode(), "");
    }

    #[test]
    fn encode_keeps_insertion_order() {
        let form = FormData::new().field("a", 1).field("b", 2);
        assert_eq!(form.encode(), "a=1&b=2");

        let form = FormData::new().field("b", 2).field("a", 1);
        assert_eq!(form.encode(), "b=2&a=1");
    }

    #[test]
    fn reinserting_replaces_in_place() {
        let mut form = FormData::new();
        form.insert("name", "x").insert("grade", "A").insert("name", "y");
        assert_eq!(form.len(), 2);
        assert_eq!(form.encode(), "name=y&grade=A");
    }

    #[test]
    fn verbatim_mode_does_not_escape() {
        let form = FormData::new().field("q", "a b&c=d");
        assert_eq!(form.encode(), "q=a b&c=d");
    }

    #[test]
    fn percent_mode_escapes_reserved_characters() {
        let form = FormData::new().field("q", "a b&c=d");
        assert_eq!(form.encode_with(FormEncoding::Percent), "q=a+b%26c%3Dd");
    }

    #[test]
    fn decode_reconstructs_plain_fields() {
        let cases: Vec<Vec<(&str, &str)>> = vec![
            vec![("course", "cs101"), ("student", "jdoe"), ("grade", "B+")],
            vec![("name", "x")],
            vec![("note", ""), ("flag", "")],
            vec![("1", "10"), ("2", "20"), ("30", "3")],
            vec![("name", "Zoë"), ("city", "東京")],
        ];

        for fields in cases {
            let form: FormData = fields.iter().copied().collect();
            let decoded = FormData::decode(&form.encode());
            assert_eq!(decoded, form, "round trip of {:?}", fields);
        }
    }

    #[test]
    fn decode_handles_empty_and_bare_keys() {
        assert!(FormData::decode("").is_empty());
        let decoded = FormData::decode("flag&k=v=w");
        assert_eq!(decoded.get("flag"), Some(""));
        assert_eq!(decoded.get("k"), Some("v=w"));
    }
}
