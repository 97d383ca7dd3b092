use crate::{Error, ErrorKind};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;

///
/// An ordered list of header fields. Field names are compared case-insensitively and
/// setting a field that is already present replaces its value in place. A field may
/// occur more than once when added through `append`.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// An empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Sets `field` to `value`. The first existing field of the same name keeps its
    /// position but takes the new name spelling and value; any repeats are dropped.
    ///
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let field = field.into();
        let value = value.into();

        match self.position(&field) {
            Some(index) => {
                let mut current = 0;
                self.fields.retain(|(existing, _)| {
                    let keep = current <= index || !existing.eq_ignore_ascii_case(&field);
                    current += 1;
                    keep
                });
                self.fields[index] = (field, value);
            }
            None => self.fields.push((field, value)),
        }

        self
    }

    ///
    /// Adds `field` with `value` after the existing fields, keeping any earlier value of
    /// the same name. Used for fields such as `Set-Cookie` that may repeat.
    ///
    pub fn append(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    ///
    /// Sets every pair of `other` in order, so later entries win over earlier ones
    /// and over anything already present.
    ///
    pub fn merge<I, K, V>(&mut self, other: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (field, value) in other {
            self.set(field, value);
        }

        self
    }

    /// The first value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.position(field).map(|index| self.fields[index].1.as_str())
    }

    /// Every value of `field`, in insertion order.
    pub fn get_all<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(existing, _)| existing.eq_ignore_ascii_case(field))
            .map(|(_, value)| value.as_str())
    }

    /// Whether `field` is present.
    pub fn contains(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    /// Removes every occurrence of `field` and returns the first value.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        let value = self.position(field).map(|index| self.fields.remove(index).1);
        self.fields.retain(|(existing, _)| !existing.eq_ignore_ascii_case(field));
        value
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    /// The number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    ///
    /// Converts into an `http::HeaderMap`. Fails on the first field that isn't valid HTTP.
    ///
    pub fn to_header_map(&self) -> Result<HeaderMap, Error> {
        let mut map = HeaderMap::with_capacity(self.fields.len());

        for (field, value) in self.iter() {
            let name = HeaderName::from_bytes(field.as_bytes())
                .map_err(|_| Error::new_with_context(ErrorKind::InvalidHeader, field))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::new_with_context(ErrorKind::InvalidHeader, field))?;
            map.append(name, value);
        }

        Ok(map)
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(field))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        headers.merge(iter);
        headers
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Headers {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.merge(iter);
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, value) in self.iter() {
            write!(f, "{}: {}\r\n", field, value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Headers;

    #[test]
    fn test_set_replaces_case_insensitively_in_place() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "application/json");
        headers.set("Accept", "*/*");
        headers.set("content-type", "text/plain");

        let fields: Vec<_> = headers.iter().collect();
        assert_eq!(
            vec![("content-type", "text/plain"), ("Accept", "*/*")],
            fields
        );
    }

    #[test]
    fn test_merge_is_last_write_wins() {
        let mut headers: Headers = vec![("x-one", "1")].into_iter().collect();
        headers.merge(vec![("X-One", "2"), ("x-two", "2"), ("x-one", "3")]);

        assert_eq!(Some("3"), headers.get("X-ONE"));
        assert_eq!(Some("2"), headers.get("x-two"));
        assert_eq!(2, headers.len());
    }

    #[test]
    fn test_append_keeps_repeated_fields() {
        let mut headers = Headers::new();
        headers
            .append("Set-Cookie", "a=1")
            .append("x-one", "1")
            .append("set-cookie", "b=2");

        assert_eq!(3, headers.len());
        assert_eq!(Some("a=1"), headers.get("set-cookie"));
        assert_eq!(
            vec!["a=1", "b=2"],
            headers.get_all("SET-COOKIE").collect::<Vec<_>>()
        );

        let map = headers.to_header_map().unwrap();
        assert_eq!(2, map.get_all("set-cookie").iter().count());

        headers.set("set-cookie", "c=3");
        let cookies: Vec<_> = headers.get_all("set-cookie").collect();
        assert_eq!(vec!["c=3"], cookies);
        assert_eq!("set-cookie: c=3\r\nx-one: 1\r\n", headers.to_string());
    }

    #[test]
    fn test_remove() {
        let mut headers: Headers = vec![("a", "1"), ("b", "2")].into_iter().collect();

        assert_eq!(Some("1".to_string()), headers.remove("A"));
        assert_eq!(None, headers.remove("a"));
        assert!(!headers.contains("a"));
        assert_eq!("b: 2\r\n", headers.to_string());
    }
}
