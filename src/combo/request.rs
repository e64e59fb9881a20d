//! Combo request validation
//!
//! Turns method, path and raw query into an ordered, duplicate-free [`FileList`].

use super::ComboError;
use crate::config::ComboConfig;
use hyper::Method;
use percent_encoding::percent_decode_str;
use std::collections::HashSet;

/// Validated, ordered list of unescaped file names
///
/// Never empty, never longer than the configured maximum, no repeated names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileList(Vec<String>);

impl FileList {
    /// Name used to derive the response content type
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validate a combo request and extract its file names
///
/// # Examples
/// ```
/// use comboserver::combo::parse_file_list;
/// use comboserver::config::ComboConfig;
/// use hyper::Method;
///
/// let conf = ComboConfig::default();
/// let files = parse_file_list(&Method::GET, "/", Some("a.css&b%20c.css"), &conf).unwrap();
/// assert_eq!(files.iter().collect::<Vec<_>>(), ["a.css", "b c.css"]);
/// ```
pub fn parse_file_list(
    method: &Method,
    path: &str,
    raw_query: Option<&str>,
    conf: &ComboConfig,
) -> Result<FileList, ComboError> {
    if method != Method::GET && method != Method::HEAD {
        return Err(ComboError::MethodNotAllowed);
    }

    if !conf.url_path.is_empty() && conf.url_path != path {
        return Err(ComboError::NotFound);
    }

    let raw_query = raw_query.unwrap_or_default();
    if raw_query.is_empty() {
        return Err(ComboError::NotFound);
    }

    let escaped: Vec<&str> = raw_query.split(conf.separator.as_str()).collect();
    if escaped.len() > conf.max_files {
        return Err(ComboError::TooManyFiles(escaped.len()));
    }

    let names = escaped
        .into_iter()
        .map(|name| query_unescape(name).ok_or(ComboError::BadRequest))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::with_capacity(names.len());
    if !names.iter().all(|name| seen.insert(name.as_str())) {
        return Err(ComboError::DuplicateName);
    }

    Ok(FileList(names))
}

/// Decode a query component: `+` is a space and every `%` must start a valid escape
fn query_unescape(escaped: &str) -> Option<String> {
    let bytes = escaped.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !valid {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(&escaped.replace('+', " "))
        .decode_utf8()
        .ok()
        .map(std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(max_files: usize) -> ComboConfig {
        ComboConfig {
            max_files,
            ..ComboConfig::default()
        }
    }

    fn names(list: &FileList) -> Vec<&str> {
        list.iter().collect()
    }

    #[test]
    fn test_ordered_names() {
        let list = parse_file_list(&Method::GET, "/", Some("b.css&a.css&c.js"), &conf(50)).unwrap();
        assert_eq!(names(&list), ["b.css", "a.css", "c.js"]);
        assert_eq!(list.first(), "b.css");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_method() {
        assert!(parse_file_list(&Method::HEAD, "/", Some("a.css"), &conf(50)).is_ok());
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS] {
            assert!(matches!(
                parse_file_list(&method, "/", Some("a.css"), &conf(50)),
                Err(ComboError::MethodNotAllowed)
            ));
        }
    }

    #[test]
    fn test_path_restriction() {
        let restricted = ComboConfig {
            url_path: "/combo".to_string(),
            ..ComboConfig::default()
        };
        assert!(parse_file_list(&Method::GET, "/combo", Some("a.css"), &restricted).is_ok());
        assert!(matches!(
            parse_file_list(&Method::GET, "/combo/", Some("a.css"), &restricted),
            Err(ComboError::NotFound)
        ));

        let unrestricted = ComboConfig {
            url_path: String::new(),
            ..ComboConfig::default()
        };
        assert!(parse_file_list(&Method::GET, "/any/path", Some("a.css"), &unrestricted).is_ok());
    }

    #[test]
    fn test_empty_query() {
        for query in [None, Some("")] {
            assert!(matches!(
                parse_file_list(&Method::GET, "/", query, &conf(50)),
                Err(ComboError::NotFound)
            ));
        }
    }

    #[test]
    fn test_too_many_files() {
        match parse_file_list(&Method::GET, "/", Some("a&b&c"), &conf(2)) {
            Err(ComboError::TooManyFiles(count)) => assert_eq!(count, 3),
            other => panic!("Expected TooManyFiles, got {other:?}"),
        }
        assert!(parse_file_list(&Method::GET, "/", Some("a&b"), &conf(2)).is_ok());
    }

    #[test]
    fn test_decoding() {
        let list =
            parse_file_list(&Method::GET, "/", Some("pure%2Fgrids.css&a+b.css&c%2B.css"), &conf(50))
                .unwrap();
        assert_eq!(names(&list), ["pure/grids.css", "a b.css", "c+.css"]);

        for query in ["a%2", "a%zz.css", "%", "%ff"] {
            assert!(
                matches!(
                    parse_file_list(&Method::GET, "/", Some(query), &conf(50)),
                    Err(ComboError::BadRequest)
                ),
                "{query} should be rejected"
            );
        }
    }

    #[test]
    fn test_duplicates_after_decoding() {
        for query in ["a.css&a.css", "a.css&%61.css", "a+b&a%20b"] {
            assert!(
                matches!(
                    parse_file_list(&Method::GET, "/", Some(query), &conf(50)),
                    Err(ComboError::DuplicateName)
                ),
                "{query} should be rejected"
            );
        }
        // No normalisation: these are different names
        assert!(parse_file_list(&Method::GET, "/", Some("a.css&./a.css&A.css"), &conf(50)).is_ok());
    }

    #[test]
    fn test_custom_separator() {
        let custom = ComboConfig {
            separator: ",".to_string(),
            ..ComboConfig::default()
        };
        let list = parse_file_list(&Method::GET, "/", Some("a.css,b&c.css"), &custom).unwrap();
        assert_eq!(names(&list), ["a.css", "b&c.css"]);
    }
}
