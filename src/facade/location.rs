//! `location` (§4.B/§6), parsed from the seed `domain` URL. The Python
//! original (`window.py`'s `Location`) hand-splits the URL string on `/`
//! and `:`; this crate parses it with the `url` crate instead, which is
//! already in the teacher's dependency stack and gets edge cases (missing
//! path, explicit port, query string) right without bespoke splitting.

use crate::object::ObjectInitializer;
use crate::value::{string, Value};
use url::Url;

pub fn build(domain: &str, function_prototype: &Value) -> Value {
    let parsed = Url::parse(domain).ok();

    let protocol = parsed.as_ref().map(|u| format!("{}:", u.scheme())).unwrap_or_else(|| "https:".to_string());
    let host_only = parsed.as_ref().and_then(|u| u.host_str()).unwrap_or("example.com").to_string();
    let port = parsed.as_ref().and_then(|u| u.port()).map(|p| p.to_string()).unwrap_or_default();
    let host = if port.is_empty() { host_only.clone() } else { format!("{}:{}", host_only, port) };
    let origin = parsed
        .as_ref()
        .map(|u| format!("{}://{}", u.scheme(), host))
        .unwrap_or_else(|| format!("https://{}", host));
    let pathname = parsed.as_ref().map(|u| u.path().to_string()).unwrap_or_else(|| "/".to_string());
    let search = parsed.as_ref().and_then(|u| u.query()).map(|q| format!("?{}", q)).unwrap_or_default();
    let hash = parsed.as_ref().and_then(|u| u.fragment()).map(|h| format!("#{}", h)).unwrap_or_default();
    let href = parsed.as_ref().map(|u| u.as_str().to_string()).unwrap_or_else(|| domain.to_string());

    ObjectInitializer::new(Some(function_prototype.clone()))
        .property("href", string(href))
        .property("protocol", string(protocol))
        .property("host", string(host))
        .property("hostname", string(host_only))
        .property("port", string(port))
        .property("pathname", string(pathname))
        .property("search", string(search))
        .property("hash", string(hash))
        .property("origin", string(origin))
        .build_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{to_js_string, ValueExt};

    fn dummy_function_prototype() -> Value {
        crate::value::object(crate::object::Object::native_function("noop", 0, |_, _, _| Ok(crate::value::undefined()), None))
    }

    fn field(loc: &Value, key: &str) -> String {
        to_js_string(&loc.as_object().unwrap().borrow().get_own(key).unwrap())
    }

    #[test]
    fn parses_host_pathname_search_and_hash() {
        let loc = build("https://example.com/foo/bar?q=1#section", &dummy_function_prototype());
        assert_eq!(field(&loc, "protocol"), "https:");
        assert_eq!(field(&loc, "hostname"), "example.com");
        assert_eq!(field(&loc, "pathname"), "/foo/bar");
        assert_eq!(field(&loc, "search"), "?q=1");
        assert_eq!(field(&loc, "hash"), "#section");
        assert_eq!(field(&loc, "origin"), "https://example.com");
    }

    #[test]
    fn includes_explicit_port_in_host() {
        let loc = build("http://localhost:8080/", &dummy_function_prototype());
        assert_eq!(field(&loc, "host"), "localhost:8080");
        assert_eq!(field(&loc, "port"), "8080");
    }

    #[test]
    fn falls_back_to_defaults_on_unparseable_domain() {
        let loc = build("not a url", &dummy_function_prototype());
        assert_eq!(field(&loc, "hostname"), "example.com");
    }
}
