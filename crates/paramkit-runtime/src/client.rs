use std::collections::{BTreeMap, HashMap};

/// Address reported when no proxy header identifies the client.
pub const DEFAULT_CLIENT_IP: &str = "127.0.0.1";

/// Read-only view of request headers with case-insensitive names.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        lookup(self.iter(), name)
    }
}

impl HeaderSource for BTreeMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        lookup(self.iter(), name)
    }
}

impl HeaderSource for [(&str, &str)] {
    fn header(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

fn lookup<'a>(
    mut entries: impl Iterator<Item = (&'a String, &'a String)>,
    name: &str,
) -> Option<&'a str> {
    entries
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Best guess at the originating client address.
///
/// Uses the first hop of `x-forwarded-for`, then `x-real-ip`, then
/// [`DEFAULT_CLIENT_IP`].
pub fn client_ip<H: HeaderSource + ?Sized>(headers: &H) -> String {
    let forwarded = headers
        .header("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| {
            headers
                .header("x-real-ip")
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .unwrap_or(DEFAULT_CLIENT_IP)
        .to_string()
}
