use url::{Host, Url};

/// Second-level labels that sit under a two-letter country code,
/// as in `bbc.co.uk` or `smh.com.au`.
const GENERIC_SECOND_LEVEL: &[&str] = &["ac", "co", "com", "edu", "gov", "net", "news", "org"];

/// Resolves the publisher "brand" of a url: the registrable domain label,
/// lowercased. `https://www.cbc.ca/news/...` gives `cbc`.
pub fn brand_from_url(url: &Url) -> Option<String> {
    let domain = match url.host()? {
        Host::Domain(domain) => domain.to_ascii_lowercase(),
        Host::Ipv4(addr) => return Some(addr.to_string()),
        Host::Ipv6(addr) => return Some(addr.to_string()),
    };

    let labels: Vec<&str> = domain
        .trim_end_matches('.')
        .split('.')
        .filter(|label| !label.is_empty())
        .collect();

    let brand = match labels.as_slice() {
        [] => return None,
        [only] => *only,
        [.., third, second, tld]
            if tld.len() == 2 && GENERIC_SECOND_LEVEL.contains(second) =>
        {
            *third
        }
        [.., second, _tld] => *second,
    };
    Some(brand.to_string())
}
