use std::net::{IpAddr, Ipv4Addr};

use axum::http::HeaderMap;
use ipnet::{IpNet, Ipv4Net};

const PRIVATE_V4: [Ipv4Net; 4] = [
    Ipv4Net::new_assert(Ipv4Addr::new(10, 0, 0, 0), 8),
    Ipv4Net::new_assert(Ipv4Addr::new(127, 0, 0, 0), 8),
    Ipv4Net::new_assert(Ipv4Addr::new(172, 16, 0, 0), 12),
    Ipv4Net::new_assert(Ipv4Addr::new(192, 168, 0, 0), 16),
];

/// Resolve the originating client address. Returns `""` when unknown or
/// not publicly routable.
///
/// With no trusted proxies configured the forwarded header is always
/// honored, as on platforms where the edge sets it. Otherwise it is only
/// read when the connection comes from one of `trusted_proxies`.
pub fn resolve(headers: &HeaderMap, peer_addr: Option<IpAddr>, trusted_proxies: &[IpNet]) -> String {
    let trust_forwarded = trusted_proxies.is_empty()
        || peer_addr.is_some_and(|peer| trusted_proxies.iter().any(|net| net.contains(&peer)));

    let forwarded = if trust_forwarded {
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .map(|first| first.trim().to_string())
            .unwrap_or_default()
    } else {
        String::new()
    };

    let candidate = if forwarded.is_empty() {
        peer_addr.map(|ip| ip.to_string()).unwrap_or_default()
    } else {
        forwarded
    };

    clean(&candidate)
}

/// Drop loopback, private and local-scope addresses, unwrapping IPv4-mapped
/// IPv6 first.
pub fn clean(candidate: &str) -> String {
    if candidate.is_empty() || candidate == "::1" {
        return String::new();
    }

    let ip = candidate.strip_prefix("::ffff:").unwrap_or(candidate);

    if is_private_dotted_quad(ip) {
        return String::new();
    }

    let lower = ip.to_ascii_lowercase();
    if lower.starts_with("fe80:") || lower.starts_with("fc") || lower.starts_with("fd") {
        return String::new();
    }

    ip.to_string()
}

/// Range check on any four-part numeric address, including ones that are
/// not valid IPv4 (`10.0.0.256`, `010.0.0.1`). Only the first two octets
/// decide membership.
pub fn is_private_dotted_quad(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4
        || !parts
            .iter()
            .all(|p| (1..=3).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    // At most three digits, so these always parse.
    let (Ok(a), Ok(b)) = (parts[0].parse::<u16>(), parts[1].parse::<u16>()) else {
        return false;
    };
    let (Ok(a), Ok(b)) = (u8::try_from(a), u8::try_from(b)) else {
        return false;
    };

    let prefix = Ipv4Addr::new(a, b, 0, 0);
    PRIVATE_V4.iter().any(|net| net.contains(&prefix))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn private_ipv4_ranges_are_discarded() {
        for ip in ["10.1.2.3", "127.0.0.1", "192.168.0.10", "172.16.0.1", "172.31.255.255"] {
            assert_eq!(clean(ip), "", "{ip} should be private");
        }
    }

    #[test]
    fn range_172_checks_second_octet() {
        assert_eq!(clean("172.15.0.1"), "172.15.0.1");
        assert_eq!(clean("172.32.0.1"), "172.32.0.1");
    }

    #[test]
    fn local_ipv6_is_discarded() {
        assert_eq!(clean("::1"), "");
        assert_eq!(clean("fe80::1"), "");
        assert_eq!(clean("FE80::abcd"), "");
        assert_eq!(clean("fc00::1"), "");
        assert_eq!(clean("fd12:3456::1"), "");
        assert_eq!(clean("2001:4860:4860::8888"), "2001:4860:4860::8888");
    }

    #[test]
    fn malformed_private_quads_are_discarded() {
        assert_eq!(clean("10.0.0.256"), "");
        assert_eq!(clean("010.0.0.1"), "");
        assert_eq!(clean("192.168.1.300"), "");
        assert_eq!(clean("172.016.999.1"), "");
        assert_eq!(clean("::ffff:10.0.0.999"), "");
    }

    #[test]
    fn malformed_public_quads_pass_through() {
        assert_eq!(clean("8.8.8.256"), "8.8.8.256");
        assert_eq!(clean("172.32.0.300"), "172.32.0.300");
        // Octets longer than three digits are not treated as an address.
        assert_eq!(clean("0010.0.0.1"), "0010.0.0.1");
    }

    #[test]
    fn ipv4_mapped_is_unwrapped() {
        assert_eq!(clean("::ffff:8.8.8.8"), "8.8.8.8");
        assert_eq!(clean("::ffff:10.0.0.1"), "");
    }

    #[test]
    fn first_forwarded_entry_wins() {
        let headers = xff(" 8.8.8.8 , 10.0.0.1, 1.1.1.1");
        let peer = Some(IpAddr::from([203, 0, 113, 9]));
        assert_eq!(resolve(&headers, peer, &[]), "8.8.8.8");
    }

    #[test]
    fn private_forwarded_entry_is_not_skipped() {
        let headers = xff("192.168.1.4, 8.8.8.8");
        assert_eq!(resolve(&headers, Some(IpAddr::from([203, 0, 113, 9])), &[]), "");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let peer = Some(IpAddr::from([203, 0, 113, 9]));
        assert_eq!(resolve(&HeaderMap::new(), peer, &[]), "203.0.113.9");
        assert_eq!(resolve(&xff(""), peer, &[]), "203.0.113.9");
        assert_eq!(resolve(&HeaderMap::new(), Some(IpAddr::from([127, 0, 0, 1])), &[]), "");
        assert_eq!(resolve(&HeaderMap::new(), None, &[]), "");
    }

    #[test]
    fn untrusted_peer_cannot_forward() {
        let trusted: Vec<IpNet> = vec!["10.0.0.0/8".parse().unwrap()];
        let headers = xff("8.8.8.8");

        let from_proxy = Some(IpAddr::from([10, 0, 0, 5]));
        assert_eq!(resolve(&headers, from_proxy, &trusted), "8.8.8.8");

        let direct = Some(IpAddr::from([203, 0, 113, 9]));
        assert_eq!(resolve(&headers, direct, &trusted), "203.0.113.9");
    }
}
