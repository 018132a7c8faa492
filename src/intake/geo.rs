use axum::http::HeaderMap;
use serde::Serialize;
use serde_json::Value;

use super::coerce::safe_trim;

/// Country, region and city headers per edge provider, in priority order.
const PROVIDER_HEADERS: [[&str; 3]; 2] = [
    ["x-vercel-ip-country", "x-vercel-ip-country-region", "x-vercel-ip-city"],
    ["cf-ipcountry", "cf-region", "cf-ipcity"],
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Geo {
    #[serde(rename = "geo_city")]
    pub city: String,
    #[serde(rename = "geo_region")]
    pub region: String,
    #[serde(rename = "geo_country")]
    pub country: String,
}

impl Geo {
    fn is_empty(&self) -> bool {
        self.city.is_empty() && self.region.is_empty() && self.country.is_empty()
    }
}

/// Geolocation as sent by the client.
pub fn from_body(body: &serde_json::Map<String, Value>) -> Geo {
    Geo {
        city: safe_trim(body.get("geo_city")),
        region: safe_trim(body.get("geo_region")),
        country: safe_trim(body.get("geo_country")),
    }
}

/// First provider header set with any non-empty value.
pub fn from_headers(headers: &HeaderMap) -> Geo {
    PROVIDER_HEADERS
        .iter()
        .map(|[country, region, city]| Geo {
            city: header_trim(headers, city),
            region: header_trim(headers, region),
            country: header_trim(headers, country),
        })
        .find(|geo| !geo.is_empty())
        .unwrap_or_default()
}

/// Body values win field by field; headers fill whatever the body left empty.
pub fn resolve(body: Geo, headers: &HeaderMap) -> Geo {
    let fallback = from_headers(headers);
    Geo {
        city: or_else(body.city, fallback.city),
        region: or_else(body.region, fallback.region),
        country: or_else(body.country, fallback.country),
    }
}

fn or_else(preferred: String, fallback: String) -> String {
    if preferred.is_empty() { fallback } else { preferred }
}

fn header_trim(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
