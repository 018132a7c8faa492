use std::net::IpAddr;

use axum::http::HeaderMap;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::config::{Config, GeoMode};
use crate::error::AppError;

use super::client_ip;
use super::coerce::{event_time, is_present, safe_trim};
use super::geo::{self, Geo};
use super::record::IntakeRecord;

/// At least one of these must be present for a submission to be accepted.
pub const MINIMAL_FIELDS: [&str; 4] = ["event_id", "external_id", "phone", "email"];

pub struct Normalized {
    pub record: IntakeRecord,
    pub geo: Geo,
}

/// Validate a decoded body and build the record to forward.
pub fn normalize(
    config: &Config,
    body: &Map<String, Value>,
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    now: DateTime<Utc>,
) -> Result<Normalized, AppError> {
    if !MINIMAL_FIELDS.iter().any(|field| is_present(body.get(*field))) {
        return Err(AppError::BadRequest(
            "Missing minimal fields: one of event_id, external_id, phone or email is required".to_string(),
        ));
    }

    let body_geo = geo::from_body(body);
    let geo = match config.geo_mode {
        GeoMode::HeaderFallback => geo::resolve(body_geo, headers),
        GeoMode::BodyOnly => body_geo,
    };

    let mut country = safe_trim(body.get("country"));
    if country.is_empty() && config.geo_mode == GeoMode::HeaderFallback {
        country = geo.country.clone();
    }

    let field = |name: &str| safe_trim(body.get(name));

    let record = IntakeRecord {
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),

        phone: field("phone"),
        email: field("email"),
        first_name: field("fn"),
        last_name: field("ln"),

        city: field("ct"),
        state: field("st"),
        zip: field("zip"),
        country,

        fbp: field("fbp"),
        fbc: field("fbc"),

        event_id: field("event_id"),
        client_ip: client_ip::resolve(headers, peer_addr, &config.trusted_proxies),
        user_agent: headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string(),

        status: String::new(),
        value: String::new(),
        submission_status: String::new(),
        notes: String::new(),

        external_id: field("external_id"),
        utm_campaign: field("utm_campaign"),
        event_source_url: field("event_source_url"),
        event_time: event_time(body.get("event_time"), now.timestamp()),

        assigned_phone: field("telefono_asignado"),
        device_type: field("device_type"),

        geo_city: geo.city.clone(),
        geo_region: geo.region.clone(),
        geo_country: geo.country.clone(),

        promo_code: field("promo_code"),
    };

    Ok(Normalized { record, geo })
}
