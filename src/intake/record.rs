use serde::Serialize;

/// Normalized lead as stored by the sink. Field order and key names follow
/// the sheet's columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntakeRecord {
    pub timestamp: String,

    pub phone: String,
    pub email: String,
    #[serde(rename = "fn")]
    pub first_name: String,
    #[serde(rename = "ln")]
    pub last_name: String,

    #[serde(rename = "ct")]
    pub city: String,
    #[serde(rename = "st")]
    pub state: String,
    pub zip: String,
    pub country: String,

    pub fbp: String,
    pub fbc: String,

    pub event_id: String,
    #[serde(rename = "clientIP")]
    pub client_ip: String,
    #[serde(rename = "agentuser")]
    pub user_agent: String,

    // Filled in later by whoever works the sheet.
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "valor")]
    pub value: String,
    #[serde(rename = "estado_envio")]
    pub submission_status: String,
    #[serde(rename = "observaciones")]
    pub notes: String,

    pub external_id: String,
    pub utm_campaign: String,
    pub event_source_url: String,
    pub event_time: i64,

    #[serde(rename = "telefono_asignado")]
    pub assigned_phone: String,
    pub device_type: String,

    pub geo_city: String,
    pub geo_region: String,
    pub geo_country: String,

    pub promo_code: String,
}
