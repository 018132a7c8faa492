use serde_json::Value;

/// Values above this are taken to be epoch milliseconds.
const MILLIS_THRESHOLD: f64 = 1e12;

/// Render a body value as text. Missing and `null` become `""`, integral
/// floats drop their fraction and arrays join their elements with commas.
pub fn safe_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.is_f64() => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| safe_string(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(other) => other.to_string(),
    }
}

pub fn safe_trim(value: Option<&Value>) -> String {
    safe_string(value).trim().to_string()
}

/// Raw presence check, before any trimming. Empty strings, `false`, zero and
/// `null` count as absent.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Normalize an event time to epoch seconds, falling back to `now` for
/// anything missing, unparseable or non-positive.
pub fn event_time(value: Option<&Value>, now: i64) -> i64 {
    let n = match value {
        None | Some(Value::Null) => return now,
        Some(Value::String(s)) if s.is_empty() => return now,
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(_) => f64::NAN,
    };

    if !n.is_finite() || n <= 0.0 {
        return now;
    }

    let secs = if n > MILLIS_THRESHOLD {
        (n / 1000.0).floor()
    } else {
        n.floor()
    };

    // Sub-second inputs floor to zero.
    if secs < 1.0 { now } else { secs as i64 }
}
