use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use leadintake::config::{Config, GeoMode};
use leadintake::intake::record::IntakeRecord;
use leadintake::sink::{HttpSink, Sink, SinkError};

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit JSON to the intake path, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(INTAKE_PATH))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit JSON with extra request headers, return (body, status).
    pub async fn submit_with_headers(&self, data: &Value, headers: &[(&str, &str)]) -> (Value, StatusCode) {
        let mut req = self.client.post(self.url(INTAKE_PATH)).json(data);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().await.expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub const INTAKE_PATH: &str = "/api/lead";

pub fn test_config() -> Config {
    Config {
        sink_url: "http://127.0.0.1:9/unused".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        intake_path: INTAKE_PATH.to_string(),
        geo_mode: GeoMode::HeaderFallback,
        echo_geo: true,
        max_body_size: 16 * 1024,
        trusted_proxies: vec![],
        sink_timeout: None,
        log_level: "warn".to_string(),
    }
}

/// What the recording sink does with each record it receives.
#[derive(Clone)]
pub enum Outcome {
    Accept(String),
    Reject(u16, String),
    Panic,
}

/// Sink double that keeps every record it is sent.
pub struct RecordingSink {
    pub records: Mutex<Vec<IntakeRecord>>,
    outcome: Outcome,
}

impl RecordingSink {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
            outcome,
        })
    }

    pub fn accepting() -> Arc<Self> {
        Self::new(Outcome::Accept("ok".to_string()))
    }

    pub fn received(&self) -> Vec<IntakeRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sink for RecordingSink {
    async fn send(&self, record: &IntakeRecord) -> Result<String, SinkError> {
        self.records.lock().unwrap().push(record.clone());
        match &self.outcome {
            Outcome::Accept(body) => Ok(body.clone()),
            Outcome::Reject(status, body) => Err(SinkError::Rejected {
                status: *status,
                body: body.clone(),
            }),
            Outcome::Panic => panic!("sink exploded"),
        }
    }
}

/// Spawn the app with the given config and sink on a random port.
pub async fn spawn_app_with(config: Config, sink: Arc<dyn Sink>) -> TestApp {
    let app = leadintake::build_app(config, sink);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}

/// Spawn the app with the default test config and the given sink.
pub async fn spawn_app(sink: Arc<dyn Sink>) -> TestApp {
    spawn_app_with(test_config(), sink).await
}

/// Spawn the app forwarding over HTTP to `sink_url`.
pub async fn spawn_app_with_http_sink(sink_url: &str) -> TestApp {
    let mut config = test_config();
    config.sink_url = sink_url.to_string();
    let sink = HttpSink::new(config.sink_url.clone(), config.sink_timeout).unwrap();
    spawn_app_with(config, Arc::new(sink)).await
}
