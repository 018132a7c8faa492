use std::sync::Arc;

use crate::config::Config;
use crate::sink::Sink;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub sink: Arc<dyn Sink>,
}
