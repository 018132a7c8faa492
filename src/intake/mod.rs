pub mod client_ip;
pub mod coerce;
pub mod geo;
pub mod parser;
pub mod pipeline;
pub mod record;
