pub mod analyzers;
pub mod classify;
pub mod fetch;
pub mod host;
pub mod output;
pub mod services;
pub mod stats;
