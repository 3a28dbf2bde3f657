pub mod routes;
pub mod startup;
pub mod errors;
pub mod forms;
pub mod metrics;
pub mod openapi;
pub mod page_cache;

pub use startup::run;
