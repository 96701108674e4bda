//! Pricing engine module for racing fence installations.
//!
//! Two market engines (international and UK) share the breakdown and
//! markup arithmetic in [`calculators`]; archived results go through
//! [`services`] to a [`store::RecordStore`].

pub mod calculators;
pub mod engine;
pub mod international;
pub mod models;
pub mod queries;
pub mod reference;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod store;
pub mod uk;

// Re-export commonly used items
pub use calculators::round_money;
pub use engine::{PricingEngine, PricingError};
pub use international::InternationalEngine;
pub use reference::ReferenceData;
pub use routes::router;
pub use uk::UkEngine;
