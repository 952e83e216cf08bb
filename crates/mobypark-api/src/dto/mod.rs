//! Data Transfer Objects (DTOs) for API requests and responses

pub mod billing;
pub mod common;
pub mod parking_lot;
pub mod payment;
pub mod session;
pub mod vehicle;

pub use billing::*;
pub use common::*;
pub use parking_lot::*;
pub use payment::*;
pub use session::*;
pub use vehicle::*;
