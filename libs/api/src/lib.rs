//! Client library for the stop/start schedule API.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/navigation[?compartment_id=..]` -> [`NavigationLevel`]
//! - `GET /api/v1/instances/{id}/config` -> [`InstanceConfig`]
//! - `PUT /api/v1/instances/{id}/config` -> [`InstanceConfig`]
//! - `DELETE /api/v1/instances/{id}/config` -> 204
//! - `GET /api/v1/health` -> [`Health`]
//!
//! Every call is a single round trip. Non-2xx answers become
//! [`RequestError::Status`] carrying the status and body text.

pub mod client;
pub mod error;
pub mod health;
pub mod instance_config;
pub mod models;
pub mod navigation;
pub mod service;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::RequestError;
pub use models::{
    Compartment, Empty, Health, Instance, InstanceConfig, NavigationLevel, ParseWeekdayError,
    Weekday, DEFAULT_TIMEZONE,
};
pub use service::ConsoleApi;
