pub mod appointment;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod coupon;
pub mod dress;
pub mod employee;
pub mod location;
pub mod order;
pub mod payment;
pub mod report;
pub mod settings;
