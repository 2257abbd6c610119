pub mod auth;
pub mod calendar;
pub mod catalog;
pub mod clients;
pub mod coupons;
pub mod employees;
pub mod inventory;
pub mod locations;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod settings;
