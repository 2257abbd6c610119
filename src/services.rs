pub mod appointment_service;
pub mod auth;
pub mod client_service;
pub mod coupon_service;
pub mod dress_service;
pub mod employee_service;
pub mod location_service;
pub mod order_service;
pub mod payment_service;
pub mod report_service;
pub mod settings_service;
