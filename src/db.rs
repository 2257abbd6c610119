pub mod user_repo;
pub use user_repo::UserRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod dress_repo;
pub use dress_repo::DressRepository;
pub mod appointment_repo;
pub use appointment_repo::AppointmentRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod location_repo;
pub use location_repo::LocationRepository;
pub mod coupon_repo;
pub use coupon_repo::CouponRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
