pub mod appointment_repository;
pub mod customer_repository;
pub mod salon_repository;
pub mod service_repository;
pub mod staff_repository;
pub mod store;
pub mod user_repository;
