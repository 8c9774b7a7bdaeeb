//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must run inside a
//! caller's transaction take `&mut PgConnection` instead.

pub mod booking_repo;
pub mod client_repo;
pub mod inquiry_repo;
pub mod notification_log_repo;
pub mod quotation_repo;
pub mod service_repo;
pub mod staff_repo;

pub use booking_repo::BookingRepo;
pub use client_repo::ClientRepo;
pub use inquiry_repo::InquiryRepo;
pub use notification_log_repo::NotificationLogRepo;
pub use quotation_repo::QuotationRepo;
pub use service_repo::ServiceRepo;
pub use staff_repo::StaffRepo;
