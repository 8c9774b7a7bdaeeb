//! Well-known role name constants carried in staff access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

/// Roles allowed to use the back-office endpoints.
pub const BACK_OFFICE_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_STAFF];
