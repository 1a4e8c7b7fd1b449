//! Authentication
//!
//! JWT issuing/validation and the admin route guard. The storefront has a
//! single shared admin credential; its argon2 hash lives in the `admin`
//! configuration document.

pub mod jwt;
pub mod middleware;

pub use jwt::{AdminSession, Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_admin;
