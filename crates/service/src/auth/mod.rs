//! Auth module: three-layer architecture (domain, token/password primitives, service).
//!
//! Login, token validation and password changes live here; user records come
//! from [`crate::user::UserRepository`].

pub mod domain;
pub mod password;
pub mod service;
pub mod token;

pub use domain::{AuthContext, AuthSession, ChangePasswordInput, LoginInput};
pub use password::{Argon2Hashing, CredentialHasher};
pub use service::AuthService;
pub use token::{Claims, IssuedToken, TokenService};
