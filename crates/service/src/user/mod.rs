//! Users: unique username and email, a role from the role table, and a
//! password hash kept apart from the profile.

pub mod domain;
pub mod repository;
pub mod seaorm;
pub mod service;

pub use domain::{AdminUserUpdate, NewUser, NewUserRecord, ProfileUpdate, User, UserFilter, UserIdentity};
pub use repository::UserRepository;
pub use service::UserService;
