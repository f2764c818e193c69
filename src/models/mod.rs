pub mod board;
pub mod identity;
pub mod user;

pub use board::{Board, UserBoard};
pub use identity::{IdentitySession, IdentityUser, Session};
pub use user::{LoginRequest, NewUserRecord, SignupRequest, UserRecord};
