pub mod document;
pub mod login;
pub mod session;
pub mod user;
