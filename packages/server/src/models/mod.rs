pub mod auth;
pub mod document;
pub mod login;
pub mod password;
pub mod shared;
