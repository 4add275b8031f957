pub mod google;
pub mod passwords;
