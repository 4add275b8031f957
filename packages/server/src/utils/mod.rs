pub mod filetype;
pub mod token;
