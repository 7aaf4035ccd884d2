pub mod file;
pub mod url;
