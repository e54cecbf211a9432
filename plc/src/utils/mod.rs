pub mod json;
pub mod pages;
