pub mod alias;
pub mod cursor;
pub mod graphemes;
pub mod label;
pub mod oto_set;
pub mod spans;
pub mod timing;
