pub mod fir;
pub mod user;
