pub mod az;
pub mod client;
