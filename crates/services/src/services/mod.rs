pub mod email;
pub mod export;
