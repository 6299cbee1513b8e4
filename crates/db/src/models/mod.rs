#![allow(clippy::useless_conversion)]

pub mod ids;
pub mod task;
pub mod user;
