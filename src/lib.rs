pub mod config;
pub mod data;
pub mod error;
pub mod item;
pub mod job;
pub mod position;
pub mod protocol;
pub mod session;
pub mod skills;
pub mod words;
