#![forbid(unsafe_code)]

pub mod feed;
pub mod repository;
pub mod sqlite;
