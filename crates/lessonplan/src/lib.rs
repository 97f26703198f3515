//! Backend for planning semester lessons: user accounts, JSON document
//! collections and rescheduling of missed lectures.

pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod store;
pub mod timetable;
pub mod types;
