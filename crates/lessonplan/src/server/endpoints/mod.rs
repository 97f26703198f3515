pub mod auth;
pub mod documents;
pub mod status;
pub mod timetable;
