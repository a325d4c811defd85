pub mod config;
pub mod console;
pub mod gateway;
pub mod notify;
pub mod roster;
pub mod session;
pub mod timetable;
pub mod validation;
