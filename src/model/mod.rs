pub mod attendance;
pub mod employee;
pub mod group;
pub mod role;
pub mod user;
