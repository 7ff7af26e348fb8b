pub mod attendance;
pub mod employee;
pub mod group_leader;
pub mod report;
pub mod sub_group_leader;
pub mod users;
