pub mod attendance;
pub mod report;
pub mod student;
pub mod subject;
