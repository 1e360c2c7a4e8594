pub mod jira;
pub mod operation;
pub mod outcome;
pub mod ticket;
