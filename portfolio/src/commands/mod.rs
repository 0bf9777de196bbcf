pub mod messages;
pub mod serve;
