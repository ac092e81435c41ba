pub mod clubs;
pub mod messages;
pub mod users;
