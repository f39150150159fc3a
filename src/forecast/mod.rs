pub mod daily;
pub mod handlers;
