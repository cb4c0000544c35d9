pub mod board;
pub mod dispatch;
pub mod init;
pub mod schema;
pub mod shared;
pub mod task;
