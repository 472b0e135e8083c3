pub mod board_repo;
pub mod connection;
pub mod dependency_repo;
pub mod migrations;
pub mod task_repo;

pub use connection::*;
