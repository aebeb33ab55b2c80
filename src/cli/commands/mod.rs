mod admin;
mod forge;
mod initdb;

pub use admin::cmd_admin;
pub use forge::{DEMO_MOVIES, DEMO_NAME, cmd_forge};
pub use initdb::cmd_initdb;
