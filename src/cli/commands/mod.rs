mod films;
mod user;

pub use films::cmd_list_films;
pub use user::cmd_create_user;
