pub mod prelude;

pub mod films;
pub mod user_films;
pub mod users;
