pub mod film;
pub mod membership;
pub mod user;
