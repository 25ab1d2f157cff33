pub use super::films::Entity as Films;
pub use super::user_films::Entity as UserFilms;
pub use super::users::Entity as Users;
