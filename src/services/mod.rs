pub mod ordering;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, Registration};
pub use auth_service_impl::SeaOrmAuthService;

pub mod film_service;
pub mod film_service_impl;
pub use film_service::{FilmError, FilmService};
pub use film_service_impl::SeaOrmFilmService;
