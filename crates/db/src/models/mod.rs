pub mod reservation;
pub mod user;
