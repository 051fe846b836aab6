//! Table-level query helpers.

mod reservation_repo;
mod stock_repo;
mod token_repo;
mod user_repo;
mod warehouse_repo;

pub use reservation_repo::ReservationRepo;
pub use stock_repo::StockRepo;
pub use token_repo::TokenRepo;
pub use user_repo::UserRepo;
pub use warehouse_repo::WarehouseRepo;
