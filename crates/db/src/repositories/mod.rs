pub mod order_repo;
pub mod user_repo;

pub use order_repo::{clamp_limit, clamp_page, OrderRepo};
pub use user_repo::UserRepo;
