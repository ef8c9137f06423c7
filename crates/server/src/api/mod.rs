pub mod a2a;
pub mod handlers;
pub mod middleware;
pub mod pdf;
pub mod query;
pub mod routes;

pub use routes::create_router;
