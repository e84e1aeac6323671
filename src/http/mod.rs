//! HTTP surface

mod routes;

pub use routes::build_router;
