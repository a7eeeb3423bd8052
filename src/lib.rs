pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session;

pub use error::DbCheckError;
pub use router::{DbCheckState, dbcheck_router};
