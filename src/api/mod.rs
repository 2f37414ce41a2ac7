pub mod handlers;
pub mod routes;
pub mod server;
pub mod session;
pub mod types;

pub use routes::create_router;
pub use types::{AppError, AppState, CurrentUser};
