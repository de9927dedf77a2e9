pub mod applications;
pub mod auth;
pub mod error;
pub mod extract;
pub mod listings;
pub mod messages;
pub mod messaging;
pub mod routes;
pub mod state;
pub mod time_slots;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::{AppState, AppStateInner};
