pub mod coordinator;
pub mod events;
pub mod reducer;

pub use coordinator::AuthCoordinator;
pub use events::LoginEvent;
pub use reducer::{AuthState, LoginSession, LoginSessionId};
