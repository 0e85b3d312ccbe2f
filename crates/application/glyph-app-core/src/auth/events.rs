use glyph_core::LoginDetails;

use super::reducer::LoginSessionId;

#[derive(Debug, Clone)]
pub enum LoginEvent {
    Started { session: LoginSessionId },
    DetailsReceived(LoginDetails),
    Resolved { session: LoginSessionId },
    Cancelled,
    Reset,
}
