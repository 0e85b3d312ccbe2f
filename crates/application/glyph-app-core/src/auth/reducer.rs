use uuid::Uuid;

use crate::store::Reduce;

use super::events::LoginEvent;

pub type LoginSessionId = Uuid;

/// Observable fields of the device-authorization popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginSession {
    pub code: String,
    pub verification_uri: String,
    pub popup_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub session: LoginSession,
    /// The session whose details and resolution may still touch `session`.
    /// Cleared on resolution and on cancellation.
    pub live: Option<LoginSessionId>,
}

impl Reduce for AuthState {
    type Event = LoginEvent;

    fn accepts(&self, ev: &LoginEvent) -> bool {
        match ev {
            LoginEvent::DetailsReceived(_) => self.live.is_some(),
            LoginEvent::Resolved { session } => self.live == Some(*session),
            LoginEvent::Started { .. } | LoginEvent::Cancelled | LoginEvent::Reset => true,
        }
    }

    fn reduce(mut self, ev: LoginEvent) -> Self {
        match ev {
            LoginEvent::Started { session } => {
                self.live = Some(session);
                self.session = LoginSession::default();
            }

            LoginEvent::DetailsReceived(details) => {
                self.session.code = details.code;
                self.session.verification_uri = details.uri;
                self.session.popup_visible = true;
            }

            LoginEvent::Resolved { .. } | LoginEvent::Cancelled | LoginEvent::Reset => {
                self.live = None;
                self.session = LoginSession::default();
            }
        }
        self
    }
}
