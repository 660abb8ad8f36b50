pub use super::actor::Entity as Actor;
pub use super::alert::Entity as Alert;
pub use super::alert_responder::Entity as AlertResponder;
pub use super::session_token::Entity as SessionToken;
