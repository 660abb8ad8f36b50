pub mod actor;
pub mod alert;
pub mod alert_responder;
pub mod session_token;

pub use actor::Entity as Actor;
pub use alert::Entity as Alert;
pub use alert_responder::Entity as AlertResponder;
pub use session_token::Entity as SessionToken;

pub mod prelude;
