//! Authenticated request context. Built once per request by the bearer
//! middleware and passed to handlers as an extension, instead of each
//! handler re-deriving identity from ambient state.

use uuid::Uuid;

use super::lifecycle::Role;

#[derive(Debug, Clone)]
pub struct Session {
    pub actor_id: Uuid,
    pub role: Role,
}

impl Session {
    pub fn is_reporter(&self, reporter_id: Uuid) -> bool {
        self.actor_id == reporter_id
    }

    pub fn can_respond(&self) -> bool {
        self.role.can_respond()
    }

    pub fn can_view_roster(&self) -> bool {
        self.role.can_view_roster()
    }
}
