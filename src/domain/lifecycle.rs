//! Alert lifecycle rules: statuses, roles, and the guards that gate every
//! status mutation. Handlers call [`authorize_transition`] /
//! [`authorize_assign`] before touching the database, so an alert can only
//! move along the edges defined here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Alert lifecycle status. `Resolved` and `Cancelled` are terminal: once an
/// alert reaches either, no further transition is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl AlertStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "assigned" => Some(Self::Assigned),
            "resolved" => Some(Self::Resolved),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Assigned => "assigned",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Cancelled)
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actor role. Fixed at registration; `Admin` accounts are provisioned out
/// of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "volunteer")]
    Volunteer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Volunteer => "volunteer",
            Self::Admin => "admin",
        }
    }

    /// Responder capability: claiming and resolving alerts.
    pub fn can_respond(&self) -> bool {
        matches!(self, Self::Volunteer | Self::Admin)
    }

    /// The cross-reporter active roster is responder-only.
    pub fn can_view_roster(&self) -> bool {
        self.can_respond()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six reportable emergency categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EmergencyType {
    #[sea_orm(string_value = "medical")]
    Medical,
    #[sea_orm(string_value = "accident")]
    Accident,
    #[sea_orm(string_value = "fire")]
    Fire,
    #[sea_orm(string_value = "flood")]
    Flood,
    #[sea_orm(string_value = "violence")]
    Violence,
    #[sea_orm(string_value = "other")]
    Other,
}

impl EmergencyType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "medical" => Some(Self::Medical),
            "accident" => Some(Self::Accident),
            "fire" => Some(Self::Fire),
            "flood" => Some(Self::Flood),
            "violence" => Some(Self::Violence),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Accident => "accident",
            Self::Fire => "fire",
            Self::Flood => "flood",
            Self::Violence => "violence",
            Self::Other => "other",
        }
    }

    /// Priority is assigned server-side from the reported category; clients
    /// cannot set it.
    pub fn default_priority(&self) -> Priority {
        match self {
            Self::Medical | Self::Fire | Self::Violence => Priority::Critical,
            Self::Accident => Priority::High,
            Self::Flood => Priority::Medium,
            Self::Other => Priority::Low,
        }
    }
}

impl std::fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "critical")]
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The requested edge does not exist in the lifecycle, or the alert is
    /// already in a terminal state. The alert is left untouched.
    #[error("invalid transition from `{from}` to `{to}`")]
    InvalidTransition { from: AlertStatus, to: AlertStatus },
    /// The edge exists but the acting role may not take it.
    #[error("{0}")]
    NotPermitted(&'static str),
}

/// Guard for explicit status writes (`PUT /alerts/{id}`).
///
/// Only `resolved` and `cancelled` are reachable this way: `assigned` is the
/// result of the assign operation and `active` is never re-entered.
pub fn authorize_transition(
    current: AlertStatus,
    target: AlertStatus,
    role: Role,
    is_reporter: bool,
) -> Result<(), TransitionError> {
    if current.is_terminal() {
        return Err(TransitionError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    match target {
        AlertStatus::Resolved => {
            if role.can_respond() {
                Ok(())
            } else {
                Err(TransitionError::NotPermitted(
                    "only volunteers or admins may resolve alerts",
                ))
            }
        }
        AlertStatus::Cancelled => {
            if is_reporter || role == Role::Admin {
                Ok(())
            } else {
                Err(TransitionError::NotPermitted(
                    "only the reporter or an admin may cancel an alert",
                ))
            }
        }
        AlertStatus::Active | AlertStatus::Assigned => Err(TransitionError::InvalidTransition {
            from: current,
            to: target,
        }),
    }
}

/// Guard for the assign operation (`POST /alerts/{id}/assign`).
///
/// Assignment is additive: the first assign flips `active` to `assigned`,
/// later assigns only grow the responder set, so `assigned` is a legal
/// current state here.
pub fn authorize_assign(current: AlertStatus, role: Role) -> Result<(), TransitionError> {
    if current.is_terminal() {
        return Err(TransitionError::InvalidTransition {
            from: current,
            to: AlertStatus::Assigned,
        });
    }
    if !role.can_respond() {
        return Err(TransitionError::NotPermitted(
            "only volunteers or admins may claim alerts",
        ));
    }
    Ok(())
}

/// Status after a successful assign: the first claim moves the alert out of
/// the active roster, later claims leave it `assigned`.
pub fn status_after_assign(current: AlertStatus) -> AlertStatus {
    match current {
        AlertStatus::Active | AlertStatus::Assigned => AlertStatus::Assigned,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [AlertStatus; 4] = [
        AlertStatus::Active,
        AlertStatus::Assigned,
        AlertStatus::Resolved,
        AlertStatus::Cancelled,
    ];

    const ALL_ROLES: [Role; 3] = [Role::User, Role::Volunteer, Role::Admin];

    #[test]
    fn only_defined_edges_are_accepted() {
        // Admin reporter is the most-capable actor; anything it cannot do,
        // nobody can.
        let allowed: Vec<(AlertStatus, AlertStatus)> = ALL_STATUSES
            .iter()
            .flat_map(|from| ALL_STATUSES.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| authorize_transition(*from, *to, Role::Admin, true).is_ok())
            .collect();

        assert_eq!(
            allowed,
            vec![
                (AlertStatus::Active, AlertStatus::Resolved),
                (AlertStatus::Active, AlertStatus::Cancelled),
                (AlertStatus::Assigned, AlertStatus::Resolved),
                (AlertStatus::Assigned, AlertStatus::Cancelled),
            ]
        );
    }

    #[test]
    fn terminal_states_reject_every_transition() {
        for from in [AlertStatus::Resolved, AlertStatus::Cancelled] {
            for to in ALL_STATUSES {
                for role in ALL_ROLES {
                    for is_reporter in [false, true] {
                        let err = authorize_transition(from, to, role, is_reporter).unwrap_err();
                        assert_eq!(err, TransitionError::InvalidTransition { from, to });
                    }
                }
            }
            let err = authorize_assign(from, Role::Admin).unwrap_err();
            assert_eq!(
                err,
                TransitionError::InvalidTransition {
                    from,
                    to: AlertStatus::Assigned
                }
            );
        }
    }

    #[test]
    fn plain_users_cannot_resolve() {
        let err = authorize_transition(AlertStatus::Active, AlertStatus::Resolved, Role::User, true)
            .unwrap_err();
        assert!(matches!(err, TransitionError::NotPermitted(_)));
    }

    #[test]
    fn plain_users_cannot_claim() {
        let err = authorize_assign(AlertStatus::Active, Role::User).unwrap_err();
        assert!(matches!(err, TransitionError::NotPermitted(_)));
    }

    #[test]
    fn cancellation_is_reporter_or_admin_only() {
        // Reporter may cancel their own alert regardless of role.
        assert!(authorize_transition(
            AlertStatus::Active,
            AlertStatus::Cancelled,
            Role::User,
            true
        )
        .is_ok());
        // A volunteer who did not report the alert may not cancel it.
        let err = authorize_transition(
            AlertStatus::Assigned,
            AlertStatus::Cancelled,
            Role::Volunteer,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::NotPermitted(_)));
        // Admin may cancel anyone's alert.
        assert!(authorize_transition(
            AlertStatus::Assigned,
            AlertStatus::Cancelled,
            Role::Admin,
            false
        )
        .is_ok());
    }

    #[test]
    fn assigned_is_not_a_put_target() {
        for from in [AlertStatus::Active, AlertStatus::Assigned] {
            let err =
                authorize_transition(from, AlertStatus::Assigned, Role::Admin, true).unwrap_err();
            assert_eq!(
                err,
                TransitionError::InvalidTransition {
                    from,
                    to: AlertStatus::Assigned
                }
            );
        }
    }

    #[test]
    fn claiming_an_assigned_alert_grows_the_set() {
        // Second responder joining an already-claimed alert.
        assert!(authorize_assign(AlertStatus::Assigned, Role::Volunteer).is_ok());
        assert_eq!(
            status_after_assign(AlertStatus::Assigned),
            AlertStatus::Assigned
        );
        assert_eq!(
            status_after_assign(AlertStatus::Active),
            AlertStatus::Assigned
        );
    }

    #[test]
    fn report_claim_resolve_then_further_claims_fail() {
        // user U reports, volunteer V claims, V resolves, V2's claim bounces.
        let reporter = Role::User;
        assert!(EmergencyType::parse("fire").is_some());

        let mut status = AlertStatus::Active;
        let mut responders: Vec<&str> = Vec::new();

        authorize_assign(status, Role::Volunteer).expect("V may claim");
        responders.push("V");
        status = status_after_assign(status);
        assert_eq!(status, AlertStatus::Assigned);
        assert_eq!(responders, vec!["V"]);

        authorize_transition(status, AlertStatus::Resolved, Role::Volunteer, false)
            .expect("V may resolve");
        status = AlertStatus::Resolved;

        let err = authorize_assign(status, Role::Volunteer).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: AlertStatus::Resolved,
                to: AlertStatus::Assigned
            }
        );
        // State unchanged by the rejected attempt.
        assert_eq!(status, AlertStatus::Resolved);
        assert_eq!(responders, vec!["V"]);
        assert_eq!(reporter, Role::User);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in ALL_STATUSES {
            assert_eq!(AlertStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AlertStatus::parse("escalated"), None);
        assert_eq!(AlertStatus::parse("Active"), None);
    }

    #[test]
    fn priority_follows_category() {
        assert_eq!(EmergencyType::Medical.default_priority(), Priority::Critical);
        assert_eq!(EmergencyType::Fire.default_priority(), Priority::Critical);
        assert_eq!(
            EmergencyType::Violence.default_priority(),
            Priority::Critical
        );
        assert_eq!(EmergencyType::Accident.default_priority(), Priority::High);
        assert_eq!(EmergencyType::Flood.default_priority(), Priority::Medium);
        assert_eq!(EmergencyType::Other.default_priority(), Priority::Low);
    }
}
