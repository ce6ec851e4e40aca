//! Declarative role × resource × action policy table.
//!
//! Every resource service consults this table through the
//! [`Authorizer`](super::Authorizer); nothing else decides who may touch a row.

use super::caller::{Action, ResourceKind};
use crate::entities::UserRole;

/// What a role needs to satisfy for one (resource, action) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// No ownership requirement.
    Allow,
    /// Never permitted for this role.
    Deny,
    /// The row's owning gym must equal the caller's linked gym.
    SameGym,
    /// The row's owning member must be the caller.
    SelfOwned,
}

use Rule::{Allow, Deny, SameGym as S, SelfOwned as M};

/// Cells in `[create, read, read_all, update, delete]` order.
type Row = [Rule; 5];

fn gym_admin_row(kind: ResourceKind) -> Row {
    match kind {
        ResourceKind::User => [Deny, S, S, S, Deny],
        ResourceKind::Gym => [Deny, S, S, Deny, Deny],
        ResourceKind::GymAdminLink => [Deny, S, S, Deny, Deny],
        ResourceKind::GymMemberLink => [S, S, S, Deny, Deny],
        ResourceKind::MembershipPlan => [S, S, S, S, S],
        ResourceKind::PlanPrice => [S, S, S, S, S],
        ResourceKind::Membership => [S, S, S, S, S],
        ResourceKind::Payment => [S, S, S, S, Deny],
        ResourceKind::DietPlan => [S, S, S, S, S],
        ResourceKind::WorkoutPlan => [S, S, S, S, S],
    }
}

fn gym_member_row(kind: ResourceKind) -> Row {
    match kind {
        ResourceKind::User => [Deny, M, M, M, Deny],
        ResourceKind::Gym => [Deny; 5],
        ResourceKind::GymAdminLink => [Deny; 5],
        ResourceKind::GymMemberLink => [Deny, M, M, Deny, Deny],
        ResourceKind::MembershipPlan => [Deny; 5],
        ResourceKind::PlanPrice => [Deny; 5],
        ResourceKind::Membership => [M, M, M, Deny, Deny],
        ResourceKind::Payment => [M, M, M, Deny, Deny],
        ResourceKind::DietPlan => [M, M, M, M, Deny],
        ResourceKind::WorkoutPlan => [M, M, M, M, Deny],
    }
}

fn column(action: Action) -> usize {
    match action {
        Action::Create => 0,
        Action::Read => 1,
        Action::ReadAll => 2,
        Action::Update => 3,
        Action::Delete => 4,
    }
}

pub fn rule_for(role: UserRole, kind: ResourceKind, action: Action) -> Rule {
    match role {
        UserRole::Admin => Allow,
        UserRole::GymAdmin => gym_admin_row(kind)[column(action)],
        UserRole::GymMember => gym_member_row(kind)[column(action)],
    }
}

/// Fields a role may not change on a resource even when the update itself is
/// allowed.
pub fn protected_fields(role: UserRole, kind: ResourceKind) -> &'static [&'static str] {
    match (role, kind) {
        (UserRole::Admin, _) => &[],
        (UserRole::GymAdmin, ResourceKind::User) => &["role"],
        (UserRole::GymMember, ResourceKind::User) => &["role", "status"],
        (_, ResourceKind::MembershipPlan) => &["gym_id"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_allowed_everywhere() {
        for kind in ResourceKind::ALL {
            for action in Action::ALL {
                assert_eq!(rule_for(UserRole::Admin, kind, action), Allow);
            }
        }
    }

    #[test]
    fn test_read_and_list_rules_agree() {
        for role in [UserRole::Admin, UserRole::GymAdmin, UserRole::GymMember] {
            for kind in ResourceKind::ALL {
                assert_eq!(
                    rule_for(role, kind, Action::Read),
                    rule_for(role, kind, Action::ReadAll),
                    "{role} / {kind}"
                );
            }
        }
    }

    #[test]
    fn test_non_admins_never_get_unconditional_access() {
        for role in [UserRole::GymAdmin, UserRole::GymMember] {
            for kind in ResourceKind::ALL {
                for action in Action::ALL {
                    assert_ne!(rule_for(role, kind, action), Allow);
                }
            }
        }
    }

    #[test]
    fn test_members_cannot_delete() {
        for kind in ResourceKind::ALL {
            assert_eq!(rule_for(UserRole::GymMember, kind, Action::Delete), Deny);
        }
    }

    #[test]
    fn test_gym_admin_cannot_touch_platform_owned_gyms() {
        assert_eq!(rule_for(UserRole::GymAdmin, ResourceKind::Gym, Action::Create), Deny);
        assert_eq!(rule_for(UserRole::GymAdmin, ResourceKind::Gym, Action::Update), Deny);
        assert_eq!(rule_for(UserRole::GymAdmin, ResourceKind::Payment, Action::Delete), Deny);
    }

    #[test]
    fn test_member_status_is_protected() {
        assert!(protected_fields(UserRole::GymMember, ResourceKind::User).contains(&"status"));
        assert!(!protected_fields(UserRole::GymAdmin, ResourceKind::User).contains(&"status"));
        assert!(protected_fields(UserRole::Admin, ResourceKind::User).is_empty());
    }
}
