use crate::entities::UserRole;
use serde::Serialize;

/// The resolved identity of whoever is making the request.
///
/// `gym_id` is derived from the caller's gym link on every request and is
/// `None` for admins and for gym admins / members that are not linked yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub id: i64,
    pub role: UserRole,
    pub gym_id: Option<i64>,
}

impl Caller {
    pub fn new(id: i64, role: UserRole, gym_id: Option<i64>) -> Self {
        Self { id, role, gym_id }
    }

    pub fn admin(id: i64) -> Self {
        Self::new(id, UserRole::Admin, None)
    }

    pub fn gym_admin(id: i64, gym_id: Option<i64>) -> Self {
        Self::new(id, UserRole::GymAdmin, gym_id)
    }

    pub fn gym_member(id: i64, gym_id: Option<i64>) -> Self {
        Self::new(id, UserRole::GymMember, gym_id)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    ReadAll,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::ReadAll,
        Action::Update,
        Action::Delete,
    ];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Read => write!(f, "read"),
            Action::ReadAll => write!(f, "read_all"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Gym,
    GymAdminLink,
    GymMemberLink,
    MembershipPlan,
    PlanPrice,
    Membership,
    Payment,
    DietPlan,
    WorkoutPlan,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 10] = [
        ResourceKind::User,
        ResourceKind::Gym,
        ResourceKind::GymAdminLink,
        ResourceKind::GymMemberLink,
        ResourceKind::MembershipPlan,
        ResourceKind::PlanPrice,
        ResourceKind::Membership,
        ResourceKind::Payment,
        ResourceKind::DietPlan,
        ResourceKind::WorkoutPlan,
    ];

    /// Human readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::User => "User",
            ResourceKind::Gym => "Gym",
            ResourceKind::GymAdminLink => "Gym admin link",
            ResourceKind::GymMemberLink => "Gym member link",
            ResourceKind::MembershipPlan => "Membership plan",
            ResourceKind::PlanPrice => "Membership plan price",
            ResourceKind::Membership => "Membership",
            ResourceKind::Payment => "Payment",
            ResourceKind::DietPlan => "Diet plan",
            ResourceKind::WorkoutPlan => "Workout plan",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
