use async_trait::async_trait;

use super::caller::{Action, Caller, ResourceKind};
use super::filter::RowFilter;
use super::policy::{self, Rule};
use crate::error::{AppError, AppResult};

/// Who a row belongs to. Either side may be unknown: a gym row has no member,
/// and a member that was never linked has no gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Owner {
    pub gym_id: Option<i64>,
    pub member_id: Option<i64>,
}

impl Owner {
    pub fn gym(gym_id: i64) -> Self {
        Self {
            gym_id: Some(gym_id),
            member_id: None,
        }
    }

    pub fn member(member_id: i64, gym_id: Option<i64>) -> Self {
        Self {
            gym_id,
            member_id: Some(member_id),
        }
    }
}

/// The thing a new row will hang off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// Platform level, no owning gym or member.
    Root,
    Gym(i64),
    Member(i64),
    Plan(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// An existing row of the resource being acted on.
    Row(i64),
    /// A row that does not exist yet, to be created under `Parent`.
    Under(Parent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
    NotFound,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn into_result(self, kind: ResourceKind) -> AppResult<()> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied => Err(AppError::Forbidden),
            Decision::NotFound => Err(AppError::NotFound(format!("{kind} not found"))),
        }
    }
}

/// Looks up the owner of a row. `Ok(None)` means the row does not exist.
#[async_trait]
pub trait OwnershipResolver: Send + Sync {
    async fn owner_of(&self, kind: ResourceKind, id: i64) -> AppResult<Option<Owner>>;
}

#[derive(Clone)]
pub struct Authorizer<R> {
    resolver: R,
}

impl<R: OwnershipResolver> Authorizer<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Decide a single-row action. Existence is always checked before
    /// ownership, so a missing row or parent yields `NotFound`.
    pub async fn authorize(
        &self,
        caller: &Caller,
        action: Action,
        kind: ResourceKind,
        target: Target,
    ) -> AppResult<Decision> {
        let owner = match self.resolve_target(kind, target).await? {
            Some(owner) => owner,
            None => return Ok(Decision::NotFound),
        };

        Ok(evaluate(caller, policy::rule_for(caller.role, kind, action), &owner))
    }

    /// Like [`authorize`](Self::authorize) but converts the decision into an
    /// error, logging denials. Returns the resolved owner on success.
    pub async fn enforce(
        &self,
        caller: &Caller,
        action: Action,
        kind: ResourceKind,
        target: Target,
    ) -> AppResult<Owner> {
        let owner = match self.resolve_target(kind, target).await? {
            Some(owner) => owner,
            None => return Err(AppError::NotFound(format!("{kind} not found"))),
        };

        let decision = evaluate(caller, policy::rule_for(caller.role, kind, action), &owner);
        if decision == Decision::Denied {
            log::warn!(
                "Denied {} on {} ({:?}) for user {} with role {}",
                action,
                kind,
                target,
                caller.id,
                caller.role
            );
        }
        decision.into_result(kind)?;
        Ok(owner)
    }

    pub fn row_filter(&self, caller: &Caller, kind: ResourceKind) -> Option<RowFilter> {
        row_filter(caller, kind)
    }

    async fn resolve_target(&self, kind: ResourceKind, target: Target) -> AppResult<Option<Owner>> {
        match target {
            Target::Row(id) => self.resolver.owner_of(kind, id).await,
            Target::Under(Parent::Root) => Ok(Some(Owner::default())),
            Target::Under(Parent::Gym(id)) => self.resolver.owner_of(ResourceKind::Gym, id).await,
            Target::Under(Parent::Member(id)) => {
                self.resolver.owner_of(ResourceKind::User, id).await
            }
            Target::Under(Parent::Plan(id)) => {
                self.resolver
                    .owner_of(ResourceKind::MembershipPlan, id)
                    .await
            }
        }
    }
}

/// List scoping for `caller` on `kind`. `None` means listing is forbidden.
pub fn row_filter(caller: &Caller, kind: ResourceKind) -> Option<RowFilter> {
    match policy::rule_for(caller.role, kind, Action::ReadAll) {
        Rule::Allow => Some(RowFilter::Unrestricted),
        Rule::Deny => None,
        Rule::SameGym => Some(caller.gym_id.map_or(RowFilter::Nothing, RowFilter::OwningGym)),
        Rule::SelfOwned => Some(RowFilter::OwningMember(caller.id)),
    }
}

/// Reject updates that touch fields the caller's role may not change.
pub fn check_fields(caller: &Caller, kind: ResourceKind, changed: &[&str]) -> AppResult<()> {
    let protected = policy::protected_fields(caller.role, kind);
    if let Some(field) = changed.iter().find(|f| protected.contains(f)) {
        log::warn!(
            "User {} with role {} may not change {} of {}",
            caller.id,
            caller.role,
            field,
            kind
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

fn evaluate(caller: &Caller, rule: Rule, owner: &Owner) -> Decision {
    let allowed = match rule {
        Rule::Allow => true,
        Rule::Deny => false,
        Rule::SameGym => caller.gym_id.is_some() && caller.gym_id == owner.gym_id,
        Rule::SelfOwned => owner.member_id == Some(caller.id),
    };
    if allowed {
        Decision::Allowed
    } else {
        Decision::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory owner table keyed by (kind, id).
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<HashMap<(ResourceKind, i64), Owner>>,
    }

    impl MemoryStore {
        fn insert(&self, kind: ResourceKind, id: i64, owner: Owner) {
            self.rows.lock().unwrap().insert((kind, id), owner);
        }

        fn all(&self) -> Vec<(ResourceKind, i64, Owner)> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .map(|((kind, id), owner)| (*kind, *id, *owner))
                .collect()
        }
    }

    #[async_trait]
    impl OwnershipResolver for MemoryStore {
        async fn owner_of(&self, kind: ResourceKind, id: i64) -> AppResult<Option<Owner>> {
            Ok(self.rows.lock().unwrap().get(&(kind, id)).copied())
        }
    }

    fn seeded() -> Authorizer<MemoryStore> {
        let store = MemoryStore::default();
        // gyms 1 and 2, gym admins 10 and 20, members 11 (gym 1) and 21 (gym 2)
        store.insert(ResourceKind::Gym, 1, Owner::gym(1));
        store.insert(ResourceKind::Gym, 2, Owner::gym(2));
        store.insert(ResourceKind::User, 10, Owner::member(10, Some(1)));
        store.insert(ResourceKind::User, 20, Owner::member(20, Some(2)));
        store.insert(ResourceKind::User, 11, Owner::member(11, Some(1)));
        store.insert(ResourceKind::User, 21, Owner::member(21, Some(2)));
        store.insert(ResourceKind::User, 30, Owner::member(30, None));
        store.insert(ResourceKind::GymAdminLink, 1, Owner::gym(1));
        store.insert(ResourceKind::GymAdminLink, 2, Owner::gym(2));
        store.insert(ResourceKind::GymMemberLink, 1, Owner::member(11, Some(1)));
        store.insert(ResourceKind::GymMemberLink, 2, Owner::member(21, Some(2)));
        store.insert(ResourceKind::MembershipPlan, 100, Owner::gym(1));
        store.insert(ResourceKind::MembershipPlan, 200, Owner::gym(2));
        store.insert(ResourceKind::PlanPrice, 1000, Owner::gym(1));
        store.insert(ResourceKind::PlanPrice, 2000, Owner::gym(2));
        for kind in [
            ResourceKind::Membership,
            ResourceKind::Payment,
            ResourceKind::DietPlan,
            ResourceKind::WorkoutPlan,
        ] {
            store.insert(kind, 1, Owner::member(11, Some(1)));
            store.insert(kind, 2, Owner::member(21, Some(2)));
            store.insert(kind, 3, Owner::member(30, None));
        }
        Authorizer::new(store)
    }

    fn callers() -> Vec<Caller> {
        vec![
            Caller::admin(1),
            Caller::gym_admin(10, Some(1)),
            Caller::gym_admin(20, Some(2)),
            Caller::gym_admin(40, None),
            Caller::gym_member(11, Some(1)),
            Caller::gym_member(21, Some(2)),
            Caller::gym_member(30, None),
        ]
    }

    #[tokio::test]
    async fn test_admin_allowed_on_every_row_and_action() {
        let authz = seeded();
        let admin = Caller::admin(1);
        for (kind, id, _) in authz.resolver().all() {
            for action in Action::ALL {
                let decision = authz.authorize(&admin, action, kind, Target::Row(id)).await.unwrap();
                assert_eq!(decision, Decision::Allowed, "{action} {kind} {id}");
            }
        }
        for kind in ResourceKind::ALL {
            assert_eq!(authz.row_filter(&admin, kind), Some(RowFilter::Unrestricted));
        }
    }

    #[tokio::test]
    async fn test_authorize_is_deterministic() {
        let authz = seeded();
        for caller in callers() {
            for (kind, id, _) in authz.resolver().all() {
                for action in Action::ALL {
                    let first = authz.authorize(&caller, action, kind, Target::Row(id)).await.unwrap();
                    let second = authz.authorize(&caller, action, kind, Target::Row(id)).await.unwrap();
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_gym_admin_denied_outside_own_gym() {
        let authz = seeded();
        let caller = Caller::gym_admin(10, Some(1));
        for (kind, id, owner) in authz.resolver().all() {
            if owner.gym_id == Some(1) {
                continue;
            }
            for action in [Action::Create, Action::Update, Action::Delete] {
                let decision = authz.authorize(&caller, action, kind, Target::Row(id)).await.unwrap();
                assert_eq!(decision, Decision::Denied, "{action} {kind} {id}");
            }
        }
        let decision = authz
            .authorize(
                &caller,
                Action::Create,
                ResourceKind::MembershipPlan,
                Target::Under(Parent::Gym(2)),
            )
            .await
            .unwrap();
        assert_eq!(decision, Decision::Denied);
    }

    #[tokio::test]
    async fn test_gym_admin_without_gym_sees_nothing() {
        let authz = seeded();
        let caller = Caller::gym_admin(40, None);
        for (kind, id, _) in authz.resolver().all() {
            for action in Action::ALL {
                let decision = authz.authorize(&caller, action, kind, Target::Row(id)).await.unwrap();
                assert_eq!(decision, Decision::Denied);
            }
        }
        assert_eq!(
            authz.row_filter(&caller, ResourceKind::Membership),
            Some(RowFilter::Nothing)
        );
        assert_eq!(
            authz.row_filter(&caller, ResourceKind::MembershipPlan),
            Some(RowFilter::Nothing)
        );
    }

    #[tokio::test]
    async fn test_member_denied_on_rows_of_others() {
        let authz = seeded();
        let caller = Caller::gym_member(11, Some(1));
        for kind in [
            ResourceKind::Membership,
            ResourceKind::Payment,
            ResourceKind::DietPlan,
            ResourceKind::WorkoutPlan,
        ] {
            for id in [2, 3] {
                for action in Action::ALL {
                    let decision = authz.authorize(&caller, action, kind, Target::Row(id)).await.unwrap();
                    assert_eq!(decision, Decision::Denied, "{action} {kind} {id}");
                }
            }
            let own = authz.authorize(&caller, Action::Read, kind, Target::Row(1)).await.unwrap();
            assert_eq!(own, Decision::Allowed);
        }

        let create_for_other = authz
            .authorize(
                &caller,
                Action::Create,
                ResourceKind::Membership,
                Target::Under(Parent::Member(21)),
            )
            .await
            .unwrap();
        assert_eq!(create_for_other, Decision::Denied);
    }

    #[tokio::test]
    async fn test_member_cannot_touch_gym_catalogue() {
        let authz = seeded();
        let caller = Caller::gym_member(11, Some(1));
        let decision = authz
            .authorize(&caller, Action::Read, ResourceKind::MembershipPlan, Target::Row(100))
            .await
            .unwrap();
        assert_eq!(decision, Decision::Denied);
        assert_eq!(authz.row_filter(&caller, ResourceKind::Gym), None);
    }

    #[tokio::test]
    async fn test_missing_row_is_not_found_before_ownership() {
        let authz = seeded();
        let caller = Caller::gym_member(11, Some(1));
        let decision = authz
            .authorize(&caller, Action::Delete, ResourceKind::Payment, Target::Row(999))
            .await
            .unwrap();
        assert_eq!(decision, Decision::NotFound);

        let decision = authz
            .authorize(
                &Caller::gym_admin(10, Some(1)),
                Action::Create,
                ResourceKind::MembershipPlan,
                Target::Under(Parent::Gym(999)),
            )
            .await
            .unwrap();
        assert_eq!(decision, Decision::NotFound);
    }

    #[tokio::test]
    async fn test_row_filter_agrees_with_single_reads() {
        let authz = seeded();
        let rows = authz.resolver().all();
        for caller in callers() {
            for kind in ResourceKind::ALL {
                let filter = authz.row_filter(&caller, kind);
                for (row_kind, id, owner) in rows.iter().filter(|(k, _, _)| *k == kind) {
                    let single = authz
                        .authorize(&caller, Action::Read, *row_kind, Target::Row(*id))
                        .await
                        .unwrap();
                    let listed = filter.is_some_and(|f| f.matches(owner));
                    assert_eq!(
                        listed,
                        single.is_allowed(),
                        "caller {} ({}) on {kind} {id}",
                        caller.id,
                        caller.role
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn test_gym_admin_plan_scenario() {
        let store = MemoryStore::default();
        store.insert(ResourceKind::Gym, 2, Owner::gym(2));
        let authz = Authorizer::new(store);
        let admin = Caller::admin(1);

        // admin creates G1
        let decision = authz
            .authorize(&admin, Action::Create, ResourceKind::Gym, Target::Under(Parent::Root))
            .await
            .unwrap();
        assert_eq!(decision, Decision::Allowed);
        authz.resolver().insert(ResourceKind::Gym, 1, Owner::gym(1));

        // admin creates gym admin U1 and links it to G1
        let decision = authz
            .authorize(&admin, Action::Create, ResourceKind::User, Target::Under(Parent::Root))
            .await
            .unwrap();
        assert_eq!(decision, Decision::Allowed);
        authz.resolver().insert(ResourceKind::User, 5, Owner::member(5, None));
        let decision = authz
            .authorize(
                &admin,
                Action::Create,
                ResourceKind::GymAdminLink,
                Target::Under(Parent::Gym(1)),
            )
            .await
            .unwrap();
        assert_eq!(decision, Decision::Allowed);
        authz.resolver().insert(ResourceKind::User, 5, Owner::member(5, Some(1)));

        let u1 = Caller::gym_admin(5, Some(1));
        let decision = authz
            .authorize(
                &u1,
                Action::Create,
                ResourceKind::MembershipPlan,
                Target::Under(Parent::Gym(1)),
            )
            .await
            .unwrap();
        assert_eq!(decision, Decision::Allowed);
        authz.resolver().insert(ResourceKind::MembershipPlan, 1, Owner::gym(1));

        let decision = authz
            .authorize(
                &u1,
                Action::Create,
                ResourceKind::MembershipPlan,
                Target::Under(Parent::Gym(2)),
            )
            .await
            .unwrap();
        assert_eq!(decision, Decision::Denied);

        let err = authz
            .enforce(
                &u1,
                Action::Create,
                ResourceKind::MembershipPlan,
                Target::Under(Parent::Gym(2)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn test_check_fields() {
        let member = Caller::gym_member(11, Some(1));
        assert!(check_fields(&member, ResourceKind::User, &["first_name", "city"]).is_ok());
        assert!(matches!(
            check_fields(&member, ResourceKind::User, &["status"]),
            Err(AppError::Forbidden)
        ));

        let gym_admin = Caller::gym_admin(10, Some(1));
        assert!(check_fields(&gym_admin, ResourceKind::User, &["status"]).is_ok());
        assert!(check_fields(&gym_admin, ResourceKind::MembershipPlan, &["gym_id"]).is_err());
        assert!(check_fields(&Caller::admin(1), ResourceKind::MembershipPlan, &["gym_id"]).is_ok());
    }

    #[test]
    fn test_decision_into_result() {
        assert!(Decision::Allowed.into_result(ResourceKind::Gym).is_ok());
        assert!(matches!(
            Decision::Denied.into_result(ResourceKind::Gym),
            Err(AppError::Forbidden)
        ));
        match Decision::NotFound.into_result(ResourceKind::Gym) {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Gym not found"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
