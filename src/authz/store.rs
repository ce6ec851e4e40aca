use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::caller::ResourceKind;
use super::engine::{Owner, OwnershipResolver};
use crate::entities::{
    UserRole, diet_plan_entity, gym_admin_link_entity, gym_entity, gym_member_link_entity,
    membership_entity, membership_plan_entity, payment_entity, plan_price_entity, user_entity,
    workout_plan_entity,
};
use crate::error::AppResult;

/// Resolves owners from the database on every call. Nothing is cached, so
/// link changes take effect on the next request.
#[derive(Clone)]
pub struct StoreOwnership {
    pool: DatabaseConnection,
}

impl StoreOwnership {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

/// The gym a user is linked to, through the link table matching their role.
pub async fn linked_gym<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    role: UserRole,
) -> AppResult<Option<i64>> {
    let gym_id = match role {
        UserRole::Admin => None,
        UserRole::GymAdmin => gym_admin_link_entity::Entity::find()
            .filter(gym_admin_link_entity::Column::GymAdminId.eq(user_id))
            .one(conn)
            .await?
            .map(|link| link.gym_id),
        UserRole::GymMember => gym_member_link_entity::Entity::find()
            .filter(gym_member_link_entity::Column::MemberId.eq(user_id))
            .one(conn)
            .await?
            .map(|link| link.gym_id),
    };
    Ok(gym_id)
}

async fn member_owner<C: ConnectionTrait>(conn: &C, member_id: i64) -> AppResult<Owner> {
    let gym_id = linked_gym(conn, member_id, UserRole::GymMember).await?;
    Ok(Owner::member(member_id, gym_id))
}

async fn plan_gym<C: ConnectionTrait>(conn: &C, plan_id: i64) -> AppResult<Option<i64>> {
    let plan = membership_plan_entity::Entity::find_by_id(plan_id).one(conn).await?;
    Ok(plan.map(|p| p.gym_id))
}

/// Owner of a billing record. The gym is the one whose plan was sold, so a
/// member moving gyms does not carry old memberships along; the member's
/// current link only applies when no plan is attached.
pub(crate) fn billed_owner(
    member_id: i64,
    plan_gym: Option<i64>,
    linked_gym: Option<i64>,
) -> Owner {
    Owner::member(member_id, plan_gym.or(linked_gym))
}

#[async_trait]
impl OwnershipResolver for StoreOwnership {
    async fn owner_of(&self, kind: ResourceKind, id: i64) -> AppResult<Option<Owner>> {
        let conn = &self.pool;
        let member_id = match kind {
            ResourceKind::User => {
                let Some(user) = user_entity::Entity::find_by_id(id).one(conn).await? else {
                    return Ok(None);
                };
                let gym_id = linked_gym(conn, user.id, user.role).await?;
                return Ok(Some(Owner::member(user.id, gym_id)));
            }
            ResourceKind::Gym => {
                let gym = gym_entity::Entity::find_by_id(id).one(conn).await?;
                return Ok(gym.map(|g| Owner::gym(g.id)));
            }
            ResourceKind::GymAdminLink => {
                let link = gym_admin_link_entity::Entity::find_by_id(id).one(conn).await?;
                return Ok(link.map(|l| Owner::gym(l.gym_id)));
            }
            ResourceKind::GymMemberLink => {
                let link = gym_member_link_entity::Entity::find_by_id(id).one(conn).await?;
                return Ok(link.map(|l| Owner::member(l.member_id, Some(l.gym_id))));
            }
            ResourceKind::MembershipPlan => {
                let plan = membership_plan_entity::Entity::find_by_id(id).one(conn).await?;
                return Ok(plan.map(|p| Owner::gym(p.gym_id)));
            }
            ResourceKind::PlanPrice => {
                let Some(price) = plan_price_entity::Entity::find_by_id(id).one(conn).await? else {
                    return Ok(None);
                };
                let plan = membership_plan_entity::Entity::find_by_id(price.membership_plan_id)
                    .one(conn)
                    .await?;
                return Ok(Some(plan.map_or_else(Owner::default, |p| Owner::gym(p.gym_id))));
            }
            ResourceKind::Membership => {
                let Some(membership) = membership_entity::Entity::find_by_id(id).one(conn).await?
                else {
                    return Ok(None);
                };
                let gym_id = plan_gym(conn, membership.membership_plan_id).await?;
                return Ok(Some(billed_owner(membership.member_id, gym_id, None)));
            }
            ResourceKind::Payment => {
                let Some(payment) = payment_entity::Entity::find_by_id(id).one(conn).await? else {
                    return Ok(None);
                };
                let owner = match payment.membership_plan_id {
                    Some(plan_id) => {
                        billed_owner(payment.member_id, plan_gym(conn, plan_id).await?, None)
                    }
                    None => member_owner(conn, payment.member_id).await?,
                };
                return Ok(Some(owner));
            }
            ResourceKind::DietPlan => diet_plan_entity::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|d| d.member_id),
            ResourceKind::WorkoutPlan => workout_plan_entity::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|w| w.member_id),
        };

        match member_id {
            Some(member_id) => Ok(Some(member_owner(conn, member_id).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::{Caller, RowFilter, row_filter};

    #[test]
    fn test_billing_gym_follows_plan_after_member_moves() {
        // sold by gym 1, member since relinked to gym 2
        let owner = billed_owner(11, Some(1), Some(2));
        assert_eq!(owner, Owner::member(11, Some(1)));

        let old_gym = Caller::gym_admin(10, Some(1));
        let new_gym = Caller::gym_admin(20, Some(2));
        for kind in [ResourceKind::Membership, ResourceKind::Payment] {
            assert!(row_filter(&old_gym, kind).unwrap().matches(&owner));
            assert!(!row_filter(&new_gym, kind).unwrap().matches(&owner));
        }

        // the member keeps seeing their own history
        let member = Caller::gym_member(11, Some(2));
        assert_eq!(
            row_filter(&member, ResourceKind::Membership),
            Some(RowFilter::OwningMember(11))
        );
        assert!(RowFilter::OwningMember(11).matches(&owner));
    }

    #[test]
    fn test_planless_payment_follows_member_link() {
        assert_eq!(billed_owner(11, None, Some(2)), Owner::member(11, Some(2)));
        assert_eq!(billed_owner(11, None, None), Owner::member(11, None));
    }
}
