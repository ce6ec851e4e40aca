//! Compiles authorization row filters into store conditions and runs
//! paginated queries with them.

use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, Select};

use crate::authz::{ResourceKind, RowFilter};
use crate::entities::{
    diet_plan_entity, gym_admin_link_entity, gym_entity, gym_member_link_entity,
    membership_entity, membership_plan_entity, payment_entity, plan_price_entity, user_entity,
    workout_plan_entity,
};
use crate::error::AppResult;
use crate::models::{PaginatedResponse, PaginationParams};

fn never() -> Condition {
    Condition::all().add(Expr::val(1).eq(2))
}

fn members_of(gym_id: i64) -> SelectStatement {
    Query::select()
        .column(gym_member_link_entity::Column::MemberId)
        .from(gym_member_link_entity::Entity)
        .and_where(gym_member_link_entity::Column::GymId.eq(gym_id))
        .to_owned()
}

fn admins_of(gym_id: i64) -> SelectStatement {
    Query::select()
        .column(gym_admin_link_entity::Column::GymAdminId)
        .from(gym_admin_link_entity::Entity)
        .and_where(gym_admin_link_entity::Column::GymId.eq(gym_id))
        .to_owned()
}

fn plans_of(gym_id: i64) -> SelectStatement {
    Query::select()
        .column(membership_plan_entity::Column::Id)
        .from(membership_plan_entity::Entity)
        .and_where(membership_plan_entity::Column::GymId.eq(gym_id))
        .to_owned()
}

/// Rows that carry their gym directly and have no owning member.
fn gym_owned(gym_col: impl ColumnTrait, filter: RowFilter) -> Condition {
    match filter {
        RowFilter::Unrestricted => Condition::all(),
        RowFilter::OwningGym(gym_id) => Condition::all().add(gym_col.eq(gym_id)),
        RowFilter::OwningMember(_) | RowFilter::Nothing => never(),
    }
}

/// Rows owned by a member; their gym is the member's gym link.
fn member_owned(member_col: impl ColumnTrait, filter: RowFilter) -> Condition {
    match filter {
        RowFilter::Unrestricted => Condition::all(),
        RowFilter::OwningGym(gym_id) => {
            Condition::all().add(member_col.in_subquery(members_of(gym_id)))
        }
        RowFilter::OwningMember(member_id) => Condition::all().add(member_col.eq(member_id)),
        RowFilter::Nothing => never(),
    }
}

pub fn condition(kind: ResourceKind, filter: RowFilter) -> Condition {
    match kind {
        ResourceKind::User => match filter {
            RowFilter::OwningGym(gym_id) => Condition::any()
                .add(user_entity::Column::Id.in_subquery(members_of(gym_id)))
                .add(user_entity::Column::Id.in_subquery(admins_of(gym_id))),
            other => member_owned(user_entity::Column::Id, other),
        },
        ResourceKind::Gym => gym_owned(gym_entity::Column::Id, filter),
        ResourceKind::GymAdminLink => gym_owned(gym_admin_link_entity::Column::GymId, filter),
        ResourceKind::GymMemberLink => match filter {
            RowFilter::OwningGym(gym_id) => {
                Condition::all().add(gym_member_link_entity::Column::GymId.eq(gym_id))
            }
            other => member_owned(gym_member_link_entity::Column::MemberId, other),
        },
        ResourceKind::MembershipPlan => gym_owned(membership_plan_entity::Column::GymId, filter),
        ResourceKind::PlanPrice => match filter {
            RowFilter::OwningGym(gym_id) => Condition::all()
                .add(plan_price_entity::Column::MembershipPlanId.in_subquery(plans_of(gym_id))),
            other => gym_owned(plan_price_entity::Column::MembershipPlanId, other),
        },
        // billing rows stay with the gym that sold the plan
        ResourceKind::Membership => match filter {
            RowFilter::OwningGym(gym_id) => Condition::all()
                .add(membership_entity::Column::MembershipPlanId.in_subquery(plans_of(gym_id))),
            other => member_owned(membership_entity::Column::MemberId, other),
        },
        ResourceKind::Payment => match filter {
            RowFilter::OwningGym(gym_id) => Condition::any()
                .add(payment_entity::Column::MembershipPlanId.in_subquery(plans_of(gym_id)))
                .add(
                    Condition::all()
                        .add(payment_entity::Column::MembershipPlanId.is_null())
                        .add(payment_entity::Column::MemberId.in_subquery(members_of(gym_id))),
                ),
            other => member_owned(payment_entity::Column::MemberId, other),
        },
        ResourceKind::DietPlan => member_owned(diet_plan_entity::Column::MemberId, filter),
        ResourceKind::WorkoutPlan => member_owned(workout_plan_entity::Column::MemberId, filter),
    }
}

pub async fn fetch_page<E, R>(
    conn: &DatabaseConnection,
    select: Select<E>,
    params: &PaginationParams,
) -> AppResult<PaginatedResponse<R>>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    R: From<E::Model>,
{
    let page = params.page();
    let page_size = params.page_size();
    let paginator = select.paginate(conn, page_size);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page - 1).await?;

    Ok(PaginatedResponse::new(
        rows.into_iter().map(R::from).collect(),
        page,
        page_size,
        total,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryFilter, QueryTrait};

    fn sql<E: EntityTrait>(select: Select<E>, cond: Condition) -> String {
        select.filter(cond).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_member_owned_gym_filter_goes_through_links() {
        let text = sql(
            diet_plan_entity::Entity::find(),
            condition(ResourceKind::DietPlan, RowFilter::OwningGym(3)),
        );
        assert!(text.contains("IN (SELECT"), "{text}");
        assert!(text.contains("\"gym_member_links\""), "{text}");
        assert!(text.contains("= 3"), "{text}");
    }

    #[test]
    fn test_memberships_scoped_by_selling_gym() {
        let text = sql(
            membership_entity::Entity::find(),
            condition(ResourceKind::Membership, RowFilter::OwningGym(3)),
        );
        assert!(text.contains("\"membership_plan_id\" IN (SELECT"), "{text}");
        assert!(text.contains("\"membership_plans\""), "{text}");
        assert!(!text.contains("\"gym_member_links\""), "{text}");
    }

    #[test]
    fn test_planless_payments_fall_back_to_member_link() {
        let text = sql(
            payment_entity::Entity::find(),
            condition(ResourceKind::Payment, RowFilter::OwningGym(4)),
        );
        assert!(text.contains("\"membership_plans\""), "{text}");
        assert!(text.contains("IS NULL"), "{text}");
        assert!(text.contains("\"gym_member_links\""), "{text}");
        assert!(text.contains(" OR "), "{text}");
    }

    #[test]
    fn test_self_filter_is_plain_equality() {
        let text = sql(
            payment_entity::Entity::find(),
            condition(ResourceKind::Payment, RowFilter::OwningMember(11)),
        );
        assert!(text.contains("\"member_id\" = 11"), "{text}");
        assert!(!text.contains("SELECT \"member_id\" FROM"), "{text}");
    }

    #[test]
    fn test_nothing_matches_no_rows() {
        let text = sql(
            gym_entity::Entity::find(),
            condition(ResourceKind::Gym, RowFilter::Nothing),
        );
        assert!(text.contains("1 = 2"), "{text}");
    }

    #[test]
    fn test_prices_scoped_through_plans() {
        let text = sql(
            plan_price_entity::Entity::find(),
            condition(ResourceKind::PlanPrice, RowFilter::OwningGym(5)),
        );
        assert!(text.contains("\"membership_plans\""), "{text}");
        assert!(text.contains("= 5"), "{text}");
    }

    #[test]
    fn test_users_scoped_through_both_link_tables() {
        let text = sql(
            user_entity::Entity::find(),
            condition(ResourceKind::User, RowFilter::OwningGym(2)),
        );
        assert!(text.contains("\"gym_member_links\""), "{text}");
        assert!(text.contains("\"gym_admin_links\""), "{text}");
        assert!(text.contains(" OR "), "{text}");
    }
}
