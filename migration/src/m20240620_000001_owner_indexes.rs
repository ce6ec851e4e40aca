use sea_orm_migration::prelude::*;

use crate::m20240601_000001_initial::{
    DietPlans, GymMemberLinks, MembersMemberships, MembershipPlans, Payments, PlanPrices,
    WorkoutPlans,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // owner columns drive both row filters and interval scans
        let indexes = [
            (
                "idx_gym_member_links_gym_id",
                GymMemberLinks::Table.into_iden(),
                GymMemberLinks::GymId.into_iden(),
            ),
            (
                "idx_membership_plans_gym_id",
                MembershipPlans::Table.into_iden(),
                MembershipPlans::GymId.into_iden(),
            ),
            (
                "idx_plan_prices_plan_id",
                PlanPrices::Table.into_iden(),
                PlanPrices::MembershipPlanId.into_iden(),
            ),
            (
                "idx_members_memberships_member_id",
                MembersMemberships::Table.into_iden(),
                MembersMemberships::MemberId.into_iden(),
            ),
            (
                "idx_payments_member_id",
                Payments::Table.into_iden(),
                Payments::MemberId.into_iden(),
            ),
            (
                "idx_diet_plans_member_id",
                DietPlans::Table.into_iden(),
                DietPlans::MemberId.into_iden(),
            ),
            (
                "idx_workout_plans_member_id",
                WorkoutPlans::Table.into_iden(),
                WorkoutPlans::MemberId.into_iden(),
            ),
        ];

        for (name, table, col) in indexes {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Ok(())
    }
}
