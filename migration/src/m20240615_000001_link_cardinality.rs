use sea_orm_migration::prelude::*;

use crate::m20240601_000001_initial::{GymAdminLinks, GymMemberLinks};

/// One gym per gym admin, one gym admin per gym, one gym per member.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_gym_admin_links_gym_id")
                    .table(GymAdminLinks::Table)
                    .col(GymAdminLinks::GymId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_gym_admin_links_gym_admin_id")
                    .table(GymAdminLinks::Table)
                    .col(GymAdminLinks::GymAdminId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_gym_member_links_member_id")
                    .table(GymMemberLinks::Table)
                    .col(GymMemberLinks::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("uq_gym_admin_links_gym_id", GymAdminLinks::Table.into_iden()),
            ("uq_gym_admin_links_gym_admin_id", GymAdminLinks::Table.into_iden()),
            ("uq_gym_member_links_member_id", GymMemberLinks::Table.into_iden()),
        ] {
            manager
                .drop_index(Index::drop().if_exists().name(name).table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
