use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    Email,
    Phone,
    FirstName,
    LastName,
    Address,
    City,
    State,
    Pincode,
    Country,
    DateOfBirth,
    Gender,
    ProfilePicture,
    EmergencyContactName,
    EmergencyContactPhone,
    EmergencyContactRelation,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Gyms {
    Table,
    Id,
    Name,
    Address,
    City,
    State,
    Country,
    Pincode,
    PhoneNumber,
    Email,
    Website,
    ContactPerson,
    Currency,
    Latitude,
    Longitude,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum GymAdminLinks {
    Table,
    Id,
    GymAdminId,
    GymId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum GymMemberLinks {
    Table,
    Id,
    GymId,
    MemberId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum MembershipPlans {
    Table,
    Id,
    GymId,
    PlanName,
    PlanDescription,
    DurationUnit,
    DurationValue,
    Category,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum PlanPrices {
    Table,
    Id,
    MembershipPlanId,
    PriceCents,
    ValidityStart,
    ValidityEnd,
    Comments,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum MembersMemberships {
    Table,
    Id,
    MemberId,
    MembershipPlanId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Payments {
    Table,
    Id,
    MemberId,
    MembershipPlanId,
    StartDate,
    EndDate,
    PaymentDate,
    PaymentType,
    PaymentMethod,
    CalculationBreakup,
    TotalAmountCents,
    Comments,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum DietPlans {
    Table,
    Id,
    MemberId,
    PlanName,
    Comments,
    Chart,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum WorkoutPlans {
    Table,
    Id,
    MemberId,
    PlanName,
    Comments,
    Chart,
    CreatedAt,
    UpdatedAt,
}

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .default(Expr::cust("NOW()"))
        .null()
        .to_owned()
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[derive(DeriveMigrationName)]
pub struct Migration;

impl Migration {
    async fn create_enum(
        manager: &SchemaManager<'_>,
        name: &str,
        values: &[&str],
    ) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new(name))
                    .values(values.iter().map(|v| Alias::new(*v)).collect::<Vec<_>>())
                    .to_owned(),
            )
            .await
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        Self::create_enum(manager, "user_role", &["admin", "gym_admin", "gym_member"]).await?;
        Self::create_enum(manager, "active_status", &["active", "inactive"]).await?;
        Self::create_enum(manager, "gender", &["male", "female", "other"]).await?;
        Self::create_enum(manager, "duration_unit", &["days", "months", "years"]).await?;
        Self::create_enum(
            manager,
            "payment_type",
            &["calculated_fee", "discounted_fee", "topup"],
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(&mut id_col(Users::Id))
                    .col(ColumnDef::new(Users::Username).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .custom(Alias::new("user_role"))
                            .not_null()
                            .default("'gym_member'"),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(255).null().unique_key())
                    .col(ColumnDef::new(Users::Phone).string_len(10).null())
                    .col(ColumnDef::new(Users::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(100).null())
                    .col(ColumnDef::new(Users::Address).string_len(255).null())
                    .col(ColumnDef::new(Users::City).string_len(100).null())
                    .col(ColumnDef::new(Users::State).string_len(100).null())
                    .col(ColumnDef::new(Users::Pincode).string_len(6).null())
                    .col(ColumnDef::new(Users::Country).string_len(100).null())
                    .col(ColumnDef::new(Users::DateOfBirth).date().null())
                    .col(ColumnDef::new(Users::Gender).custom(Alias::new("gender")).null())
                    .col(ColumnDef::new(Users::ProfilePicture).string_len(512).null())
                    .col(ColumnDef::new(Users::EmergencyContactName).string_len(100).null())
                    .col(ColumnDef::new(Users::EmergencyContactPhone).string_len(10).null())
                    .col(ColumnDef::new(Users::EmergencyContactRelation).string_len(50).null())
                    .col(
                        ColumnDef::new(Users::Status)
                            .custom(Alias::new("active_status"))
                            .not_null()
                            .default("'active'"),
                    )
                    .col(&mut created_at(Users::CreatedAt))
                    .col(&mut created_at(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Gyms::Table)
                    .if_not_exists()
                    .col(&mut id_col(Gyms::Id))
                    .col(ColumnDef::new(Gyms::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Gyms::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Gyms::City).string_len(100).not_null())
                    .col(ColumnDef::new(Gyms::State).string_len(100).not_null())
                    .col(ColumnDef::new(Gyms::Country).string_len(100).not_null())
                    .col(ColumnDef::new(Gyms::Pincode).string_len(6).not_null())
                    .col(ColumnDef::new(Gyms::PhoneNumber).string_len(10).not_null())
                    .col(ColumnDef::new(Gyms::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Gyms::Website).string_len(512).null())
                    .col(ColumnDef::new(Gyms::ContactPerson).string_len(100).not_null())
                    .col(ColumnDef::new(Gyms::Currency).string_len(8).not_null())
                    .col(ColumnDef::new(Gyms::Latitude).double().not_null())
                    .col(ColumnDef::new(Gyms::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(Gyms::Status)
                            .custom(Alias::new("active_status"))
                            .not_null()
                            .default("'active'"),
                    )
                    .col(&mut created_at(Gyms::CreatedAt))
                    .col(&mut created_at(Gyms::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GymAdminLinks::Table)
                    .if_not_exists()
                    .col(&mut id_col(GymAdminLinks::Id))
                    .col(ColumnDef::new(GymAdminLinks::GymAdminId).big_integer().not_null())
                    .col(ColumnDef::new(GymAdminLinks::GymId).big_integer().not_null())
                    .col(&mut created_at(GymAdminLinks::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gym_admin_links_user")
                            .from(GymAdminLinks::Table, GymAdminLinks::GymAdminId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gym_admin_links_gym")
                            .from(GymAdminLinks::Table, GymAdminLinks::GymId)
                            .to(Gyms::Table, Gyms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GymMemberLinks::Table)
                    .if_not_exists()
                    .col(&mut id_col(GymMemberLinks::Id))
                    .col(ColumnDef::new(GymMemberLinks::GymId).big_integer().not_null())
                    .col(ColumnDef::new(GymMemberLinks::MemberId).big_integer().not_null())
                    .col(&mut created_at(GymMemberLinks::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gym_member_links_gym")
                            .from(GymMemberLinks::Table, GymMemberLinks::GymId)
                            .to(Gyms::Table, Gyms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gym_member_links_user")
                            .from(GymMemberLinks::Table, GymMemberLinks::MemberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MembershipPlans::Table)
                    .if_not_exists()
                    .col(&mut id_col(MembershipPlans::Id))
                    .col(ColumnDef::new(MembershipPlans::GymId).big_integer().not_null())
                    .col(ColumnDef::new(MembershipPlans::PlanName).string_len(255).not_null())
                    .col(ColumnDef::new(MembershipPlans::PlanDescription).text().null())
                    .col(
                        ColumnDef::new(MembershipPlans::DurationUnit)
                            .custom(Alias::new("duration_unit"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(MembershipPlans::DurationValue).integer().not_null())
                    .col(ColumnDef::new(MembershipPlans::Category).string_len(100).not_null())
                    .col(&mut created_at(MembershipPlans::CreatedAt))
                    .col(&mut created_at(MembershipPlans::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_membership_plans_gym")
                            .from(MembershipPlans::Table, MembershipPlans::GymId)
                            .to(Gyms::Table, Gyms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlanPrices::Table)
                    .if_not_exists()
                    .col(&mut id_col(PlanPrices::Id))
                    .col(ColumnDef::new(PlanPrices::MembershipPlanId).big_integer().not_null())
                    .col(ColumnDef::new(PlanPrices::PriceCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(PlanPrices::ValidityStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlanPrices::ValidityEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PlanPrices::Comments).text().null())
                    .col(&mut created_at(PlanPrices::CreatedAt))
                    .col(&mut created_at(PlanPrices::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plan_prices_plan")
                            .from(PlanPrices::Table, PlanPrices::MembershipPlanId)
                            .to(MembershipPlans::Table, MembershipPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MembersMemberships::Table)
                    .if_not_exists()
                    .col(&mut id_col(MembersMemberships::Id))
                    .col(ColumnDef::new(MembersMemberships::MemberId).big_integer().not_null())
                    .col(
                        ColumnDef::new(MembersMemberships::MembershipPlanId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MembersMemberships::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MembersMemberships::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(&mut created_at(MembersMemberships::CreatedAt))
                    .col(&mut created_at(MembersMemberships::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_memberships_member")
                            .from(MembersMemberships::Table, MembersMemberships::MemberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_memberships_plan")
                            .from(MembersMemberships::Table, MembersMemberships::MembershipPlanId)
                            .to(MembershipPlans::Table, MembershipPlans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(&mut id_col(Payments::Id))
                    .col(ColumnDef::new(Payments::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::MembershipPlanId).big_integer().null())
                    .col(ColumnDef::new(Payments::StartDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Payments::EndDate).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Payments::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::PaymentType)
                            .custom(Alias::new("payment_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::PaymentMethod).string_len(50).not_null())
                    .col(ColumnDef::new(Payments::CalculationBreakup).text().null())
                    .col(ColumnDef::new(Payments::TotalAmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Comments).text().null())
                    .col(&mut created_at(Payments::CreatedAt))
                    .col(&mut created_at(Payments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_member")
                            .from(Payments::Table, Payments::MemberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_plan")
                            .from(Payments::Table, Payments::MembershipPlanId)
                            .to(MembershipPlans::Table, MembershipPlans::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DietPlans::Table)
                    .if_not_exists()
                    .col(&mut id_col(DietPlans::Id))
                    .col(ColumnDef::new(DietPlans::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(DietPlans::PlanName).string_len(255).not_null())
                    .col(ColumnDef::new(DietPlans::Comments).text().null())
                    .col(ColumnDef::new(DietPlans::Chart).text().null())
                    .col(&mut created_at(DietPlans::CreatedAt))
                    .col(&mut created_at(DietPlans::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_diet_plans_member")
                            .from(DietPlans::Table, DietPlans::MemberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkoutPlans::Table)
                    .if_not_exists()
                    .col(&mut id_col(WorkoutPlans::Id))
                    .col(ColumnDef::new(WorkoutPlans::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(WorkoutPlans::PlanName).string_len(255).not_null())
                    .col(ColumnDef::new(WorkoutPlans::Comments).text().null())
                    .col(ColumnDef::new(WorkoutPlans::Chart).text().null())
                    .col(&mut created_at(WorkoutPlans::CreatedAt))
                    .col(&mut created_at(WorkoutPlans::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workout_plans_member")
                            .from(WorkoutPlans::Table, WorkoutPlans::MemberId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkoutPlans::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DietPlans::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MembersMemberships::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlanPrices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MembershipPlans::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GymMemberLinks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GymAdminLinks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Gyms::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        for name in ["payment_type", "duration_unit", "gender", "active_status", "user_role"] {
            manager
                .drop_type(Type::drop().if_exists().name(Alias::new(name)).to_owned())
                .await?;
        }
        Ok(())
    }
}
