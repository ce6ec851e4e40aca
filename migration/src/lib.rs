pub use sea_orm_migration::prelude::*;

mod m20240601_000001_initial;
mod m20240615_000001_link_cardinality;
mod m20240620_000001_owner_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_initial::Migration),
            Box::new(m20240615_000001_link_cardinality::Migration),
            Box::new(m20240620_000001_owner_indexes::Migration),
        ]
    }
}
