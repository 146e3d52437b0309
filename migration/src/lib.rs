pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_partners;
mod m20251001_000002_create_commissions;
mod m20251008_000001_create_payout_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_partners::Migration),
            Box::new(m20251001_000002_create_commissions::Migration),
            Box::new(m20251008_000001_create_payout_requests::Migration),
        ]
    }
}
