//! Database seeder for Assetbook development.
//!
//! Creates a demo client with two accounting periods, three categories and a
//! handful of assets, then drives a full roll-forward: seed, post movements,
//! recalculate, close, open the next period and seed it. The schedule of the
//! second period is printed as JSON.
//!
//! Usage: cargo run --bin seeder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assetbook_core::asset::{DepreciationMethod, FixedAsset};
use assetbook_core::ledger::{MovementInput, MovementType};
use assetbook_core::period::PeriodStatus;
use assetbook_core::schedule::AssetSchedule;
use assetbook_db::migration::Migrator;
use assetbook_db::repositories::{
    AssetRepository, CreateAssetInput, CreatePeriodInput, DepreciationRepository,
    MovementRepository, PeriodBalanceRepository, PeriodRepository, PostMovementInput,
    ScheduleRepository,
};
use assetbook_shared::config::LoggingConfig;
use assetbook_shared::types::{CategoryId, ClientId};
use assetbook_shared::{AppConfig, AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let db = assetbook_db::connect_with(&config.database).await?;
    Migrator::up(&db, None).await?;
    info!("Database migrated");

    let seeder = Seeder {
        client_id: ClientId::new(),
        periods: PeriodRepository::new(db.clone()),
        assets: AssetRepository::new(db.clone()),
        balances: PeriodBalanceRepository::new(db.clone()),
        movements: MovementRepository::new(db.clone()),
        depreciation: DepreciationRepository::new(db.clone(), config.ledger.close_chunk_size),
        schedule: ScheduleRepository::new(db),
    };

    let schedule = seeder.run().await?;
    println!("{}", serde_json::to_string_pretty(&schedule)?);

    info!(client_id = %seeder.client_id, "Seeding complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());

    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn date(y: i32, m: u32, d: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| AppError::Internal(format!("invalid date {y}-{m}-{d}")))
}

struct Seeder {
    client_id: ClientId,
    periods: PeriodRepository,
    assets: AssetRepository,
    balances: PeriodBalanceRepository,
    movements: MovementRepository,
    depreciation: DepreciationRepository,
    schedule: ScheduleRepository,
}

impl Seeder {
    async fn run(&self) -> AppResult<AssetSchedule> {
        let client_id = self.client_id;

        let fy2024 = self
            .periods
            .create_period(CreatePeriodInput {
                client_id,
                name: "Year ended 31 March 2024".to_string(),
                start_date: date(2023, 4, 1)?,
                end_date: date(2024, 3, 31)?,
                status: PeriodStatus::Open,
                is_current: true,
            })
            .await?;
        let fy2025 = self
            .periods
            .create_period(CreatePeriodInput {
                client_id,
                name: "Year ended 31 March 2025".to_string(),
                start_date: date(2024, 4, 1)?,
                end_date: date(2025, 3, 31)?,
                status: PeriodStatus::Planned,
                is_current: false,
            })
            .await?;

        let plant = self.assets.create_category(client_id, "Plant and machinery").await?;
        let vehicles = self.assets.create_category(client_id, "Motor vehicles").await?;
        let fixtures = self.assets.create_category(client_id, "Fixtures and fittings").await?;

        let lathe = self
            .asset(plant.id, "CNC lathe", dec!(48000), date(2021, 4, 1)?, DepreciationMethod::StraightLine, dec!(10), dec!(9600))
            .await?;
        let van = self
            .asset(vehicles.id, "Delivery van", dec!(26000), date(2022, 9, 15)?, DepreciationMethod::ReducingBalance, dec!(25), dec!(3250))
            .await?;
        let forklift = self
            .asset(vehicles.id, "Forklift", dec!(18500), date(2023, 10, 2)?, DepreciationMethod::ReducingBalance, dec!(25), Decimal::ZERO)
            .await?;
        let shelving = self
            .asset(fixtures.id, "Warehouse shelving", dec!(7200), date(2023, 4, 1)?, DepreciationMethod::StraightLine, dec!(20), Decimal::ZERO)
            .await?;

        let seeded = self.balances.seed_period_balances(client_id, fy2024.id).await?;
        info!(period = %fy2024.name, seeded = seeded.seeded, "Opening balances seeded");

        let mut partial = movement(MovementType::DisposalPartial, date(2024, 1, 31)?);
        partial.disposal_percentage = Some(dec!(25));
        partial.amount_proceeds = dec!(2500);
        partial.note = Some("Sold surplus racking".to_string());
        self.post(fy2024.id, &shelving, partial).await?;

        let mut revaluation = movement(MovementType::Revaluation, date(2024, 3, 31)?);
        revaluation.amount_cost = dec!(2000);
        revaluation.amount_depreciation = dec!(-1500);
        self.post(fy2024.id, &lathe, revaluation).await?;

        self.depreciation.recalculate_depreciation(client_id, fy2024.id).await?;
        let closed = self.depreciation.close_period(client_id, fy2024.id).await?;
        info!(period = %fy2024.name, assets_posted = closed.assets_posted, "Period closed");

        self.periods.open_period(client_id, fy2025.id).await?;
        let seeded = self.balances.seed_period_balances(client_id, fy2025.id).await?;
        info!(period = %fy2025.name, seeded = seeded.seeded, "Balances rolled forward");

        let mut sale = movement(MovementType::DisposalFull, date(2024, 11, 30)?);
        sale.amount_proceeds = dec!(15000);
        sale.note = Some("Van part-exchanged".to_string());
        self.post(fy2025.id, &van, sale).await?;

        let mut adjustment = movement(MovementType::CostAdj, date(2024, 6, 1)?);
        adjustment.amount_cost = dec!(650);
        adjustment.note = Some("Mast upgrade capitalised".to_string());
        self.post(fy2025.id, &forklift, adjustment).await?;

        let updated = self.depreciation.recalculate_depreciation(client_id, fy2025.id).await?;
        info!(period = %fy2025.name, updated = updated.updated, "Depreciation recalculated");

        Ok(self.schedule.get_schedule(client_id, fy2025.id).await?)
    }

    #[allow(clippy::too_many_arguments)]
    async fn asset(
        &self,
        category_id: CategoryId,
        description: &str,
        cost: Decimal,
        acquired: NaiveDate,
        method: DepreciationMethod,
        rate: Decimal,
        depreciation_to_date: Decimal,
    ) -> AppResult<FixedAsset> {
        Ok(self
            .assets
            .create_asset(CreateAssetInput {
                client_id: self.client_id,
                category_id,
                description: description.to_string(),
                original_cost: cost,
                cost_adjustment: Decimal::ZERO,
                acquisition_date: acquired,
                depreciation_method: method,
                depreciation_rate: rate,
                total_depreciation_to_date: depreciation_to_date,
            })
            .await?)
    }

    async fn post(
        &self,
        period_id: assetbook_shared::types::PeriodId,
        asset: &FixedAsset,
        movement: MovementInput,
    ) -> AppResult<()> {
        let posted = self
            .movements
            .post_movement(PostMovementInput {
                client_id: self.client_id,
                period_id,
                asset_id: asset.id,
                movement,
            })
            .await?;
        info!(
            asset = %asset.description,
            movement_type = %posted.movement.movement_type,
            amount_cost = %posted.movement.amount_cost,
            "Movement posted"
        );
        Ok(())
    }
}

fn movement(movement_type: MovementType, posting_date: NaiveDate) -> MovementInput {
    MovementInput {
        movement_type,
        posting_date,
        amount_cost: Decimal::ZERO,
        amount_depreciation: Decimal::ZERO,
        amount_proceeds: Decimal::ZERO,
        disposal_percentage: None,
        note: None,
    }
}
