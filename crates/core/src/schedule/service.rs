//! Schedule aggregation service.

use std::collections::{BTreeMap, HashMap};

use assetbook_shared::types::{AssetId, CategoryId};

use super::types::{AssetSchedule, AssetScheduleRow, CategoryTotals, ScheduleFigures};
use crate::asset::{AssetCategory, FixedAsset};
use crate::depreciation::DepreciationCharge;
use crate::ledger::PeriodBalance;
use crate::period::AccountingPeriod;

const UNCATEGORISED: &str = "Uncategorised";

/// Service for building roll-forward schedules.
pub struct ScheduleService;

impl ScheduleService {
    /// Builds the schedule of `period` from its ledger rows.
    ///
    /// Only assets with a ledger row appear. Category totals are straight
    /// field-wise sums of the asset rows and are ordered by category name;
    /// rows are ordered by category name, then description.
    #[must_use]
    pub fn build(
        period: &AccountingPeriod,
        categories: &[AssetCategory],
        assets: &[FixedAsset],
        balances: &[PeriodBalance],
        entries: &[DepreciationCharge],
        movement_counts: &HashMap<AssetId, u64>,
    ) -> AssetSchedule {
        let category_names: HashMap<CategoryId, &str> = categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();
        let assets_by_id: HashMap<AssetId, &FixedAsset> =
            assets.iter().map(|a| (a.id, a)).collect();
        let entries_by_asset: HashMap<AssetId, &DepreciationCharge> =
            entries.iter().map(|e| (e.asset_id, e)).collect();

        let mut rows: Vec<AssetScheduleRow> = balances
            .iter()
            .filter(|b| b.period_id == period.id)
            .filter_map(|balance| {
                let asset = assets_by_id.get(&balance.asset_id)?;
                Some(AssetScheduleRow {
                    asset_id: asset.id,
                    description: asset.description.clone(),
                    category_id: asset.category_id,
                    category_name: category_names
                        .get(&asset.category_id)
                        .copied()
                        .unwrap_or(UNCATEGORISED)
                        .to_string(),
                    depreciation_method: asset.depreciation_method,
                    depreciation_rate: asset.depreciation_rate,
                    figures: ScheduleFigures::from_balance(balance),
                    depreciation_entry: entries_by_asset.get(&asset.id).map(|e| (*e).clone()),
                    movement_count: movement_counts.get(&asset.id).copied().unwrap_or(0),
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            a.category_name
                .cmp(&b.category_name)
                .then_with(|| a.description.cmp(&b.description))
        });

        let category_totals = Self::category_totals(&rows);
        let mut grand_totals = ScheduleFigures::default();
        for category in &category_totals {
            grand_totals.accumulate(&category.totals);
        }

        AssetSchedule {
            client_id: period.client_id,
            period_id: period.id,
            period_name: period.name.clone(),
            rows,
            category_totals,
            grand_totals,
        }
    }

    /// Sums rows per category, ordered by category name.
    #[must_use]
    pub fn category_totals(rows: &[AssetScheduleRow]) -> Vec<CategoryTotals> {
        let mut grouped: BTreeMap<(&str, CategoryId), CategoryTotals> = BTreeMap::new();

        for row in rows {
            let entry = grouped
                .entry((row.category_name.as_str(), row.category_id))
                .or_insert_with(|| CategoryTotals {
                    category_id: row.category_id,
                    category_name: row.category_name.clone(),
                    asset_count: 0,
                    totals: ScheduleFigures::default(),
                });
            entry.asset_count += 1;
            entry.totals.accumulate(&row.figures);
        }

        grouped.into_values().collect()
    }
}
