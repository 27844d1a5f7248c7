//! Asset movement validation and resolution.
//!
//! Resolution turns caller input into the final amounts that are applied to
//! the ledger row and written to the audit trail. Zero disposal amounts are
//! derived from the row, so the audit row never carries the caller's raw
//! zero.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use assetbook_shared::types::{PENNY, round_money};

use super::balance::PeriodBalance;
use super::error::AssetLedgerError;

/// Kind of movement posted against a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Cost adjustment.
    CostAdj,
    /// Accumulated depreciation adjustment.
    DepreciationAdj,
    /// Revaluation of both cost and accumulated depreciation.
    Revaluation,
    /// Disposal of the whole remaining cost.
    DisposalFull,
    /// Disposal of part of the remaining cost.
    DisposalPartial,
}

impl MovementType {
    /// Returns the stored name of the movement type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CostAdj => "cost_adj",
            Self::DepreciationAdj => "depreciation_adj",
            Self::Revaluation => "revaluation",
            Self::DisposalFull => "disposal_full",
            Self::DisposalPartial => "disposal_partial",
        }
    }

    /// Returns true for full and partial disposals.
    #[must_use]
    pub const fn is_disposal(self) -> bool {
        matches!(self, Self::DisposalFull | Self::DisposalPartial)
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = AssetLedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cost_adj" => Ok(Self::CostAdj),
            "depreciation_adj" => Ok(Self::DepreciationAdj),
            "revaluation" => Ok(Self::Revaluation),
            "disposal_full" => Ok(Self::DisposalFull),
            "disposal_partial" => Ok(Self::DisposalPartial),
            other => Err(AssetLedgerError::UnsupportedMovementType(other.to_string())),
        }
    }
}

/// Movement as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    /// Kind of movement.
    pub movement_type: MovementType,
    /// Date the movement is posted on; must fall inside the period.
    pub posting_date: NaiveDate,
    /// Cost amount; zero on a disposal means "derive it".
    pub amount_cost: Decimal,
    /// Depreciation amount; zero on a disposal means "derive it".
    pub amount_depreciation: Decimal,
    /// Disposal proceeds.
    pub amount_proceeds: Decimal,
    /// Share of the available cost disposed of, in percent.
    pub disposal_percentage: Option<Decimal>,
    /// Free-text note for the audit trail.
    pub note: Option<String>,
}

/// Movement with its final amounts, ready to apply and audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMovement {
    /// Kind of movement.
    pub movement_type: MovementType,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Final cost amount.
    pub amount_cost: Decimal,
    /// Final depreciation amount.
    pub amount_depreciation: Decimal,
    /// Final proceeds.
    pub amount_proceeds: Decimal,
    /// Percentage used for the disposal, if any.
    pub disposal_percentage: Option<Decimal>,
    /// Note carried through from the input.
    pub note: Option<String>,
}

/// Movement posting rules. No database dependencies.
pub struct MovementService;

impl MovementService {
    /// Validates `input` against `row` and returns the final amounts.
    ///
    /// # Errors
    ///
    /// - `AssetFullyDisposed` if no more than 1p of cost is left on the row
    /// - `NegativeAmount` for a negative disposal amount
    /// - `InvalidDisposalPercentage` if a partial disposal has neither a cost
    ///   nor a percentage, or the percentage is outside (0, 100]
    /// - `DisposalExceedsAvailableCost` if the disposal cost is more than 1p
    ///   above the available cost
    pub fn resolve(
        row: &PeriodBalance,
        input: &MovementInput,
    ) -> Result<ResolvedMovement, AssetLedgerError> {
        let available = row.available_cost();
        if available <= PENNY {
            return Err(AssetLedgerError::AssetFullyDisposed(row.asset_id));
        }

        let zero = Decimal::ZERO;
        let (amount_cost, amount_depreciation, amount_proceeds, disposal_percentage) =
            match input.movement_type {
                MovementType::CostAdj => (input.amount_cost, zero, zero, None),
                MovementType::DepreciationAdj => (zero, input.amount_depreciation, zero, None),
                MovementType::Revaluation => {
                    (input.amount_cost, input.amount_depreciation, zero, None)
                }
                MovementType::DisposalFull | MovementType::DisposalPartial => {
                    let disposal = Self::resolve_disposal(row, input, available)?;
                    (
                        disposal.cost,
                        disposal.depreciation,
                        input.amount_proceeds,
                        disposal.percentage,
                    )
                }
            };

        Ok(ResolvedMovement {
            movement_type: input.movement_type,
            posting_date: input.posting_date,
            amount_cost: round_money(amount_cost),
            amount_depreciation: round_money(amount_depreciation),
            amount_proceeds: round_money(amount_proceeds),
            disposal_percentage,
            note: input.note.clone(),
        })
    }

    /// Applies resolved amounts to the row.
    pub fn apply(row: &mut PeriodBalance, movement: &ResolvedMovement) {
        match movement.movement_type {
            MovementType::CostAdj => row.cost_adjustment += movement.amount_cost,
            MovementType::DepreciationAdj => {
                row.depreciation_adjustment += movement.amount_depreciation;
            }
            MovementType::Revaluation => {
                row.cost_adjustment += movement.amount_cost;
                row.depreciation_adjustment += movement.amount_depreciation;
            }
            MovementType::DisposalFull | MovementType::DisposalPartial => {
                row.disposals_cost += movement.amount_cost;
                row.depreciation_on_disposals += movement.amount_depreciation;
                row.disposal_proceeds += movement.amount_proceeds;
            }
        }
    }

    /// Resolves `input` and returns the updated row with the movement.
    ///
    /// `row` itself is left untouched, so a rejected movement never leaves a
    /// half-applied row behind.
    ///
    /// # Errors
    ///
    /// See [`MovementService::resolve`]. Also returns `NegativeAmount` if the
    /// updated row would carry a negative non-adjustment value.
    pub fn post(
        row: &PeriodBalance,
        input: &MovementInput,
    ) -> Result<(PeriodBalance, ResolvedMovement), AssetLedgerError> {
        let movement = Self::resolve(row, input)?;
        let mut updated = row.clone();
        Self::apply(&mut updated, &movement);
        updated.validate()?;
        Ok((updated, movement))
    }

    fn resolve_disposal(
        row: &PeriodBalance,
        input: &MovementInput,
        available: Decimal,
    ) -> Result<DisposalAmounts, AssetLedgerError> {
        for amount in [
            input.amount_cost,
            input.amount_depreciation,
            input.amount_proceeds,
        ] {
            if amount < Decimal::ZERO {
                return Err(AssetLedgerError::NegativeAmount(amount));
            }
        }

        let percentage = match input.movement_type {
            MovementType::DisposalFull => Some(Decimal::ONE_HUNDRED),
            _ => match input.disposal_percentage {
                Some(pct) if pct > Decimal::ZERO && pct <= Decimal::ONE_HUNDRED => Some(pct),
                Some(pct) => return Err(AssetLedgerError::InvalidDisposalPercentage(Some(pct))),
                None if input.amount_cost.is_zero() => {
                    return Err(AssetLedgerError::InvalidDisposalPercentage(None));
                }
                None => None,
            },
        };

        let cost = match percentage {
            Some(pct) if input.amount_cost.is_zero() => {
                round_money(available * pct / Decimal::ONE_HUNDRED)
            }
            _ => input.amount_cost,
        };

        if cost > available + PENNY {
            return Err(AssetLedgerError::DisposalExceedsAvailableCost {
                requested: cost,
                available,
            });
        }

        let depreciation = if input.amount_depreciation.is_zero() {
            let fraction = percentage
                .map_or(cost / available, |pct| pct / Decimal::ONE_HUNDRED)
                .min(Decimal::ONE);
            round_money(row.depreciation_base_for_disposal() * fraction)
        } else {
            input.amount_depreciation
        };

        Ok(DisposalAmounts {
            cost,
            depreciation,
            percentage,
        })
    }
}

struct DisposalAmounts {
    cost: Decimal,
    depreciation: Decimal,
    percentage: Option<Decimal>,
}
