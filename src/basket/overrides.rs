//! Coefficient Override Operations
//!
//! Bulk overrides of the sell coefficients. Before an item's coefficient is
//! first overwritten its current value is recorded in the base map of that
//! axis; later applies never overwrite a recorded base, so a revert always
//! returns to the values from before the first override.

use std::collections::BTreeMap;

use log::debug;

use crate::domain::{check_amount, DomainResult, ItemKey};

use super::history::HistoryOperations;
use super::store::{BasketStore, LedgerState};

/// Pricing axis a coefficient belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientAxis {
    Material,
    Work,
}

const BOTH: [CoefficientAxis; 2] = [CoefficientAxis::Material, CoefficientAxis::Work];

impl CoefficientAxis {
    fn base_map(self, state: &LedgerState) -> &BTreeMap<ItemKey, f64> {
        match self {
            CoefficientAxis::Material => &state.base_material,
            CoefficientAxis::Work => &state.base_work,
        }
    }
}

/// Trait for bulk coefficient operations
pub trait CoefficientOverrideOperations {
    /// Set both coefficients of every item to `factor`
    fn apply_global_coefficient(&mut self, factor: f64) -> DomainResult<()>;

    /// Set the material coefficient of every item to `factor`
    fn apply_material_coefficient(&mut self, factor: f64) -> DomainResult<()>;

    /// Set the labor coefficient of every item to `factor`
    fn apply_work_coefficient(&mut self, factor: f64) -> DomainResult<()>;

    /// Restore both axes from their base maps and clear them.
    /// `false` when nothing was overridden.
    fn revert_coefficient(&mut self) -> bool;

    fn revert_material_coefficient(&mut self) -> bool;

    fn revert_work_coefficient(&mut self) -> bool;

    /// Any base value still recorded on either axis
    fn has_overrides(&self) -> bool;
}

impl BasketStore {
    fn apply_axes(&mut self, axes: &[CoefficientAxis], factor: f64) -> DomainResult<()> {
        check_amount("coefficient", factor)?;
        if self.is_empty() {
            return Ok(());
        }

        self.snapshot();
        let LedgerState {
            sections,
            base_material,
            base_work,
        } = &mut self.state;

        for section in sections.iter_mut() {
            for line in section.lines.iter_mut() {
                let key = ItemKey::new(section.name.as_str(), line.produkt.as_str());
                for axis in axes {
                    match axis {
                        CoefficientAxis::Material => {
                            base_material
                                .entry(key.clone())
                                .or_insert(line.item.koeficient_material);
                            line.item.koeficient_material = factor;
                        }
                        CoefficientAxis::Work => {
                            base_work.entry(key.clone()).or_insert(line.item.koeficient_prace);
                            line.item.koeficient_prace = factor;
                        }
                    }
                }
            }
        }

        debug!("apply coefficient {} on {:?}", factor, axes);
        Ok(())
    }

    fn revert_axes(&mut self, axes: &[CoefficientAxis]) -> bool {
        if axes.iter().all(|axis| axis.base_map(&self.state).is_empty()) {
            return false;
        }

        self.snapshot();
        for axis in axes {
            let base = match axis {
                CoefficientAxis::Material => std::mem::take(&mut self.state.base_material),
                CoefficientAxis::Work => std::mem::take(&mut self.state.base_work),
            };
            for (key, value) in base {
                // Lines removed since the override have nothing to restore
                if let Some(item) = self.state.item_mut(&key) {
                    match axis {
                        CoefficientAxis::Material => item.koeficient_material = value,
                        CoefficientAxis::Work => item.koeficient_prace = value,
                    }
                }
            }
        }

        debug!("revert coefficient on {:?}", axes);
        true
    }

    /// Material coefficients recorded before the first override
    pub fn base_material(&self) -> &BTreeMap<ItemKey, f64> {
        &self.state.base_material
    }

    /// Labor coefficients recorded before the first override
    pub fn base_work(&self) -> &BTreeMap<ItemKey, f64> {
        &self.state.base_work
    }
}

impl CoefficientOverrideOperations for BasketStore {
    fn apply_global_coefficient(&mut self, factor: f64) -> DomainResult<()> {
        self.apply_axes(&BOTH, factor)
    }

    fn apply_material_coefficient(&mut self, factor: f64) -> DomainResult<()> {
        self.apply_axes(&[CoefficientAxis::Material], factor)
    }

    fn apply_work_coefficient(&mut self, factor: f64) -> DomainResult<()> {
        self.apply_axes(&[CoefficientAxis::Work], factor)
    }

    fn revert_coefficient(&mut self) -> bool {
        self.revert_axes(&BOTH)
    }

    fn revert_material_coefficient(&mut self) -> bool {
        self.revert_axes(&[CoefficientAxis::Material])
    }

    fn revert_work_coefficient(&mut self) -> bool {
        self.revert_axes(&[CoefficientAxis::Work])
    }

    fn has_overrides(&self) -> bool {
        BOTH.iter().any(|axis| !axis.base_map(&self.state).is_empty())
    }
}
