//! Per-session institution selections

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::institution::{aggregate, Category, InstitutionPrices, InstitutionStats, PoolError};

/// "Use" flag and entered price for one institution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstitutionInput {
    pub selected: bool,
    pub price: Decimal,
}

/// Selection state for the active category
///
/// Holds one input per institution of the active category, in pool order.
/// Switching category discards every selection and entered price.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    category: String,
    inputs: IndexMap<String, InstitutionInput>,
}

impl SessionState {
    /// Start a session on `category` with nothing selected
    pub fn new(category: &Category) -> Self {
        let mut state = Self {
            category: String::new(),
            inputs: IndexMap::new(),
        };
        state.reset_for(category);
        state
    }

    /// Active category name
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Make `category` active and clear all selections
    pub fn reset_for(&mut self, category: &Category) {
        self.category = category.name.clone();
        self.inputs = category
            .institutions
            .iter()
            .map(|name| (name.clone(), InstitutionInput::default()))
            .collect();
        tracing::debug!(category = %self.category, "Session selections reset");
    }

    /// Change the active category, resetting only when it differs
    ///
    /// Returns true when a reset happened.
    pub fn switch_category(&mut self, category: &Category) -> bool {
        if self.category == category.name {
            return false;
        }
        self.reset_for(category);
        true
    }

    /// Clear selections, keeping the active category
    pub fn clear(&mut self) {
        for input in self.inputs.values_mut() {
            *input = InstitutionInput::default();
        }
    }

    fn input_mut(&mut self, institution: &str) -> Result<&mut InstitutionInput, PoolError> {
        let category = &self.category;
        self.inputs
            .get_mut(institution)
            .ok_or_else(|| PoolError::UnknownInstitution {
                category: category.clone(),
                institution: institution.to_string(),
            })
    }

    /// Tick or untick an institution
    pub fn set_selected(&mut self, institution: &str, selected: bool) -> Result<(), PoolError> {
        self.input_mut(institution)?.selected = selected;
        Ok(())
    }

    /// Enter an institution's expected price
    pub fn set_price(&mut self, institution: &str, price: Decimal) -> Result<(), PoolError> {
        self.input_mut(institution)?.price = price;
        Ok(())
    }

    /// Tick an institution and enter its price
    pub fn select(&mut self, institution: &str, price: Decimal) -> Result<(), PoolError> {
        let input = self.input_mut(institution)?;
        input.selected = true;
        input.price = price;
        Ok(())
    }

    pub fn input(&self, institution: &str) -> Option<&InstitutionInput> {
        self.inputs.get(institution)
    }

    /// Inputs in pool order
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &InstitutionInput)> {
        self.inputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of ticked institutions, priced or not
    pub fn selected_count(&self) -> usize {
        self.inputs.values().filter(|i| i.selected).count()
    }

    /// Prices that count towards the statistics: ticked and above zero
    pub fn selected_prices(&self) -> InstitutionPrices {
        self.inputs
            .iter()
            .filter(|(_, input)| input.selected && input.price > Decimal::ZERO)
            .map(|(name, input)| (name.clone(), input.price))
            .collect()
    }

    /// Statistics over [`selected_prices`](Self::selected_prices)
    pub fn stats(&self) -> Option<InstitutionStats> {
        aggregate(&self.selected_prices())
    }
}
