//! Trade entry workflow: draft, compute, save

use rust_decimal::Decimal;
use thiserror::Error;

use super::state::SessionState;
use crate::config::FormDefaults;
use crate::institution::Category;
use crate::journal::{Emotion, JournalError, Trade, TradeRecord, TradeStore};
use crate::risk::{compute, RiskAssessment, RiskError, RiskInputs};

/// Trade entry errors
#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    Risk(#[from] RiskError),
    /// Save requested before a successful computation
    #[error("position has not been computed")]
    NotComputed,
    #[error("entry is for {entry} but the session is on {session}")]
    CategoryMismatch { entry: String, session: String },
    #[error(transparent)]
    Journal(#[from] JournalError),
}

/// Where an entry is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Inputs only, nothing derived
    Draft,
    /// Position and risk/reward available; `stale` once inputs changed since
    Computed { stale: bool },
}

/// One trade being entered
///
/// Inputs stay editable after computing. The computed values are kept as they
/// were until the next computation. Saving appends the trade and resets the
/// entry to a fresh draft.
#[derive(Debug, Clone)]
pub struct TradeEntry {
    category: String,
    has_symbol: bool,
    symbol: Option<String>,
    pub inputs: RiskInputs,
    pub result: Decimal,
    pub reason: Option<String>,
    pub emotion: Emotion,
    defaults: FormDefaults,
    computed: Option<(RiskInputs, RiskAssessment)>,
}

impl TradeEntry {
    /// New draft for `category` pre-filled from `defaults`
    pub fn new(category: &Category, defaults: &FormDefaults) -> Self {
        Self {
            category: category.name.clone(),
            has_symbol: category.has_symbol,
            symbol: None,
            inputs: inputs_from(defaults),
            result: Decimal::ZERO,
            reason: None,
            emotion: Emotion::default(),
            defaults: defaults.clone(),
            computed: None,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Set the symbol, ignored for categories without symbols
    pub fn set_symbol(&mut self, symbol: Option<String>) {
        if !self.has_symbol {
            if symbol.is_some() {
                tracing::debug!(category = %self.category, "Ignoring symbol for category without symbols");
            }
            self.symbol = None;
            return;
        }
        self.symbol = crate::journal::non_blank(symbol);
    }

    pub fn state(&self) -> EntryState {
        match &self.computed {
            None => EntryState::Draft,
            Some((from, _)) => EntryState::Computed {
                stale: *from != self.inputs,
            },
        }
    }

    /// Last computed values, possibly stale
    pub fn assessment(&self) -> Option<&RiskAssessment> {
        self.computed.as_ref().map(|(_, a)| a)
    }

    /// Size the position from the current inputs
    ///
    /// A refused computation drops any earlier result.
    pub fn compute(&mut self) -> Result<RiskAssessment, RiskError> {
        match compute(&self.inputs) {
            Ok(assessment) => {
                tracing::debug!(
                    category = %self.category,
                    position = %assessment.position,
                    rr = %assessment.rr,
                    "Computed position"
                );
                self.computed = Some((self.inputs, assessment));
                Ok(assessment)
            }
            Err(e) => {
                tracing::warn!(category = %self.category, error = %e, "Computation refused");
                self.computed = None;
                Err(e)
            }
        }
    }

    /// Assemble the journal row from this entry and the session selections
    pub fn build_trade(&self, session: &SessionState) -> Result<Trade, EntryError> {
        if session.category() != self.category {
            return Err(EntryError::CategoryMismatch {
                entry: self.category.clone(),
                session: session.category().to_string(),
            });
        }
        let (_, assessment) = self.computed.as_ref().ok_or(EntryError::NotComputed)?;
        if self.inputs.entry == self.inputs.stop {
            return Err(RiskError::ZeroStopDistance.into());
        }

        let institution_prices = session.selected_prices();
        let institution_stats = crate::institution::aggregate(&institution_prices);

        Ok(Trade {
            product: self.category.clone(),
            symbol: self.symbol.clone(),
            account: self.inputs.account,
            risk_percent: self.inputs.risk_percent,
            entry: self.inputs.entry,
            stop: self.inputs.stop,
            target: self.inputs.target,
            position: assessment.position,
            rr: assessment.rr,
            result: self.result,
            reason: crate::journal::non_blank(self.reason.clone()),
            emotion: self.emotion,
            institution_prices,
            institution_stats,
        })
    }

    /// Append the trade, then reset this entry and the session selections
    ///
    /// On error nothing is written and both are left untouched.
    pub fn save(
        &mut self,
        store: &TradeStore,
        session: &mut SessionState,
    ) -> Result<TradeRecord, EntryError> {
        let trade = self.build_trade(session)?;
        let record = store.save(&trade)?;
        self.reset();
        session.clear();
        Ok(record)
    }

    /// Back to a fresh draft for the same category
    pub fn reset(&mut self) {
        self.symbol = None;
        self.inputs = inputs_from(&self.defaults);
        self.result = Decimal::ZERO;
        self.reason = None;
        self.emotion = Emotion::default();
        self.computed = None;
    }
}

fn inputs_from(defaults: &FormDefaults) -> RiskInputs {
    RiskInputs {
        account: defaults.account,
        risk_percent: defaults.risk_percent,
        entry: defaults.entry,
        stop: defaults.stop,
        target: defaults.target,
    }
}
