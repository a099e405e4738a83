//! Journal statistics and reporting

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::journal::TradeRecord;

/// Summary errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

/// Summary statistics over a set of journal records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalSummary {
    /// Category covered, `None` for the whole journal
    pub product: Option<String>,
    /// Total number of trades
    pub total_trades: usize,
    /// Trades with a positive result
    pub wins: usize,
    /// Trades with a negative result
    pub losses: usize,
    /// Trades with a zero result
    pub breakeven: usize,
    /// Sum of results
    pub net_result: Decimal,
    /// Largest single gain
    pub best: Decimal,
    /// Largest single loss
    pub worst: Decimal,
    /// Wins over decided trades (wins + losses)
    pub win_rate: Decimal,
    /// Mean planned risk/reward
    pub avg_rr: Decimal,
    /// Trades that had institution prices attached
    pub with_institution_prices: usize,
}

impl JournalSummary {
    /// Summarize records, typically the output of `TradeStore::query`
    pub fn from_records(product: Option<&str>, records: &[TradeRecord]) -> Result<Self, SummaryError> {
        let mut summary = Self {
            product: product.map(str::to_string),
            total_trades: records.len(),
            ..Default::default()
        };
        if records.is_empty() {
            return Ok(summary);
        }

        let mut rr_sum = dec!(0);
        summary.best = records[0].trade.result;
        summary.worst = records[0].trade.result;
        for record in records {
            let trade = &record.trade;
            match trade.result.cmp(&Decimal::ZERO) {
                std::cmp::Ordering::Greater => summary.wins += 1,
                std::cmp::Ordering::Less => summary.losses += 1,
                std::cmp::Ordering::Equal => summary.breakeven += 1,
            }
            summary.net_result = summary
                .net_result
                .checked_add(trade.result)
                .ok_or(SummaryError::Overflow("net result"))?;
            summary.best = summary.best.max(trade.result);
            summary.worst = summary.worst.min(trade.result);
            rr_sum = rr_sum
                .checked_add(trade.rr)
                .ok_or(SummaryError::Overflow("average risk/reward"))?;
            if trade.institution_stats.is_some() {
                summary.with_institution_prices += 1;
            }
        }

        let decided = summary.wins + summary.losses;
        if decided > 0 {
            summary.win_rate = Decimal::from(summary.wins) / Decimal::from(decided);
        }
        summary.avg_rr = rr_sum / Decimal::from(records.len());
        Ok(summary)
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
               JOURNAL SUMMARY ({})
══════════════════════════════════════════════════════

RESULTS
───────────────────────────────────────────────────────
Net Result:       {:+.2}
Best Trade:       {:+.2}
Worst Trade:      {:+.2}
Win Rate:         {:.1}%
Avg R/R:          {:.2}

ACTIVITY
───────────────────────────────────────────────────────
Total Trades:     {}
Wins / Losses:    {} / {}
Breakeven:        {}
With Inst. Price: {}
══════════════════════════════════════════════════════
"#,
            self.product.as_deref().unwrap_or("all categories"),
            self.net_result,
            self.best,
            self.worst,
            self.win_rate * dec!(100),
            self.avg_rr,
            self.total_trades,
            self.wins,
            self.losses,
            self.breakeven,
            self.with_institution_prices,
        )
    }
}
