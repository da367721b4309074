use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use tokio::time::timeout;

use super::rebalance_errors::RebalanceError;
use super::rebalance_model::{
    AnalysisResult, EngineState, MonthRebalanceResult, RebalanceOutcome, Recommendation,
    SymbolFailure,
};
use super::rebalance_traits::{AnalyzerTrait, RebalanceEngineTrait};
use crate::cache::TtlCache;
use crate::constants::{
    AMOUNT_DECIMAL_PRECISION, EXTERNAL_CALL_TIMEOUT_SECS, QUANTITY_DECIMAL_PRECISION,
};
use crate::ledger::{LedgerEntry, LedgerServiceTrait, NewLedgerEntry, TradingMode};
use crate::orders::{OrderExecutorTrait, OrderRequest};
use crate::positions::is_quantity_significant;
use crate::pricing::{PriceResolverTrait, PriceSource};
use crate::settings::SettingsServiceTrait;
use crate::snapshots::{SnapshotKind, SnapshotServiceTrait};
use crate::utils::time_utils::{missed_target_months, same_calendar_month, TargetMonth};
use crate::Result;

/// Analyzer verdicts are reused across the months of one pass and across
/// passes within this window.
const ANALYSIS_CACHE_TTL_SECS: u64 = 6 * 60 * 60;

const STATE_IDLE: u8 = 0;
const STATE_CHECKING_IDEMPOTENCY: u8 = 1;
const STATE_CATCHING_UP: u8 = 2;

/// The catch-up scheduler. Determines which months still need a rebalance,
/// selects candidates through the analyzer, allocates the monthly investment
/// equally, and drives the order executor with month-appropriate prices.
///
/// Orchestration only: cash truth stays in the ledger, cost basis in the
/// position tracker. The engine's sole persistent artifact is the
/// monthly-rebalance snapshot committed after each month.
pub struct RebalanceEngine {
    settings: Arc<dyn SettingsServiceTrait>,
    analyzer: Arc<dyn AnalyzerTrait>,
    resolver: Arc<dyn PriceResolverTrait>,
    executor: Arc<dyn OrderExecutorTrait>,
    ledger: Arc<dyn LedgerServiceTrait>,
    snapshots: Arc<dyn SnapshotServiceTrait>,
    analysis_cache: TtlCache<String, AnalysisResult>,
    state: AtomicU8,
    cancel_requested: AtomicBool,
}

impl RebalanceEngine {
    pub fn new(
        settings: Arc<dyn SettingsServiceTrait>,
        analyzer: Arc<dyn AnalyzerTrait>,
        resolver: Arc<dyn PriceResolverTrait>,
        executor: Arc<dyn OrderExecutorTrait>,
        ledger: Arc<dyn LedgerServiceTrait>,
        snapshots: Arc<dyn SnapshotServiceTrait>,
    ) -> Self {
        Self {
            settings,
            analyzer,
            resolver,
            executor,
            ledger,
            snapshots,
            analysis_cache: TtlCache::new(),
            state: AtomicU8::new(STATE_IDLE),
            cancel_requested: AtomicBool::new(false),
        }
    }

    /// Single-flight guard: only the caller that wins the swap from idle may
    /// run a pass.
    fn begin(&self) -> Result<()> {
        self.state
            .compare_exchange(
                STATE_IDLE,
                STATE_CHECKING_IDEMPOTENCY,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map_err(|_| RebalanceError::AlreadyInProgress)?;
        Ok(())
    }

    /// Calendar date of the last committed monthly rebalance, from the
    /// snapshot store's idempotency marker.
    fn last_rebalance_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self
            .snapshots
            .latest(Some(SnapshotKind::MonthlyRebalance))?
            .map(|snapshot| snapshot.timestamp.date_naive()))
    }

    fn monthly_investment(&self) -> Result<Decimal> {
        self.settings
            .monthly_investment()?
            .ok_or_else(|| RebalanceError::MonthlyInvestmentNotConfigured.into())
    }

    async fn run_pass(&self, today: NaiveDate) -> RebalanceOutcome {
        let started_at = Utc::now();
        self.cancel_requested.store(false, Ordering::SeqCst);

        let last_rebalance = match self.last_rebalance_date() {
            Ok(last) => last,
            Err(e) => {
                error!("Cannot read the last rebalance marker: {}", e);
                return RebalanceOutcome::failed(started_at, Vec::new(), e.to_string());
            }
        };

        if let Some(last) = last_rebalance {
            if same_calendar_month(last, today) {
                debug!(
                    "Rebalance for {} already committed on {}; skipping",
                    today.format("%Y-%m"),
                    last
                );
                return RebalanceOutcome::skipped(started_at);
            }
        }

        self.state.store(STATE_CATCHING_UP, Ordering::SeqCst);

        let monthly_investment = match self.monthly_investment() {
            Ok(amount) => amount,
            Err(e) => {
                error!("Cannot start catch-up: {}", e);
                return RebalanceOutcome::failed(started_at, Vec::new(), e.to_string());
            }
        };

        let months = missed_target_months(last_rebalance, today);
        info!(
            "Catching up {} missed month(s) with {} per month",
            months.len(),
            monthly_investment
        );

        let mut results: Vec<MonthRebalanceResult> = Vec::new();
        for target_month in months {
            if self.cancel_requested.load(Ordering::SeqCst) {
                warn!(
                    "Rebalance cancelled after {} committed month(s)",
                    results.len()
                );
                return RebalanceOutcome::failed(
                    started_at,
                    results,
                    RebalanceError::Cancelled.to_string(),
                );
            }

            match self.rebalance_month(target_month, monthly_investment).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    // Systemic failure: committed months stand, the rest of
                    // the catch-up waits for the next pass.
                    error!("Aborting catch-up at {}: {}", target_month, e);
                    return RebalanceOutcome::failed(started_at, results, e.to_string());
                }
            }
        }

        RebalanceOutcome::completed(started_at, results)
    }

    /// Processes one target month end to end and commits its snapshot.
    /// Per-symbol failures are recorded in the result; only systemic
    /// failures (analyzer down, settings or store unreadable) err.
    async fn rebalance_month(
        &self,
        target_month: TargetMonth,
        monthly_investment: Decimal,
    ) -> Result<MonthRebalanceResult> {
        let month_start = target_month.start_instant();
        info!("Rebalancing {}", target_month);

        let candidates = self.select_candidates().await?;
        let mut result = MonthRebalanceResult::new(target_month, candidates.clone());

        if candidates.is_empty() {
            info!(
                "No BUY candidates for {}; committing an empty month",
                target_month
            );
        } else {
            let per_symbol_amount = (monthly_investment / Decimal::from(candidates.len() as u64))
                .round_dp(AMOUNT_DECIMAL_PRECISION);
            let mode = self.settings.trading_mode()?;
            debug!(
                "{}: {} candidate(s), {} each, mode {}",
                target_month,
                candidates.len(),
                per_symbol_amount,
                mode
            );

            for symbol in &candidates {
                match self
                    .buy_candidate(symbol, per_symbol_amount, target_month, mode)
                    .await
                {
                    Ok(entry) => {
                        result.purchased_count += 1;
                        result.total_invested += entry.total_amount;
                    }
                    Err(e) => {
                        warn!("Skipping {} for {}: {}", symbol, target_month, e);
                        result.symbol_errors.push(SymbolFailure {
                            symbol: symbol.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        let mut marker =
            NewLedgerEntry::rebalance_marker(Some(format!("Monthly rebalance {}", target_month)));
        marker.timestamp = Some(month_start);
        self.ledger.append(marker).await?;

        self.snapshots
            .build_and_commit(
                SnapshotKind::MonthlyRebalance,
                target_month.first_day(),
                month_start,
            )
            .await?;

        info!(
            "Committed {}: {} purchase(s), {} invested, {} symbol error(s)",
            target_month,
            result.purchased_count,
            result.total_invested,
            result.symbol_errors.len()
        );
        Ok(result)
    }

    /// Watchlist symbols with a BUY verdict, best score first, truncated to
    /// the target position count. Errs only when the analyzer failed for the
    /// entire watchlist.
    async fn select_candidates(&self) -> Result<Vec<String>> {
        let watchlist = self.settings.watchlist()?;
        let target_count = self.settings.target_position_count()?;

        let mut scored: Vec<(String, f64)> = Vec::new();
        let mut failures = 0usize;

        for symbol in &watchlist {
            match self.analyze_cached(symbol).await {
                Ok(analysis) => {
                    if analysis.recommendation == Recommendation::Buy {
                        scored.push((symbol.clone(), analysis.score));
                    } else {
                        debug!(
                            "{} is {} this cycle; not a candidate",
                            symbol, analysis.recommendation
                        );
                    }
                }
                Err(e) => {
                    warn!("Analyzer gave no verdict for {}: {}", symbol, e);
                    failures += 1;
                }
            }
        }

        if !watchlist.is_empty() && failures == watchlist.len() {
            return Err(RebalanceError::AnalyzerUnavailable(format!(
                "analysis failed for all {} watchlist symbols",
                failures
            ))
            .into());
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(target_count);
        Ok(scored.into_iter().map(|(symbol, _)| symbol).collect())
    }

    async fn analyze_cached(&self, symbol: &str) -> Result<AnalysisResult> {
        let ttl = Duration::from_secs(ANALYSIS_CACHE_TTL_SECS);
        self.analysis_cache
            .get_or_refresh(symbol.to_string(), ttl, || async {
                let deadline = Duration::from_secs(EXTERNAL_CALL_TIMEOUT_SECS);
                match timeout(deadline, self.analyzer.analyze(symbol)).await {
                    Ok(result) => result,
                    Err(_) => Err(RebalanceError::AnalyzerUnavailable(format!(
                        "analysis of {} timed out",
                        symbol
                    ))
                    .into()),
                }
            })
            .await
    }

    /// Buys one candidate at its month-appropriate price. The share count is
    /// floored so the allocation is never overspent.
    async fn buy_candidate(
        &self,
        symbol: &str,
        amount: Decimal,
        target_month: TargetMonth,
        mode: TradingMode,
    ) -> Result<LedgerEntry> {
        let resolved = self
            .resolver
            .resolve_price(symbol, target_month.first_day())
            .await?;
        if let PriceSource::StaleClose { as_of } = resolved.source {
            warn!(
                "Pricing {} for {} from a stale close dated {}",
                symbol, target_month, as_of
            );
        }

        let shares = (amount / resolved.price)
            .round_dp_with_strategy(QUANTITY_DECIMAL_PRECISION, RoundingStrategy::ToZero);
        if !is_quantity_significant(&shares) {
            return Err(RebalanceError::AllocationTooSmall {
                symbol: symbol.to_string(),
                amount,
                price: resolved.price,
            }
            .into());
        }

        let order = OrderRequest::buy(symbol, shares, mode)
            .with_price(resolved.price)
            .with_notes(&format!("Monthly rebalance {}", target_month))
            .with_executed_at(target_month.start_instant());
        self.executor.execute(order).await
    }
}

#[async_trait]
impl RebalanceEngineTrait for RebalanceEngine {
    async fn run_as_of(&self, today: NaiveDate) -> Result<RebalanceOutcome> {
        self.begin()?;
        let outcome = self.run_pass(today).await;
        self.state.store(STATE_IDLE, Ordering::SeqCst);

        info!(
            "Rebalance pass finished: {} ({} month(s), {} symbol error(s))",
            outcome.status,
            outcome.months_caught,
            outcome.symbol_error_count()
        );
        Ok(outcome)
    }

    fn current_state(&self) -> EngineState {
        match self.state.load(Ordering::SeqCst) {
            STATE_CHECKING_IDEMPOTENCY => EngineState::CheckingIdempotency,
            STATE_CATCHING_UP => EngineState::CatchingUp,
            _ => EngineState::Idle,
        }
    }

    fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
    }
}
