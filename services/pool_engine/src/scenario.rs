//! Scenario format and runner

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use torq_amm::{
    AddLiquidity, Clock, EventReceiver, InMemoryLedger, LiquidityAdded, LiquidityRemoved,
    ManualClock, PoolEngine, PoolEvent, RemoveLiquidity, Swap, SwapExecuted,
};
use torq_config::EngineConfig;
use torq_types::{AssetId, HolderId};
use tracing::{debug, info, warn};

/// Opening ledger balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    pub holder: HolderId,
    pub asset: AssetId,
    pub amount: u128,
}

/// One scripted action against the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    AddLiquidity { caller: HolderId, request: AddLiquidity },
    RemoveLiquidity { caller: HolderId, request: RemoveLiquidity },
    Swap { caller: HolderId, request: Swap },
    AdvanceTime { seconds: u64 },
    Reserves { asset_a: AssetId, asset_b: AssetId },
    Price { asset_a: AssetId, asset_b: AssetId },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::AddLiquidity { .. } => "add_liquidity",
            Step::RemoveLiquidity { .. } => "remove_liquidity",
            Step::Swap { .. } => "swap",
            Step::AdvanceTime { .. } => "advance_time",
            Step::Reserves { .. } => "reserves",
            Step::Price { .. } => "price",
        }
    }
}

/// Replayable script: opening state plus ordered steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Clock value at the first step, UNIX seconds
    pub start_time: u64,
    #[serde(default)]
    pub balances: Vec<Funding>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse scenario JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json_str(&raw)
    }
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Added(LiquidityAdded),
    Removed(LiquidityRemoved),
    Swapped(SwapExecuted),
    Clock { now: u64 },
    Reserves { reserve_a: u128, reserve_b: u128 },
    Price { price: u128 },
    Error { message: String },
}

impl StepOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, StepOutcome::Error { .. })
    }
}

/// One output line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepReport {
    Step {
        index: usize,
        op: &'static str,
        outcome: StepOutcome,
    },
    Event(PoolEvent),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    pub failed: usize,
    pub events: usize,
}

type ReplayEngine = PoolEngine<Arc<InMemoryLedger>, Arc<ManualClock>>;

/// Drives an engine through a scenario
pub struct ScenarioRunner {
    engine: ReplayEngine,
    clock: Arc<ManualClock>,
    events: EventReceiver,
}

impl ScenarioRunner {
    /// Build a fresh engine, ledger and clock for `scenario`
    pub fn new(config: &EngineConfig, scenario: &Scenario) -> Result<Self> {
        let ledger = Arc::new(InMemoryLedger::new(config.engine.vault));
        for funding in &scenario.balances {
            ledger
                .mint(funding.asset, funding.holder, funding.amount)
                .with_context(|| format!("Failed to fund {}", funding.holder))?;
        }
        let clock = Arc::new(ManualClock::new(scenario.start_time));
        let engine = PoolEngine::from_config(config, ledger, Arc::clone(&clock));
        let events = engine.subscribe(config.events.channel_capacity);

        info!(
            balances = scenario.balances.len(),
            steps = scenario.steps.len(),
            start_time = scenario.start_time,
            "Scenario loaded"
        );
        Ok(Self {
            engine,
            clock,
            events,
        })
    }

    pub fn engine(&self) -> &ReplayEngine {
        &self.engine
    }

    /// Execute one step; engine rejections become [`StepOutcome::Error`]
    pub fn execute(&self, step: &Step) -> StepOutcome {
        let result = match step {
            Step::AddLiquidity { caller, request } => {
                self.engine.add_liquidity(*caller, request).map(StepOutcome::Added)
            }
            Step::RemoveLiquidity { caller, request } => self
                .engine
                .remove_liquidity(*caller, request)
                .map(StepOutcome::Removed),
            Step::Swap { caller, request } => self
                .engine
                .swap_exact_for_exact(*caller, request)
                .map(StepOutcome::Swapped),
            Step::AdvanceTime { seconds } => {
                self.clock.advance(*seconds);
                Ok(StepOutcome::Clock {
                    now: self.clock.now(),
                })
            }
            Step::Reserves { asset_a, asset_b } => self
                .engine
                .get_reserves(*asset_a, *asset_b)
                .map(|(reserve_a, reserve_b)| StepOutcome::Reserves {
                    reserve_a,
                    reserve_b,
                }),
            Step::Price { asset_a, asset_b } => self
                .engine
                .get_price(*asset_a, *asset_b)
                .map(|price| StepOutcome::Price { price }),
        };

        result.unwrap_or_else(|err| {
            warn!(op = step.name(), error = %err, "Step rejected");
            StepOutcome::Error {
                message: err.to_string(),
            }
        })
    }

    /// Execute every step, writing one JSON line per outcome and per event
    pub fn run<W: Write>(&self, scenario: &Scenario, out: &mut W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (index, step) in scenario.steps.iter().enumerate() {
            let outcome = self.execute(step);
            summary.steps += 1;
            if outcome.is_error() {
                summary.failed += 1;
            }
            debug!(index, op = step.name(), "Step executed");
            write_line(
                out,
                &StepReport::Step {
                    index,
                    op: step.name(),
                    outcome,
                },
            )?;

            for event in self.events.try_iter() {
                summary.events += 1;
                write_line(out, &StepReport::Event(event))?;
            }
        }

        out.flush().context("Failed to flush output")?;
        Ok(summary)
    }
}

fn write_line<W: Write>(out: &mut W, report: &StepReport) -> Result<()> {
    serde_json::to_writer(&mut *out, report).context("Failed to serialize report")?;
    writeln!(out).context("Failed to write report")?;
    Ok(())
}
