use crate::common::errors::Result;
use crate::config::types::StrategyConfig;
use crate::strategy::types::{Decision, IterationContext};

/// Core strategy trait
///
/// Strategies turn one iteration's inputs into a decision. Deciding and
/// committing are separate calls: the controller only commits once the
/// broker has accepted every action of the decision.
///
/// # Implementation Notes
///
/// - `on_iteration` must be a pure function of the context and the
///   strategy's current state; calling it twice gives the same decision
/// - Internal state (position side) changes only in `on_submitted`
/// - Collaborator I/O (broker, news, oracle) is the controller's job
///
/// # Example
///
/// ```ignore
/// struct AlwaysHold;
///
/// impl Strategy for AlwaysHold {
///     fn name(&self) -> &str { "always_hold" }
///
///     fn configure(&mut self, _cfg: &StrategyConfig) -> Result<()> { Ok(()) }
///
///     fn symbol(&self) -> &str { "SPY" }
///
///     fn on_iteration(&self, _ctx: &IterationContext) -> Result<Decision> {
///         Ok(Decision::hold(HoldReason::NoConviction))
///     }
/// }
/// ```
pub trait Strategy: Send + Sync {
    /// Unique identifier for this strategy
    fn name(&self) -> &str;

    /// Apply configuration; fails on values that can never trade
    fn configure(&mut self, cfg: &StrategyConfig) -> Result<()>;

    /// Traded symbol
    fn symbol(&self) -> &str;

    /// Called once per scheduled iteration
    ///
    /// # Returns
    /// * `Decision::Hold(_)` - No action
    /// * `Decision::Trade { .. }` - Execute `Decision::actions()` in order
    fn on_iteration(&self, ctx: &IterationContext) -> Result<Decision>;

    /// Called after every action of `decision` was accepted by the broker
    ///
    /// Default implementation does nothing.
    fn on_submitted(&mut self, _decision: &Decision) {}

    /// Called when the driver is shutting down
    ///
    /// Default implementation does nothing.
    fn on_shutdown(&mut self) {}
}
