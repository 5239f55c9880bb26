//! Knobs for one end-to-end AI creation run.

use forge_policy::PolicyMethod;
use forge_select::TournamentConfig;

/// Configuration for [`crate::driver::create_ai`].
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Number of candidate strategies the Policy Designer drafts.
    pub num_strategies: usize,
    /// Number of candidate metrics the Policy Designer drafts.
    pub num_metrics: usize,
    /// Which flattenings of the policy bundle to synthesize a heuristic
    /// function for. Each text yields one [`forge_heuristic::HeuristicFunction`].
    pub methods: Vec<PolicyMethod>,
    /// Whether a heuristic whose draft fails to compile gets a repair
    /// attempt, or is deactivated immediately.
    pub enable_fix: bool,
    /// How many self-play games to run during fix-by-playing, stopping
    /// early on the first game that completes without error.
    pub fix_by_playing_games: usize,
    /// Seats per game during both fix-by-playing and tournament evaluation.
    pub num_players: usize,
    /// Tournament sizing/scoring knobs for the Feature Selection Optimizer.
    pub tournament: TournamentConfig,
    /// Number of Feature Selection Optimizer rounds to run (two, per the
    /// original: the second round exploits the first round's history).
    pub selection_rounds: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            num_strategies: 3,
            num_metrics: 3,
            methods: vec![
                PolicyMethod::Strategy,
                PolicyMethod::Reflect,
                PolicyMethod::Metric,
                PolicyMethod::Singular,
                PolicyMethod::StrategyMetricOneCode,
            ],
            enable_fix: true,
            fix_by_playing_games: 5,
            num_players: 2,
            tournament: TournamentConfig::default(),
            selection_rounds: 2,
        }
    }
}
