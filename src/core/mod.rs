mod analysis;
mod engine;
mod types;

pub use analysis::{
    allocate_extra_payment, compare_strategies, compare_strategies_from, credit_utilization,
    total_interest_for,
};
pub use engine::{
    MAX_SIMULATION_MONTHS, PAYOFF_EPSILON, PayoffSimulation, order_by_strategy, simulate,
    simulate_from,
};
pub use types::{
    CardUtilization, CreditUtilization, Debt, DebtId, DebtStatus, DebtType,
    ExtraPaymentRecommendation, MonthRecord, PaymentRecord, Strategy, StrategyComparison,
    StrategySummary, Timeline, WorkingDebt,
};
