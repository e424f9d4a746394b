use chrono::{Local, NaiveDate};

use super::engine::{order_by_strategy, simulate, simulate_from};
use super::types::{
    CardUtilization, CreditUtilization, Debt, DebtType, ExtraPaymentRecommendation, Strategy,
    StrategyComparison, StrategySummary,
};

pub fn total_interest_for(debts: &[Debt], strategy: Strategy, extra_payment: f64) -> f64 {
    simulate(debts, strategy, extra_payment).total_interest
}

pub fn compare_strategies(debts: &[Debt], extra_payment: f64) -> StrategyComparison {
    compare_strategies_from(debts, extra_payment, Local::now().date_naive())
}

/// Runs both strategies from the same start date so their payoff dates are
/// directly comparable.
pub fn compare_strategies_from(
    debts: &[Debt],
    extra_payment: f64,
    start: NaiveDate,
) -> StrategyComparison {
    let snowball = simulate_from(debts, Strategy::Snowball, extra_payment, start);
    let avalanche = simulate_from(debts, Strategy::Avalanche, extra_payment, start);

    StrategyComparison {
        interest_savings: snowball.total_interest - avalanche.total_interest,
        time_difference: i64::from(snowball.months) - i64::from(avalanche.months),
        snowball: StrategySummary::from(&snowball),
        avalanche: StrategySummary::from(&avalanche),
    }
}

/// Names the single debt that should receive all of `amount` this month: the
/// first debt in strategy order that still has a balance.
pub fn allocate_extra_payment(
    debts: &[Debt],
    strategy: Strategy,
    amount: f64,
) -> Vec<ExtraPaymentRecommendation> {
    if amount.is_nan() || amount <= 0.0 {
        return Vec::new();
    }

    order_by_strategy(debts, strategy)
        .into_iter()
        .find(|debt| debt.balance > 0.0)
        .map(|target| {
            let reason = match strategy {
                Strategy::Snowball => format!(
                    "Lowest balance ({:.2}); clearing it first frees its minimum payment",
                    target.balance
                ),
                Strategy::Avalanche => format!(
                    "Highest interest rate ({:.2}%); extra payments here save the most interest",
                    target.interest_rate
                ),
            };
            ExtraPaymentRecommendation {
                debt_id: target.id,
                debt_name: target.name,
                amount,
                reason,
            }
        })
        .into_iter()
        .collect()
}

/// Utilization of revolving credit, in percent. Only credit cards with a
/// positive limit are counted.
pub fn credit_utilization(debts: &[Debt]) -> CreditUtilization {
    let cards: Vec<CardUtilization> = debts
        .iter()
        .filter(|debt| debt.debt_type == DebtType::CreditCard)
        .filter_map(|debt| match debt.credit_limit {
            Some(limit) if limit > 0.0 => Some(CardUtilization {
                id: debt.id,
                name: debt.name.clone(),
                utilization: debt.balance / limit * 100.0,
                balance: debt.balance,
                limit,
            }),
            _ => None,
        })
        .collect();

    let total_balance: f64 = cards.iter().map(|card| card.balance).sum();
    let total_limit: f64 = cards.iter().map(|card| card.limit).sum();
    let overall = if total_limit > 0.0 {
        total_balance / total_limit * 100.0
    } else {
        0.0
    };

    CreditUtilization { overall, cards }
}
