use std::iter::FusedIterator;

use chrono::{Local, Months, NaiveDate};

use super::types::{
    Debt, DebtStatus, MonthRecord, PaymentRecord, Strategy, Timeline, WorkingDebt,
};

/// Hard cap on simulated months (30 years). A run that reaches it with
/// balance still owed is reported as not converged.
pub const MAX_SIMULATION_MONTHS: u32 = 360;

/// Currency rounding tolerance: a remaining balance at or below one cent is
/// treated as paid off, i.e. balances are settled to the nearest cent.
pub const PAYOFF_EPSILON: f64 = 0.01;

/// Returns a new vector of `debts` in repayment priority order. Ties keep
/// their input order.
pub fn order_by_strategy(debts: &[Debt], strategy: Strategy) -> Vec<Debt> {
    let mut ordered = debts.to_vec();
    match strategy {
        Strategy::Snowball => ordered.sort_by(|a, b| a.balance.total_cmp(&b.balance)),
        Strategy::Avalanche => {
            ordered.sort_by(|a, b| b.interest_rate.total_cmp(&a.interest_rate))
        }
    }
    ordered
}

/// Month-by-month amortization of a set of debts under one strategy.
///
/// Each call to [`Iterator::next`] advances one month and yields its
/// [`MonthRecord`]. Iteration ends once every balance is zero or after
/// [`MAX_SIMULATION_MONTHS`] months; [`PayoffSimulation::converged`] tells the
/// two apart.
///
/// Every month starts with a surplus pool of `extra_payment` plus the
/// minimum payments of debts retired in earlier months. Debts are visited in
/// strategy order and each one takes as much of the pool as it needs to be
/// retired. When a debt is retired, the part of its minimum payment it did
/// not need goes back into the pool for the debts after it in the same month.
#[derive(Debug, Clone)]
pub struct PayoffSimulation {
    debts: Vec<WorkingDebt>,
    extra_payment: f64,
    rollover: f64,
    month: u32,
}

impl PayoffSimulation {
    pub fn new(debts: &[Debt], strategy: Strategy, extra_payment: f64) -> Self {
        Self {
            debts: order_by_strategy(debts, strategy)
                .iter()
                .map(WorkingDebt::from)
                .collect(),
            extra_payment,
            rollover: 0.0,
            month: 0,
        }
    }

    /// Number of months simulated so far.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn debts(&self) -> &[WorkingDebt] {
        &self.debts
    }

    /// True once no debt carries a positive balance.
    pub fn converged(&self) -> bool {
        !self.debts.iter().any(|debt| debt.remaining_balance > 0.0)
    }

    pub fn final_status(&self) -> Vec<DebtStatus> {
        self.debts.iter().map(DebtStatus::from).collect()
    }

    fn amortize_month(&mut self) -> MonthRecord {
        let month = self.month;
        let mut available_extra = self.extra_payment + self.rollover;
        let mut freed_minimums = 0.0;

        let mut payments = Vec::with_capacity(self.debts.len());
        let mut total_payment = 0.0;
        let mut total_interest = 0.0;
        let mut total_principal = 0.0;

        for debt in self.debts.iter_mut() {
            if debt.remaining_balance <= 0.0 {
                continue;
            }

            let monthly_interest = debt.remaining_balance * (debt.interest_rate / 100.0) / 12.0;
            let payoff_amount = debt.remaining_balance + monthly_interest;

            let mut payment = debt.minimum_payment;
            if available_extra > 0.0 && !debt.paid_off {
                let extra = available_extra.min(payoff_amount - payment).max(0.0);
                payment += extra;
                available_extra -= extra;
            }
            payment = payment.min(payoff_amount);

            // Negative when the payment does not cover interest; the balance
            // then grows.
            let mut principal = payment - monthly_interest;
            debt.remaining_balance -= principal;
            debt.total_interest_paid += monthly_interest;

            if debt.remaining_balance <= PAYOFF_EPSILON {
                payment += debt.remaining_balance;
                principal += debt.remaining_balance;
                debt.remaining_balance = 0.0;
                debt.paid_off = true;
                debt.paid_off_month = Some(month);

                available_extra += (debt.minimum_payment - payment).max(0.0);
                freed_minimums += debt.minimum_payment;
            }

            payments.push(PaymentRecord {
                debt_id: debt.id,
                debt_name: debt.name.clone(),
                payment,
                interest: monthly_interest,
                principal,
                remaining_balance: debt.remaining_balance,
            });
            total_payment += payment;
            total_interest += monthly_interest;
            total_principal += principal;
        }

        self.rollover += freed_minimums;

        MonthRecord {
            month,
            payments,
            total_payment,
            total_interest,
            total_principal,
            remaining_debts: self
                .debts
                .iter()
                .filter(|debt| debt.remaining_balance > 0.0)
                .count(),
        }
    }
}

impl Iterator for PayoffSimulation {
    type Item = MonthRecord;

    fn next(&mut self) -> Option<MonthRecord> {
        if self.converged() || self.month >= MAX_SIMULATION_MONTHS {
            return None;
        }
        self.month += 1;
        Some(self.amortize_month())
    }
}

impl FusedIterator for PayoffSimulation {}

/// Simulates payoff starting from today's local date.
pub fn simulate(debts: &[Debt], strategy: Strategy, extra_payment: f64) -> Timeline {
    simulate_from(debts, strategy, extra_payment, Local::now().date_naive())
}

/// Simulates payoff with `start` as the month-zero date used for
/// `debt_free_date`.
pub fn simulate_from(
    debts: &[Debt],
    strategy: Strategy,
    extra_payment: f64,
    start: NaiveDate,
) -> Timeline {
    let mut simulation = PayoffSimulation::new(debts, strategy, extra_payment);
    let monthly_schedule: Vec<MonthRecord> = simulation.by_ref().collect();
    let months = simulation.month();
    let total_interest: f64 = monthly_schedule
        .iter()
        .map(|record| record.total_interest)
        .sum();
    let did_not_converge = !simulation.converged();

    if did_not_converge {
        log::warn!(
            "{} payoff did not converge within {MAX_SIMULATION_MONTHS} months ({} debts)",
            strategy.as_str(),
            debts.len()
        );
    } else {
        log::debug!(
            "{} payoff: {months} months, total interest {total_interest:.2}",
            strategy.as_str()
        );
    }

    Timeline {
        months,
        total_interest,
        monthly_schedule,
        debt_free_date: add_months(start, months),
        final_debt_status: simulation.final_status(),
        did_not_converge,
    }
}

fn add_months(start: NaiveDate, months: u32) -> NaiveDate {
    start
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
