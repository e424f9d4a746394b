use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type DebtId = i64;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Lowest balance first.
    Snowball,
    /// Highest interest rate first.
    Avalanche,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Snowball => "snowball",
            Strategy::Avalanche => "avalanche",
        }
    }
}

/// Category tag of a debt. Unknown tags are kept verbatim so a record read
/// from storage serializes back unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum DebtType {
    CreditCard,
    StudentLoan,
    AutoLoan,
    Mortgage,
    PersonalLoan,
    Medical,
    Other(String),
}

impl DebtType {
    pub fn as_str(&self) -> &str {
        match self {
            DebtType::CreditCard => "Credit Card",
            DebtType::StudentLoan => "Student Loan",
            DebtType::AutoLoan => "Auto Loan",
            DebtType::Mortgage => "Mortgage",
            DebtType::PersonalLoan => "Personal Loan",
            DebtType::Medical => "Medical",
            DebtType::Other(tag) => tag,
        }
    }
}

impl From<String> for DebtType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Credit Card" => DebtType::CreditCard,
            "Student Loan" => DebtType::StudentLoan,
            "Auto Loan" => DebtType::AutoLoan,
            "Mortgage" => DebtType::Mortgage,
            "Personal Loan" => DebtType::PersonalLoan,
            "Medical" => DebtType::Medical,
            _ => DebtType::Other(value),
        }
    }
}

impl From<DebtType> for String {
    fn from(value: DebtType) -> Self {
        match value {
            DebtType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: DebtId,
    pub name: String,
    pub balance: f64,
    /// Annual percentage, e.g. `19.99` for 19.99% APR.
    pub interest_rate: f64,
    #[serde(default)]
    pub minimum_payment: Option<f64>,
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    #[serde(default)]
    pub credit_limit: Option<f64>,
}

impl Debt {
    pub fn minimum_payment_or_zero(&self) -> f64 {
        self.minimum_payment.unwrap_or(0.0)
    }
}

/// Per-run mutable copy of a [`Debt`]. Never escapes the simulation that
/// created it.
#[derive(Debug, Clone)]
pub struct WorkingDebt {
    pub id: DebtId,
    pub name: String,
    pub interest_rate: f64,
    pub minimum_payment: f64,
    pub remaining_balance: f64,
    pub total_interest_paid: f64,
    pub paid_off: bool,
    pub paid_off_month: Option<u32>,
}

impl From<&Debt> for WorkingDebt {
    fn from(debt: &Debt) -> Self {
        Self {
            id: debt.id,
            name: debt.name.clone(),
            interest_rate: debt.interest_rate,
            minimum_payment: debt.minimum_payment_or_zero(),
            remaining_balance: debt.balance,
            total_interest_paid: 0.0,
            paid_off: false,
            paid_off_month: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub debt_id: DebtId,
    pub debt_name: String,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    pub month: u32,
    pub payments: Vec<PaymentRecord>,
    pub total_payment: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub remaining_debts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtStatus {
    pub id: DebtId,
    pub name: String,
    pub paid_off_month: Option<u32>,
    pub total_interest_paid: f64,
}

impl From<&WorkingDebt> for DebtStatus {
    fn from(debt: &WorkingDebt) -> Self {
        Self {
            id: debt.id,
            name: debt.name.clone(),
            paid_off_month: debt.paid_off_month,
            total_interest_paid: debt.total_interest_paid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub months: u32,
    pub total_interest: f64,
    pub monthly_schedule: Vec<MonthRecord>,
    pub debt_free_date: NaiveDate,
    pub final_debt_status: Vec<DebtStatus>,
    /// Set when the month cap was reached with balance still owed; `months`
    /// and `debt_free_date` then under-state the real payoff time.
    pub did_not_converge: bool,
}

impl Timeline {
    /// Aggregate remaining balance after each simulated month, index 0 being
    /// month 1. Debts paid off in earlier months contribute zero.
    pub fn balance_series(&self) -> Vec<f64> {
        let mut latest: Vec<(DebtId, f64)> = Vec::new();
        let mut series = Vec::with_capacity(self.monthly_schedule.len());
        for record in &self.monthly_schedule {
            for payment in &record.payments {
                match latest.iter_mut().find(|(id, _)| *id == payment.debt_id) {
                    Some(entry) => entry.1 = payment.remaining_balance,
                    None => latest.push((payment.debt_id, payment.remaining_balance)),
                }
            }
            series.push(latest.iter().map(|(_, balance)| balance).sum());
        }
        series
    }

    pub fn interest_for_debt(&self, id: DebtId) -> Option<f64> {
        self.final_debt_status
            .iter()
            .find(|status| status.id == id)
            .map(|status| status.total_interest_paid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySummary {
    pub months: u32,
    pub total_interest: f64,
    pub debt_free_date: NaiveDate,
    pub did_not_converge: bool,
}

impl From<&Timeline> for StrategySummary {
    fn from(timeline: &Timeline) -> Self {
        Self {
            months: timeline.months,
            total_interest: timeline.total_interest,
            debt_free_date: timeline.debt_free_date,
            did_not_converge: timeline.did_not_converge,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyComparison {
    pub snowball: StrategySummary,
    pub avalanche: StrategySummary,
    /// Positive when avalanche pays less interest than snowball.
    pub interest_savings: f64,
    /// Positive when avalanche finishes sooner than snowball.
    pub time_difference: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPaymentRecommendation {
    pub debt_id: DebtId,
    pub debt_name: String,
    pub amount: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUtilization {
    pub id: DebtId,
    pub name: String,
    pub utilization: f64,
    pub balance: f64,
    pub limit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditUtilization {
    pub overall: f64,
    pub cards: Vec<CardUtilization>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_deserializes_from_storage_keys() {
        let json = r#"{
          "id": 7,
          "name": "Visa",
          "balance": 2500.5,
          "interestRate": 19.99,
          "minimumPayment": 75,
          "type": "Credit Card",
          "creditLimit": 5000
        }"#;
        let debt: Debt = serde_json::from_str(json).expect("debt should parse");
        assert_eq!(debt.id, 7);
        assert_eq!(debt.debt_type, DebtType::CreditCard);
        assert_eq!(debt.minimum_payment, Some(75.0));
        assert_eq!(debt.credit_limit, Some(5000.0));
    }

    #[test]
    fn debt_optional_fields_default_to_none() {
        let json = r#"{"id":1,"name":"Dentist","balance":300,"interestRate":0,"type":"Medical"}"#;
        let debt: Debt = serde_json::from_str(json).expect("debt should parse");
        assert_eq!(debt.minimum_payment, None);
        assert_eq!(debt.minimum_payment_or_zero(), 0.0);
        assert_eq!(debt.credit_limit, None);
    }

    #[test]
    fn unknown_debt_type_round_trips_verbatim() {
        let json = r#"{"id":1,"name":"Family","balance":300,"interestRate":0,"type":"Family Loan"}"#;
        let debt: Debt = serde_json::from_str(json).expect("debt should parse");
        assert_eq!(debt.debt_type, DebtType::Other("Family Loan".to_string()));
        let out = serde_json::to_string(&debt).expect("debt should serialize");
        assert!(out.contains("\"type\":\"Family Loan\""));
    }

    #[test]
    fn strategy_uses_lowercase_wire_names() {
        let parsed: Strategy = serde_json::from_str("\"avalanche\"").expect("strategy");
        assert_eq!(parsed, Strategy::Avalanche);
        assert_eq!(
            serde_json::to_string(&Strategy::Snowball).expect("serialize"),
            "\"snowball\""
        );
    }

    #[test]
    fn balance_series_carries_paid_off_debts_as_zero() {
        let record = |month, payments: Vec<(DebtId, f64)>| MonthRecord {
            month,
            payments: payments
                .into_iter()
                .map(|(debt_id, remaining_balance)| PaymentRecord {
                    debt_id,
                    debt_name: String::new(),
                    payment: 0.0,
                    interest: 0.0,
                    principal: 0.0,
                    remaining_balance,
                })
                .collect(),
            total_payment: 0.0,
            total_interest: 0.0,
            total_principal: 0.0,
            remaining_debts: 0,
        };
        let timeline = Timeline {
            months: 2,
            total_interest: 0.0,
            monthly_schedule: vec![
                record(1, vec![(1, 0.0), (2, 900.0)]),
                record(2, vec![(2, 700.0)]),
            ],
            debt_free_date: NaiveDate::from_ymd_opt(2026, 3, 1).expect("date"),
            final_debt_status: vec![DebtStatus {
                id: 2,
                name: "Loan".to_string(),
                paid_off_month: None,
                total_interest_paid: 12.5,
            }],
            did_not_converge: true,
        };

        assert_eq!(timeline.balance_series(), vec![900.0, 700.0]);
        assert_eq!(timeline.interest_for_debt(2), Some(12.5));
        assert_eq!(timeline.interest_for_debt(9), None);
    }
}
