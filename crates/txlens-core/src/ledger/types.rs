use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{RiskIndicator, TransactionContext};

use super::privacy_hash;

/// Upper bound on `recent` reads.
pub const MAX_RECENT_DECISIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `high` for two or more warnings, `medium` for exactly one, else `low`.
    pub fn from_indicators(indicators: &[RiskIndicator]) -> Self {
        match indicators.iter().filter(|i| i.is_warning()).count() {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(LedgerError::InvalidRiskLevel(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserChoice {
    Approved,
    Rejected,
}

/// The user's decision on one reviewed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub transaction_hash: String,
    pub user_choice: UserChoice,
    pub risk_level: RiskLevel,
    pub timestamp: u64,
    pub user_hash: String,
    pub is_demo: bool,
}

impl DecisionRecord {
    pub fn new(
        context: &TransactionContext,
        choice: UserChoice,
        user: &Address,
        timestamp: u64,
        is_demo: bool,
    ) -> Self {
        Self {
            transaction_hash: context.hash.clone(),
            user_choice: choice,
            risk_level: RiskLevel::from_indicators(&context.risk_indicators),
            timestamp,
            user_hash: privacy_hash(user),
            is_demo,
        }
    }

    pub fn as_log(&self) -> DecisionLog<'_> {
        DecisionLog {
            transaction_hash: &self.transaction_hash,
            user_hash: &self.user_hash,
            approved: self.user_choice == UserChoice::Approved,
            risk_level: self.risk_level.as_str(),
            timestamp: self.timestamp,
            is_demo: self.is_demo,
        }
    }
}

/// A decision as submitted to the ledger, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionLog<'a> {
    pub transaction_hash: &'a str,
    pub user_hash: &'a str,
    pub approved: bool,
    pub risk_level: &'a str,
    pub timestamp: u64,
    pub is_demo: bool,
}

/// A validated, stored decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: u64,
    pub transaction_hash: String,
    pub user_hash: String,
    pub approved: bool,
    pub risk_level: RiskLevel,
    pub timestamp: u64,
    #[serde(default)]
    pub is_demo: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub total_decisions: u64,
    pub approvals: u64,
    pub rejections: u64,
    pub demo_decisions: u64,
}

impl LedgerStats {
    pub(super) fn record(&mut self, entry: &LedgerEntry) {
        self.total_decisions += 1;
        if entry.approved {
            self.approvals += 1;
        } else {
            self.rejections += 1;
        }
        if entry.is_demo {
            self.demo_decisions += 1;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("transaction hash must not be empty")]
    EmptyTransactionHash,

    #[error("user hash must not be empty")]
    EmptyUserHash,

    #[error("invalid risk level `{0}`; expected low, medium or high")]
    InvalidRiskLevel(String),

    #[error("limit must be at least 1")]
    InvalidLimit,

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndicatorType;

    fn warning() -> RiskIndicator {
        RiskIndicator::warning(IndicatorType::NewToken, "w", "s")
    }

    fn info() -> RiskIndicator {
        RiskIndicator::info(IndicatorType::HighValue, "i", "s")
    }

    #[test]
    fn risk_level_counts_warnings_only() {
        assert_eq!(RiskLevel::from_indicators(&[]), RiskLevel::Low);
        assert_eq!(RiskLevel::from_indicators(&[info(), info()]), RiskLevel::Low);
        assert_eq!(RiskLevel::from_indicators(&[info(), warning()]), RiskLevel::Medium);
        assert_eq!(
            RiskLevel::from_indicators(&[warning(), info(), warning()]),
            RiskLevel::High
        );
    }

    #[test]
    fn risk_level_parse_is_exact() {
        assert_eq!("medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert!("Medium".parse::<RiskLevel>().is_err());
        assert!("critical".parse::<RiskLevel>().is_err());
        assert!("".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn decision_record_serializes_camel_case() {
        let record = DecisionRecord {
            transaction_hash: "0x1".to_owned(),
            user_choice: UserChoice::Rejected,
            risk_level: RiskLevel::High,
            timestamp: 5,
            user_hash: "0xabc".to_owned(),
            is_demo: true,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userChoice"], "rejected");
        assert_eq!(json["riskLevel"], "high");
        assert_eq!(json["isDemo"], true);

        let log = record.as_log();
        assert!(!log.approved);
        assert_eq!(log.risk_level, "high");
    }
}
