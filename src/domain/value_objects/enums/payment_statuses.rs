use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Successful,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Successful => "successful",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "successful" => Some(PaymentStatus::Successful),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    /// Only successful payments count towards a plan's `amount_paid`.
    pub fn is_counted(&self) -> bool {
        matches!(self, PaymentStatus::Successful)
    }

    /// True when moving from `self` to `next` adds a payment to the counted set.
    pub fn enters_counted(&self, next: PaymentStatus) -> bool {
        !self.is_counted() && next.is_counted()
    }

    /// True when moving from `self` to `next` changes the counted set at all.
    pub fn changes_counted(&self, next: PaymentStatus) -> bool {
        self.is_counted() != next.is_counted()
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
