use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanType {
    Instalment,
    Sponsorship,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Instalment => "Instalment",
            PlanType::Sponsorship => "Sponsorship",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Instalment" => Some(PlanType::Instalment),
            "Sponsorship" => Some(PlanType::Sponsorship),
            _ => None,
        }
    }
}

impl Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
