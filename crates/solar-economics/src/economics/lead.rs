use serde::{Deserialize, Serialize};

use super::scoring::LeadScore;

/// Dashboard-owned lifecycle of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Converted,
    Lost,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Converted => "Converted",
            Self::Lost => "Lost",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Converted | Self::Lost)
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Contacted)
                | (Self::New, Self::Lost)
                | (Self::Contacted, Self::Converted)
                | (Self::Contacted, Self::Lost)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lead cannot move from {} to {}", from.label(), to.label())]
pub struct LeadTransitionError {
    pub from: LeadStatus,
    pub to: LeadStatus,
}

/// The slice of a persisted lead this engine is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub lead_score: u8,
    pub status: LeadStatus,
}

impl LeadRecord {
    pub fn new(score: &LeadScore) -> Self {
        Self {
            lead_score: score.total,
            status: LeadStatus::New,
        }
    }

    pub fn transition(&mut self, next: LeadStatus) -> Result<(), LeadTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(LeadTransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
