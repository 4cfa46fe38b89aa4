//! Audit-log filtering over the decision history.

use prx_contracts::{outcome::Outcome, record::DecisionRecord};

/// The outcome pill selected in a feed or audit view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutcomeFilter {
    #[default]
    All,
    Only(Outcome),
}

impl OutcomeFilter {
    /// All → Allowed → Blocked → Escalated → All.
    pub fn next(self) -> Self {
        match self {
            OutcomeFilter::All => OutcomeFilter::Only(Outcome::Allowed),
            OutcomeFilter::Only(Outcome::Allowed) => OutcomeFilter::Only(Outcome::Blocked),
            OutcomeFilter::Only(Outcome::Blocked) => OutcomeFilter::Only(Outcome::Escalated),
            OutcomeFilter::Only(Outcome::Escalated) => OutcomeFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutcomeFilter::All => "ALL",
            OutcomeFilter::Only(outcome) => outcome.as_str(),
        }
    }

    pub fn matches(self, outcome: Outcome) -> bool {
        match self {
            OutcomeFilter::All => true,
            OutcomeFilter::Only(wanted) => wanted == outcome,
        }
    }
}

impl From<Option<Outcome>> for OutcomeFilter {
    fn from(outcome: Option<Outcome>) -> Self {
        outcome.map_or(OutcomeFilter::All, OutcomeFilter::Only)
    }
}

/// Outcome filter plus free-text search.
///
/// The search is a case-insensitive substring match against the action
/// type, agent, matched policy, and trace id. An empty search matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub outcome: OutcomeFilter,
    search: String,
}

impl HistoryFilter {
    pub fn new(outcome: impl Into<OutcomeFilter>, search: impl AsRef<str>) -> Self {
        Self {
            outcome: outcome.into(),
            search: search.as_ref().trim().to_lowercase(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn matches(&self, record: &DecisionRecord) -> bool {
        if !self.outcome.matches(record.outcome) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        [
            record.action_type.as_str(),
            record.agent.as_str(),
            record.policy_matched.as_str(),
            record.trace_id.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&self.search))
    }

    /// Matching records in input order.
    pub fn apply<'a>(
        &self,
        records: impl IntoIterator<Item = &'a DecisionRecord>,
    ) -> Vec<&'a DecisionRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Number of records per outcome, for the filter pill badges.
pub fn outcome_counts<'a>(records: impl IntoIterator<Item = &'a DecisionRecord>) -> [(Outcome, usize); 3] {
    let mut counts = Outcome::ALL.map(|o| (o, 0usize));
    for record in records {
        for slot in counts.iter_mut() {
            if slot.0 == record.outcome {
                slot.1 += 1;
            }
        }
    }
    counts
}
