//! Majority decision over the valid instances found on a page.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use trackdots_patterns::{MinCount, Tdm};

/// Result of voting among valid instances of one pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// The most frequent instance met the threshold.
    Accepted { winner: Tdm, support: usize },
    /// The most frequent instance has fewer copies than required.
    TooFewCopies { support: usize, required: usize },
    /// Every copy had to agree but they did not.
    Disagreement { support: usize, total: usize },
    NoValidInstance,
}

impl VoteOutcome {
    pub fn winner(&self) -> Option<&Tdm> {
        match self {
            VoteOutcome::Accepted { winner, .. } => Some(winner),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, VoteOutcome::Accepted { .. })
    }
}

/// Group `valid` by value and pick the largest group.
///
/// Ties go to the group seen first.
pub fn majority(valid: &[Tdm], min_count: MinCount) -> VoteOutcome {
    let mut counts: Vec<(&Tdm, usize)> = Vec::new();
    let mut index: HashMap<&Tdm, usize> = HashMap::new();
    for tdm in valid {
        match index.get(tdm) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(tdm, counts.len());
                counts.push((tdm, 1));
            }
        }
    }

    let mut best: Option<(&Tdm, usize)> = None;
    for &(tdm, n) in &counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((tdm, n));
        }
    }
    let Some((winner, support)) = best else {
        return VoteOutcome::NoValidInstance;
    };

    match min_count {
        MinCount::All if support != valid.len() => VoteOutcome::Disagreement {
            support,
            total: valid.len(),
        },
        MinCount::AtLeast(required) if support < required => {
            VoteOutcome::TooFewCopies { support, required }
        }
        _ => VoteOutcome::Accepted {
            winner: winner.clone(),
            support,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackdots_patterns::{BitGrid, PatternId, Transformation};

    fn instance(extra: Option<[usize; 2]>) -> Tdm {
        let mut bits = BitGrid::zeros(24, 16);
        if let Some([r, c]) = extra {
            bits.set(r, c, true);
        }
        Tdm::new(PatternId::Three, &bits, Transformation::IDENTITY).unwrap()
    }

    #[test]
    fn largest_group_wins() {
        let a = instance(Some([8, 1]));
        let b = instance(Some([9, 1]));
        let valid = vec![b.clone(), a.clone(), a.clone(), b.clone(), a.clone()];
        assert_eq!(
            majority(&valid, MinCount::AtLeast(3)),
            VoteOutcome::Accepted {
                winner: a.clone(),
                support: 3
            }
        );
        assert_eq!(
            majority(&valid, MinCount::AtLeast(4)),
            VoteOutcome::TooFewCopies {
                support: 3,
                required: 4
            }
        );
        assert_eq!(
            majority(&valid, MinCount::All),
            VoteOutcome::Disagreement {
                support: 3,
                total: 5
            }
        );
    }

    #[test]
    fn ties_go_to_first_seen() {
        let a = instance(Some([8, 1]));
        let b = instance(None);
        let outcome = majority(&[b.clone(), a.clone(), a, b.clone()], MinCount::AtLeast(1));
        assert_eq!(outcome.winner(), Some(&b));
    }

    #[test]
    fn unanimous_copies_pass_all() {
        let a = instance(None);
        let outcome = majority(&[a.clone(), a.clone()], MinCount::All);
        assert!(outcome.is_accepted());
        assert_eq!(majority(&[], MinCount::All), VoteOutcome::NoValidInstance);
    }

    #[test]
    fn accepted_outcome_rejects_malformed_winner() {
        let good = VoteOutcome::Accepted {
            winner: instance(Some([8, 1])),
            support: 2,
        };
        let mut json = serde_json::to_value(&good).unwrap();
        assert_eq!(json["status"], "accepted");
        let back: VoteOutcome = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, good);

        json["winner"]["bits"] = serde_json::json!({ "rows": 1, "cols": 2, "data": [1, 1] });
        assert!(serde_json::from_value::<VoteOutcome>(json).is_err());
    }
}
