//! Owner search for the reception desk.
//!
//! Scoring:
//! - Substring hit on name, national ID, phone, email or a pet name: 1.0
//! - Otherwise best Jaro-Winkler similarity between the query and any single
//!   word of the owner's or pets' names, kept only above the threshold

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::models::Owner;
use crate::store::ClinicState;

/// Score for a direct substring hit.
const EXACT_SCORE: f64 = 1.0;

/// An owner matching a search query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerMatch {
    pub owner: Owner,
    /// 0.0..=1.0, higher is better
    pub score: f64,
}

impl ClinicState {
    /// Owners matching `query`, best first (ties by name), at most `limit`.
    /// A blank query matches nothing.
    pub fn search_owners(&self, query: &str, limit: usize, threshold: f64) -> Vec<OwnerMatch> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<OwnerMatch> = self
            .owners
            .iter()
            .filter_map(|owner| {
                let score = score_owner(owner, &needle);
                (score >= threshold).then(|| OwnerMatch {
                    owner: owner.clone(),
                    score,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.owner.full_name.cmp(&b.owner.full_name))
        });
        matches.truncate(limit);
        matches
    }
}

fn score_owner(owner: &Owner, needle: &str) -> f64 {
    let exact_fields = [
        owner.full_name.as_str(),
        owner.national_id.as_str(),
        owner.phone.as_str(),
        owner.email.as_str(),
    ];
    let pet_names = owner.pets.iter().map(|p| p.name.as_str());

    if exact_fields
        .into_iter()
        .chain(pet_names.clone())
        .any(|field| !field.is_empty() && field.to_lowercase().contains(needle))
    {
        return EXACT_SCORE;
    }

    owner
        .full_name
        .split_whitespace()
        .chain(pet_names)
        .map(|word| jaro_winkler(needle, &word.to_lowercase()))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;
    use crate::query::fixtures::*;

    fn clinic() -> ClinicState {
        let mut carlos = owner("Carlos Pérez", &[("Max", Species::Dog)]);
        carlos.phone = "555-0101".into();
        carlos.email = "carlos@example.com".into();
        let mut carla = owner("Carla Pereira", &[("Luna", Species::Cat)]);
        carla.national_id = "X1234567".into();
        let maria = owner("María García", &[("Rocky", Species::Dog)]);
        state(vec![carlos, carla, maria])
    }

    #[test]
    fn test_substring_hits_score_one() {
        let state = clinic();
        let hits = state.search_owners("carl", 10, 0.85);
        let names: Vec<_> = hits.iter().map(|m| m.owner.full_name.as_str()).collect();
        assert_eq!(names, vec!["Carla Pereira", "Carlos Pérez"]);
        assert!(hits.iter().all(|m| m.score == 1.0));
    }

    #[test]
    fn test_matches_contact_fields_and_pets() {
        let state = clinic();
        assert_eq!(state.search_owners("0101", 10, 0.85)[0].owner.full_name, "Carlos Pérez");
        assert_eq!(state.search_owners("x1234", 10, 0.85)[0].owner.full_name, "Carla Pereira");
        assert_eq!(state.search_owners("rocky", 10, 0.85)[0].owner.full_name, "María García");
    }

    #[test]
    fn test_fuzzy_match_on_typo() {
        let state = clinic();
        let hits = state.search_owners("garcai", 10, 0.85);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].owner.full_name, "María García");
        assert!(hits[0].score < 1.0);
    }

    #[test]
    fn test_blank_query_and_limit() {
        let state = clinic();
        assert!(state.search_owners("   ", 10, 0.85).is_empty());
        assert_eq!(state.search_owners("carl", 1, 0.85).len(), 1);
    }
}
