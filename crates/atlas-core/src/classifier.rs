//! Decides which specialists a new user input makes stale.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::SpecialistKind;
use crate::specialist::TripBrief;

/// Maps free-text input to the specialist kinds it affects.
pub trait Classifier: Send + Sync {
    fn classify(&self, input: &str) -> BTreeSet<SpecialistKind>;
}

const FAMILIES: [(SpecialistKind, &str); 5] = [
    (
        SpecialistKind::Flight,
        r"flights?|fly|flying|airlines?|airports?|non-?stop|direct|layovers?|fares?",
    ),
    (
        SpecialistKind::Hotel,
        r"hotels?|stay|lodging|boutique|hostels?|luxury|apartments?|rooms?|accommodations?",
    ),
    (
        SpecialistKind::Activities,
        r"museums?|food|tours?|activit(?:y|ies)|hik(?:e|ing)|art|galler(?:y|ies)|nightlife|bars?|shopping|markets?|restaurants?|history|historic|beach",
    ),
    (
        SpecialistKind::Destination,
        r"weather|language|visas?|safety|currency|customs|culture|neighbou?rhoods?",
    ),
    (
        SpecialistKind::Budget,
        r"budget|cheap|cheaper|afford|expensive|cost|price|spend",
    ),
];

fn families() -> &'static [(SpecialistKind, Regex)] {
    static FAMILIES_RE: OnceLock<Vec<(SpecialistKind, Regex)>> = OnceLock::new();
    FAMILIES_RE.get_or_init(|| {
        FAMILIES
            .iter()
            .map(|(kind, words)| {
                let pattern = format!(r"(?i)\b(?:{words})\b");
                (*kind, Regex::new(&pattern).expect("valid regex"))
            })
            .collect()
    })
}

/// Keyword-family classifier.
///
/// Inputs that name a new destination, origin or trip length affect every
/// research kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl Classifier for KeywordClassifier {
    fn classify(&self, input: &str) -> BTreeSet<SpecialistKind> {
        if TripBrief::reshapes_trip(input) {
            let mut all: BTreeSet<_> = SpecialistKind::RESEARCH.into_iter().collect();
            all.insert(SpecialistKind::Budget);
            return all;
        }

        families()
            .iter()
            .filter(|(_, re)| re.is_match(input))
            .map(|(kind, _)| *kind)
            .collect()
    }
}
