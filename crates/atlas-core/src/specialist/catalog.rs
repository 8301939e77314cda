//! Deterministic built-in travel data and destination knowledge.
//!
//! Prices are derived from a stable hash of the city name so the same goal
//! always yields the same plan. Useful for demos and the CLI; production
//! deployments plug real services in through [`TravelData`] and
//! [`KnowledgeBase`].

use async_trait::async_trait;

use super::collaborators::{
    ActivityQuery, CollaboratorError, FlightQuery, HotelQuery, KnowledgeBase, TravelData,
};
use crate::models::{Activity, FlightOption, HotelOption};

const CARRIERS: [(&str, u32, u8); 3] = [
    ("Aurora Air", 0, 1),
    ("Meridian", 140, 0),
    ("Bluefin Airways", 60, 2),
];

const ACTIVITY_TEMPLATES: [(&str, &str, u32, u8); 10] = [
    ("{} art museum", "culture", 25, 3),
    ("Old town walking tour of {}", "history", 20, 2),
    ("{} food market tasting", "food", 45, 2),
    ("Sunset river cruise in {}", "outdoors", 35, 2),
    ("{} cooking class", "food", 85, 3),
    ("Jazz bar crawl in {}", "nightlife", 40, 3),
    ("{} botanical gardens", "outdoors", 12, 2),
    ("Historic quarter of {} by bike", "history", 30, 3),
    ("{} design district shopping", "shopping", 0, 3),
    ("{} contemporary gallery", "culture", 18, 2),
];

const KNOWN_FACTS: [(&str, &[&str]); 4] = [
    (
        "paris",
        &[
            "Paris is compact and best explored by Metro and on foot.",
            "Most museums close one day a week; the Louvre closes on Tuesdays.",
            "Tipping is modest; service is included in restaurant bills.",
        ],
    ),
    (
        "rome",
        &[
            "Rome's historic centre is walkable; buses fill the gaps.",
            "Book Vatican Museums tickets in advance to skip long queues.",
            "Many shops close for a long lunch break in the afternoon.",
        ],
    ),
    (
        "tokyo",
        &[
            "Tokyo's rail network is extensive; a stored-value IC card covers most lines.",
            "Cash is still widely used at smaller restaurants.",
            "Neighbourhoods differ sharply; plan days by district.",
        ],
    ),
    (
        "lisbon",
        &[
            "Lisbon is built on hills; trams and funiculars help.",
            "Dinner typically starts late, around 8pm.",
            "Many museums are free on Sunday mornings for residents only.",
        ],
    ),
];

/// FNV-1a over the lowercased name.
fn city_hash(city: &str) -> u32 {
    city.to_lowercase()
        .bytes()
        .fold(0x811c_9dc5_u32, |hash, b| (hash ^ u32::from(b)).wrapping_mul(0x0100_0193))
}

/// In-process travel data and knowledge source.
#[derive(Debug, Clone, Default)]
pub struct SampleCatalog;

impl SampleCatalog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TravelData for SampleCatalog {
    async fn search_flights(
        &self,
        query: &FlightQuery,
    ) -> Result<Vec<FlightOption>, CollaboratorError> {
        let base = 350 + city_hash(&query.destination) % 400;
        let origin = query.origin.clone().unwrap_or_else(|| "Home".to_string());
        Ok(CARRIERS
            .iter()
            .map(|(carrier, premium, stops)| FlightOption {
                carrier: (*carrier).to_string(),
                origin: origin.clone(),
                destination: query.destination.clone(),
                price: base + premium,
                stops: *stops,
            })
            .collect())
    }

    async fn search_hotels(
        &self,
        query: &HotelQuery,
    ) -> Result<Vec<HotelOption>, CollaboratorError> {
        let city = &query.city;
        let shift = city_hash(city) % 50;
        Ok(vec![
            HotelOption {
                name: format!("{city} Central Inn"),
                style: "chain".to_string(),
                nightly_rate: 110 + shift,
                rating: 39,
            },
            HotelOption {
                name: format!("The {city} Atelier"),
                style: "boutique".to_string(),
                nightly_rate: 190 + shift,
                rating: 46,
            },
            HotelOption {
                name: format!("Nomad House {city}"),
                style: "hostel".to_string(),
                nightly_rate: 40 + shift / 2,
                rating: 41,
            },
            HotelOption {
                name: format!("Palais {city}"),
                style: "luxury".to_string(),
                nightly_rate: 420 + shift * 2,
                rating: 48,
            },
        ])
    }

    async fn search_activities(
        &self,
        query: &ActivityQuery,
    ) -> Result<Vec<Activity>, CollaboratorError> {
        Ok(ACTIVITY_TEMPLATES
            .iter()
            .map(|(name, category, cost, hours)| Activity {
                name: name.replace("{}", &query.city),
                category: (*category).to_string(),
                cost: *cost,
                duration_hours: *hours,
            })
            .collect())
    }
}

#[async_trait]
impl KnowledgeBase for SampleCatalog {
    async fn lookup(&self, query: &str) -> Result<Vec<String>, CollaboratorError> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return Err(CollaboratorError::permanent("empty knowledge query"));
        }

        let facts = KNOWN_FACTS
            .iter()
            .find(|(city, _)| *city == key)
            .map(|(_, facts)| facts.iter().map(|f| (*f).to_string()).collect())
            .unwrap_or_else(|| {
                vec![
                    format!("{query} rewards arriving with a rough plan for each day."),
                    format!("Check local holidays in {query} before booking tours."),
                ]
            });
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_hash_is_case_insensitive() {
        assert_eq!(city_hash("Paris"), city_hash("PARIS"));
        assert_ne!(city_hash("Paris"), city_hash("Rome"));
    }

    #[tokio::test]
    async fn test_catalog_is_deterministic() {
        let catalog = SampleCatalog::new();
        let query = FlightQuery {
            origin: None,
            destination: "Paris".to_string(),
            days: 5,
        };
        let first = catalog.search_flights(&query).await.unwrap();
        let second = catalog.search_flights(&query).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first.iter().any(|f| f.stops == 0));
    }

    #[tokio::test]
    async fn test_lookup_known_and_unknown_city() {
        let catalog = SampleCatalog::new();
        let paris = catalog.lookup("Paris").await.unwrap();
        assert!(paris[0].contains("Metro"));

        let other = catalog.lookup("Reykjavik").await.unwrap();
        assert_eq!(other.len(), 2);
        assert!(other[0].starts_with("Reykjavik"));

        assert!(catalog.lookup("  ").await.is_err());
    }
}
