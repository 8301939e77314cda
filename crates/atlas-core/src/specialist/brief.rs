//! Extracts trip parameters from the goal and the user's later turns.
//!
//! Texts are read oldest first and every later mention overrides an earlier
//! one, so "actually make it 4 days" in turn 2 wins over "5-day" in the goal.

use std::sync::OnceLock;

use regex::Regex;

/// Trip length assumed when nothing in the conversation states one.
pub const DEFAULT_DAYS: u32 = 3;

const MAX_DAYS: u32 = 30;

const HOTEL_STYLES: [&str; 5] = ["boutique", "luxury", "hostel", "apartment", "chain"];

const INTERESTS: [(&str, &[&str]); 6] = [
    ("culture", &["museum", "art", "gallery", "culture"]),
    ("food", &["food", "restaurant", "cuisine", "wine", "eat"]),
    ("outdoors", &["hike", "hiking", "outdoor", "park", "nature", "beach"]),
    ("nightlife", &["nightlife", "bar", "club", "jazz"]),
    ("shopping", &["shop", "shopping", "market"]),
    ("history", &["history", "historic", "castle", "ruins"]),
];

/// Parameters the reference specialists work from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripBrief {
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub days: u32,
    pub budget: Option<u32>,
    pub hotel_style: Option<String>,
    pub nonstop: bool,
    pub interests: Vec<String>,
}

impl Default for TripBrief {
    fn default() -> Self {
        Self {
            destination: None,
            origin: None,
            days: DEFAULT_DAYS,
            budget: None,
            hotel_style: None,
            nonstop: false,
            interests: Vec::new(),
        }
    }
}

struct Patterns {
    days: Regex,
    week: Regex,
    budget_symbol: Regex,
    budget_words: Regex,
    destination_before: Regex,
    destination_after: Regex,
    origin: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        days: Regex::new(r"(?i)\b(\d{1,2})[- ]?(day|days|night|nights)\b").expect("valid regex"),
        week: Regex::new(r"(?i)\b(a|one|1)[- ]week\b|\bweekend\b").expect("valid regex"),
        budget_symbol: Regex::new(r"[$€£]\s?(\d[\d,]*)").expect("valid regex"),
        budget_words: Regex::new(r"(?i)\b(\d[\d,]*)\s?(usd|dollars|eur|euros|gbp)\b")
            .expect("valid regex"),
        destination_before: Regex::new(
            r"\b([A-Z][a-zA-Z]+(?: [A-Z][a-zA-Z]+)?)\s+(?:trip|getaway|vacation|holiday|itinerary|visit)\b",
        )
        .expect("valid regex"),
        destination_after: Regex::new(
            r"\b(?:to|in|visit|visiting|around)\s+([A-Z][a-zA-Z]+(?: [A-Z][a-zA-Z]+)?)",
        )
        .expect("valid regex"),
        origin: Regex::new(r"\bfrom\s+([A-Z][a-zA-Z]+(?: [A-Z][a-zA-Z]+)?)").expect("valid regex"),
    })
}

fn parse_amount(raw: &str) -> Option<u32> {
    raw.replace(',', "").parse().ok()
}

impl TripBrief {
    /// Builds a brief from the goal followed by every turn, in order.
    pub fn parse<'a, I>(goal: &'a str, turns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut brief = TripBrief::default();
        brief.absorb(goal);
        for text in turns {
            brief.absorb(text);
        }
        brief
    }

    fn absorb(&mut self, text: &str) {
        let p = patterns();
        let lower = text.to_lowercase();

        if let Some(caps) = p.days.captures_iter(text).last() {
            if let Ok(n) = caps[1].parse::<u32>() {
                let is_nights = caps[2].to_lowercase().starts_with("night");
                let days = if is_nights { n + 1 } else { n };
                self.days = days.clamp(1, MAX_DAYS);
            }
        } else if let Some(caps) = p.week.captures(text) {
            self.days = if caps.get(1).is_some() { 7 } else { 2 };
        }

        let budget = p
            .budget_symbol
            .captures_iter(text)
            .chain(p.budget_words.captures_iter(text))
            .filter_map(|caps| parse_amount(&caps[1]))
            .last();
        if budget.is_some() {
            self.budget = budget;
        }

        let destination = p
            .destination_before
            .captures(text)
            .or_else(|| p.destination_after.captures(text))
            .map(|caps| caps[1].to_string());
        if let Some(city) = destination {
            if self.origin.as_deref() != Some(city.as_str()) {
                self.destination = Some(city);
            }
        }

        if let Some(caps) = p.origin.captures(text) {
            self.origin = Some(caps[1].to_string());
        }

        if let Some(style) = HOTEL_STYLES.iter().rev().find(|s| lower.contains(*s)) {
            self.hotel_style = Some((*style).to_string());
        }

        if ["nonstop", "non-stop", "direct flight"]
            .iter()
            .any(|k| lower.contains(k))
        {
            self.nonstop = true;
        }

        for (interest, keywords) in INTERESTS {
            if keywords.iter().any(|k| lower.contains(k))
                && !self.interests.iter().any(|i| i == interest)
            {
                self.interests.push(interest.to_string());
            }
        }
    }

    /// Whether `text` names a destination, origin or trip length, which
    /// invalidates every piece of research done so far.
    pub fn reshapes_trip(text: &str) -> bool {
        let p = patterns();
        p.days.is_match(text)
            || p.week.is_match(text)
            || p.destination_before.is_match(text)
            || p.destination_after.is_match(text)
            || p.origin.is_match(text)
    }

    /// Nights of lodging needed for the trip.
    pub fn nights(&self) -> u32 {
        self.days.saturating_sub(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_goal() {
        let brief = TripBrief::parse("5-day Paris trip, $3000 budget", []);
        assert_eq!(brief.destination.as_deref(), Some("Paris"));
        assert_eq!(brief.days, 5);
        assert_eq!(brief.nights(), 4);
        assert_eq!(brief.budget, Some(3000));
        assert!(brief.hotel_style.is_none());
    }

    #[test]
    fn test_later_turns_override() {
        let brief = TripBrief::parse(
            "Plan a 5-day trip to Rome from Boston",
            ["prefer boutique hotels", "make it 3 days, budget 2,500 dollars"],
        );
        assert_eq!(brief.destination.as_deref(), Some("Rome"));
        assert_eq!(brief.origin.as_deref(), Some("Boston"));
        assert_eq!(brief.days, 3);
        assert_eq!(brief.budget, Some(2500));
        assert_eq!(brief.hotel_style.as_deref(), Some("boutique"));
    }

    #[test]
    fn test_defaults_when_unstated() {
        let brief = TripBrief::parse("somewhere warm please", []);
        assert_eq!(brief.destination, None);
        assert_eq!(brief.days, DEFAULT_DAYS);
        assert_eq!(brief.budget, None);
        assert!(!brief.nonstop);
    }

    #[test]
    fn test_nights_weeks_and_preferences() {
        let brief = TripBrief::parse(
            "A week in Tokyo",
            ["direct flight only, love museums and street food"],
        );
        assert_eq!(brief.destination.as_deref(), Some("Tokyo"));
        assert_eq!(brief.days, 7);
        assert!(brief.nonstop);
        assert_eq!(brief.interests, vec!["culture", "food"]);

        let brief = TripBrief::parse("4 nights in New York", []);
        assert_eq!(brief.destination.as_deref(), Some("New York"));
        assert_eq!(brief.days, 5);
    }

    #[test]
    fn test_reshapes_trip() {
        assert!(TripBrief::reshapes_trip("actually make it 4 days"));
        assert!(TripBrief::reshapes_trip("let's go to Lisbon instead"));
        assert!(TripBrief::reshapes_trip("flying from Chicago"));
        assert!(!TripBrief::reshapes_trip("prefer boutique hotels"));
        assert!(!TripBrief::reshapes_trip("more museums in the afternoon"));
    }
}
