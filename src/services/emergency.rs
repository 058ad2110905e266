#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyCategory {
    Cardiac,
    Respiratory,
    Neurological,
    Bleeding,
    Trauma,
    Toxicology,
    Allergic,
    MentalHealth,
}

impl EmergencyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyCategory::Cardiac => "cardiac",
            EmergencyCategory::Respiratory => "respiratory",
            EmergencyCategory::Neurological => "neurological",
            EmergencyCategory::Bleeding => "bleeding",
            EmergencyCategory::Trauma => "trauma",
            EmergencyCategory::Toxicology => "toxicology",
            EmergencyCategory::Allergic => "allergic",
            EmergencyCategory::MentalHealth => "mental_health",
        }
    }
}

pub static EMERGENCY_KEYWORDS: &[(EmergencyCategory, &[&str])] = &[
    (
        EmergencyCategory::Cardiac,
        &[
            "heart attack",
            "cardiac arrest",
            "chest pain",
            "chest tightness",
            "chest pressure",
            "crushing chest pain",
        ],
    ),
    (
        EmergencyCategory::Respiratory,
        &[
            "can't breathe",
            "cannot breathe",
            "not breathing",
            "stopped breathing",
            "difficulty breathing",
            "choking",
            "suffocating",
            "severe difficulty breathing",
        ],
    ),
    (
        EmergencyCategory::Neurological,
        &[
            "stroke",
            "face drooping",
            "sudden numbness",
            "sudden confusion",
            "sudden severe headache",
            "seizure",
            "convulsions",
            "unconscious",
            "unresponsive",
            "loss of consciousness",
            "passed out",
            "fainted and not waking",
        ],
    ),
    (
        EmergencyCategory::Bleeding,
        &[
            "severe bleeding",
            "uncontrollable bleeding",
            "won't stop bleeding",
            "hemorrhage",
            "coughing blood",
            "vomiting blood",
        ],
    ),
    (
        EmergencyCategory::Trauma,
        &[
            "severe burn",
            "major accident",
            "head injury",
            "spinal injury",
            "broken neck",
        ],
    ),
    (
        EmergencyCategory::Toxicology,
        &["poisoning", "overdose", "swallowed poison", "drug overdose"],
    ),
    (
        EmergencyCategory::Allergic,
        &[
            "anaphylaxis",
            "anaphylactic shock",
            "severe allergic reaction",
            "throat swelling",
            "tongue swelling",
        ],
    ),
    (
        EmergencyCategory::MentalHealth,
        &[
            "suicidal",
            "want to kill myself",
            "ending my life",
            "self harm",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyMatch {
    pub category: EmergencyCategory,
    pub phrase: &'static str,
}

/// Every vocabulary phrase contained in `text`, in vocabulary order.
pub fn scan(text: &str) -> Vec<EmergencyMatch> {
    let lowered = normalize(text);
    EMERGENCY_KEYWORDS
        .iter()
        .flat_map(|(category, phrases)| {
            phrases.iter().copied().map(move |phrase| EmergencyMatch {
                category: *category,
                phrase,
            })
        })
        .filter(|m| lowered.contains(m.phrase))
        .collect()
}

pub fn matched_phrases(matches: &[EmergencyMatch]) -> Vec<&'static str> {
    matches.iter().map(|m| m.phrase).collect()
}

pub fn matched_categories(matches: &[EmergencyMatch]) -> Vec<&'static str> {
    let mut categories = Vec::new();
    for m in matches {
        let name = m.category.as_str();
        if !categories.contains(&name) {
            categories.push(name);
        }
    }
    categories
}

// Curly apostrophes from mobile keyboards would otherwise defeat "can't".
fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_emergency_keywords(text: &str) -> Vec<&'static str> {
        matched_phrases(&scan(text))
    }

    #[test]
    fn test_no_match_for_routine_complaint() {
        assert!(check_emergency_keywords("I have a mild rash on my arm").is_empty());
        assert!(check_emergency_keywords("").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(check_emergency_keywords("HEART ATTACK"), vec!["heart attack"]);
        assert_eq!(check_emergency_keywords("I Think I'm Having A Seizure"), vec!["seizure"]);
    }

    #[test]
    fn test_chest_pain_and_breathing() {
        let matches = scan("I have chest pain and difficulty breathing");
        assert_eq!(matched_phrases(&matches), vec!["chest pain", "difficulty breathing"]);
        assert_eq!(matches[0].category, EmergencyCategory::Cardiac);
        assert_eq!(matches[1].category, EmergencyCategory::Respiratory);
        assert_eq!(matched_categories(&matches), vec!["cardiac", "respiratory"]);
    }

    #[test]
    fn test_overlapping_phrases_all_reported_in_order() {
        let matches = scan("possible drug overdose");
        assert_eq!(matched_phrases(&matches), vec!["overdose", "drug overdose"]);
        assert_eq!(matched_categories(&matches), vec!["toxicology"]);
    }

    #[test]
    fn test_curly_apostrophe() {
        assert_eq!(check_emergency_keywords("I can\u{2019}t breathe"), vec!["can't breathe"]);
    }

    #[test]
    fn test_every_listed_phrase_matches_in_any_casing() {
        for (_, phrases) in EMERGENCY_KEYWORDS {
            for phrase in *phrases {
                let upper = format!("help, {} right now", phrase.to_uppercase());
                assert!(
                    check_emergency_keywords(&upper).contains(phrase),
                    "missed {phrase}"
                );
            }
        }
    }

    #[test]
    fn test_every_category_is_covered() {
        let samples = [
            ("cardiac arrest", EmergencyCategory::Cardiac),
            ("he is choking", EmergencyCategory::Respiratory),
            ("she passed out", EmergencyCategory::Neurological),
            ("vomiting blood", EmergencyCategory::Bleeding),
            ("major accident on the road", EmergencyCategory::Trauma),
            ("swallowed poison", EmergencyCategory::Toxicology),
            ("anaphylaxis", EmergencyCategory::Allergic),
            ("feeling suicidal", EmergencyCategory::MentalHealth),
        ];
        for (text, category) in samples {
            assert!(scan(text).iter().any(|m| m.category == category), "{text}");
        }
    }
}
