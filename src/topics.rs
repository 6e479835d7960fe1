//! Keyword-based topic tagging.
//!
//! Each topic owns a list of lowercase trigger substrings. An article is
//! tagged with every topic that has at least one trigger somewhere in its
//! title or abstract. Labels come back in table order so the joined
//! `Topics` column is reproducible across runs.

/// Label used when no topic matches
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Separator used in the archive's `Topics` column
pub const TOPIC_SEPARATOR: &str = ", ";

/// Topic label → trigger substrings, in output order.
pub const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "AI/Technology",
        &["ai", "artificial intelligence", "machine learning", "technology", "algorithm", "automation", "llm", "chatgpt"],
    ),
    (
        "Assessment",
        &["assessment", "testing", "psychometric", "measurement", "validation", "cognitive ability"],
    ),
    ("Belonging", &["belonging", "connectedness", "isolation"]),
    ("Creativity", &["creativity", "innovation", "divergent thinking"]),
    ("Culture", &["culture", "climate", "norms", "values"]),
    ("Coaching", &["coaching", "mentoring", "executive coaching"]),
    (
        "Compensation/Benefits",
        &["compensation", "benefits", "pay", "salary", "reward", "remuneration"],
    ),
    ("Conflict", &["conflict", "dispute", "negotiation", "mediation", "friction"]),
    (
        "Diversity/Inclusion",
        &["diversity", "inclusion", "equity", "systemic equity", "quotas", "targets", "minority", "bias", "dei"],
    ),
    ("Job Design", &["job design", "job crafting", "job characteristics", "autonomy"]),
    ("Justice", &["justice", "fairness", "procedural justice", "distributive justice"]),
    (
        "Leadership",
        &["leadership", "leader", "manager", "supervisor", "transformational", "lmd"],
    ),
    (
        "Learning/Training",
        &["learning", "training", "development", "instruction", "skill acquisition"],
    ),
    ("Meta-Analysis", &["meta-analysis", "meta analysis", "systematic review"]),
    (
        "Motivation",
        &["motivation", "goal setting", "self-determination", "engagement"],
    ),
    (
        "Organisational Development & Design",
        &["organizational development", "organisational development", "organizational design", "change management", "od"],
    ),
    (
        "Performance/Productivity",
        &["performance", "productivity", "efficiency", "effectiveness", "task performance"],
    ),
    (
        "Personality",
        &["personality", "big five", "traits", "individual differences", "temperament"],
    ),
    (
        "Remote Work",
        &["remote work", "telecommuting", "hybrid", "work from home", "wfh", "virtual teams"],
    ),
    (
        "Rehabilitation",
        &["rehabilitation", "return to work", "recovery", "accommodation"],
    ),
    (
        "Safety",
        &["safety", "accidents", "hazards", "occupational safety", "safety climate"],
    ),
    (
        "Selection/Recruitment",
        &["selection", "recruitment", "hiring", "applicant", "interview", "resume"],
    ),
    ("Teams", &["team", "group", "teamwork", "collaboration", "shared leadership"]),
    (
        "Turnover/Burnout",
        &["turnover", "burnout", "quitting", "exhaustion", "retention", "attrition", "stress"],
    ),
    (
        "Wellbeing",
        &["wellbeing", "well-being", "health", "wellness", "mental health", "flourishing"],
    ),
];

/// Tag an article with every topic whose keywords appear in its text.
///
/// Matching is plain case-insensitive substring containment, so short
/// triggers such as `"ai"` also fire inside longer words.
pub fn assign_topics(title: &str, abstract_text: &str) -> Vec<&'static str> {
    let haystack = format!("{} {}", title, abstract_text).to_lowercase();

    let found: Vec<&'static str> = TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(topic, _)| *topic)
        .collect();

    if found.is_empty() {
        vec![UNCATEGORIZED]
    } else {
        found
    }
}

/// Join labels for the archive column.
pub fn format_topics<S: AsRef<str>>(topics: &[S]) -> String {
    let joined = topics
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(TOPIC_SEPARATOR);

    if joined.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        joined
    }
}

/// Split an archive `Topics` cell back into labels.
pub fn parse_topics(cell: &str) -> Vec<String> {
    let topics: Vec<String> = cell
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if topics.is_empty() {
        vec![UNCATEGORIZED.to_string()]
    } else {
        topics
    }
}
