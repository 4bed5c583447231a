use crate::models::AnimeRecord;

/// Relevance scoring
///
/// A deterministic additive point system over a fixed keyword taxonomy.
/// The function is total: any record and any query produce a finite,
/// non-negative score, with no early exits.

/// A semantic category and the synonym keywords that map onto it
pub struct Category {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const GENRE_TAXONOMY: &[Category] = &[
    Category { name: "action", keywords: &["action", "fighting", "battle", "combat", "martial arts"] },
    Category { name: "adventure", keywords: &["adventure", "journey", "quest", "exploration"] },
    Category { name: "comedy", keywords: &["comedy", "funny", "humor", "hilarious", "comedic"] },
    Category { name: "drama", keywords: &["drama", "emotional", "serious", "dramatic"] },
    Category { name: "fantasy", keywords: &["fantasy", "magic", "magical", "supernatural"] },
    Category { name: "romance", keywords: &["romance", "romantic", "love", "relationship"] },
    Category { name: "scifi", keywords: &["sci-fi", "science fiction", "future", "space", "technology"] },
    Category { name: "slice of life", keywords: &["slice of life", "daily life", "realistic", "everyday"] },
    Category { name: "sports", keywords: &["sports", "athletic", "competition", "game"] },
    Category { name: "thriller", keywords: &["thriller", "suspense", "mystery", "psychological"] },
];

pub const TYPE_TAXONOMY: &[Category] = &[
    Category { name: "movie", keywords: &["movie", "film", "theatrical"] },
    Category { name: "tv", keywords: &["tv", "series", "show", "episode", "episodes"] },
    Category { name: "ova", keywords: &["ova", "special", "oav"] },
];

pub const RATING_KEYWORDS: &[&str] = &[
    "best",
    "top",
    "highest rated",
    "highly rated",
    "good",
    "great",
    "amazing",
];

pub const POPULARITY_KEYWORDS: &[&str] = &[
    "popular",
    "trending",
    "famous",
    "well known",
    "most watched",
];

/// Scoring mode; `Quick` amplifies scores for the preset suggestion phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    Normal,
    Quick,
}

/// Lower-cased whitespace query tokens, parsed once per user query and shared
/// by every cascade stage
#[derive(Debug, Clone)]
pub struct QueryTerms {
    tokens: Vec<String>,
}

impl QueryTerms {
    pub fn parse(query: &str) -> Self {
        Self {
            tokens: query
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Exact token membership, used by the quick-suggestion fallback
    pub fn contains(&self, word: &str) -> bool {
        self.tokens.iter().any(|t| t == word)
    }

    /// True when any token fuzzily matches any keyword (substring in either
    /// direction)
    fn matches_any(&self, keywords: &[&str]) -> bool {
        self.tokens
            .iter()
            .any(|t| keywords.iter().any(|k| fuzzy_match(t, k)))
    }
}

fn fuzzy_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// True when any of the record's genre strings matches the category name
/// directly, or contains one of its synonym keywords
///
/// Empty genre strings never match; everything contains the empty substring.
fn matches_category(genres: &[String], category: &Category) -> bool {
    genres.iter().filter(|g| !g.is_empty()).any(|g| {
        fuzzy_match(g, category.name) || category.keywords.iter().any(|k| g.contains(k))
    })
}

/// Computes the relevance of one record for one query
///
/// Contributions, all summed:
/// - +3 per taxonomy category the record's genres cover (query-independent)
/// - +2 per (query token, category) pair where the token is a substring of a
///   category keyword and the record covers that category
/// - +2 per release-format category named by the query that the record has
/// - a rating tier (+4 / +3 / +2) when the query asks for quality
/// - log10(members) / 2 when the query asks for popularity (0 for members 0)
///
/// In quick mode the whole accumulated score is multiplied by 1.5 when the
/// rating bonus fired with rating >= 8.0, and independently by 1.5 when the
/// popularity bonus fired with members >= 100000; both can compound.
pub fn relevance_score(anime: &AnimeRecord, terms: &QueryTerms, mode: ScoreMode) -> f64 {
    let genres: Vec<String> = anime.genres().iter().map(|g| g.to_lowercase()).collect();
    let mut score = 0.0;

    // Genre coverage, regardless of query content
    for category in GENRE_TAXONOMY {
        if matches_category(&genres, category) {
            score += 3.0;
        }
    }

    // Genre categories the query names directly
    for token in terms.tokens() {
        for category in GENRE_TAXONOMY {
            if category.keywords.iter().any(|k| k.contains(token.as_str()))
                && matches_category(&genres, category)
            {
                score += 2.0;
            }
        }
    }

    // Release format
    if let Some(kind) = anime.kind() {
        let kind = kind.to_lowercase();
        for category in TYPE_TAXONOMY {
            if terms.matches_any(category.keywords) && kind.contains(category.name) {
                score += 2.0;
            }
        }
    }

    // Rating tiers
    let wants_rating = terms.matches_any(RATING_KEYWORDS);
    let rating = anime.rating();
    if wants_rating && rating > 0.0 {
        score += if rating >= 8.5 {
            4.0
        } else if rating >= 8.0 {
            3.0
        } else if rating >= 7.5 {
            2.0
        } else {
            0.0
        };
    }

    // Popularity; members of 0 must contribute 0, not -inf
    let wants_popularity = terms.matches_any(POPULARITY_KEYWORDS);
    let members = anime.members();
    if wants_popularity && members > 0 {
        score += (members as f64).log10() / 2.0;
    }

    if mode == ScoreMode::Quick {
        if wants_rating && rating >= 8.0 {
            score *= 1.5;
        }
        if wants_popularity && members >= 100_000 {
            score *= 1.5;
        }
    }

    score
}
