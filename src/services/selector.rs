use crate::models::{AnimeRecord, Recommendation};
use crate::services::scorer::{self, QueryTerms, ScoreMode};

/// Recommendation selection
///
/// Runs a three-stage cascade over the whole catalog, widening the matching
/// criteria only when the prior stage produced nothing. Query tokens are
/// parsed once up front and shared by every stage.

/// Preset phrases that trigger quick-mode scoring on an exact,
/// case-insensitive match
pub const QUICK_SUGGESTIONS: [&str; 4] = [
    "Popular action anime",
    "Best romance movies",
    "Highly rated series",
    "Comedy shows",
];

pub const MAX_RECOMMENDATIONS: usize = 5;

pub fn is_quick_suggestion(query: &str) -> bool {
    QUICK_SUGGESTIONS
        .iter()
        .any(|phrase| phrase.eq_ignore_ascii_case(query))
}

/// Selects up to five records for the query
///
/// Stage 1 scores everything with the full taxonomy (quick mode for the
/// preset phrases). Stage 2 falls back to bare genre-substring counting.
/// Stage 3, for quick phrases only, filters on the phrase's intent. An empty
/// result from all stages means "no results", not an error.
pub fn select(catalog: &[AnimeRecord], query: &str) -> Vec<Recommendation> {
    let terms = QueryTerms::parse(query);
    let quick = is_quick_suggestion(query);
    let mode = if quick { ScoreMode::Quick } else { ScoreMode::Normal };

    let primary = rank(catalog, |anime| scorer::relevance_score(anime, &terms, mode));
    if !primary.is_empty() {
        return primary;
    }

    tracing::debug!(query = %query, "Primary pass empty, trying genre-only fallback");

    let genre_only = rank(catalog, |anime| genre_token_score(anime, &terms));
    if !genre_only.is_empty() {
        return genre_only;
    }

    if quick {
        tracing::debug!(query = %query, "Genre fallback empty, using quick-suggestion fallback");
        return quick_fallback(catalog, &terms);
    }

    Vec::new()
}

/// Scores every record, keeps positive scores, sorts descending and caps the
/// result. The sort is stable, so exact ties keep catalog order.
fn rank<F>(catalog: &[AnimeRecord], score_fn: F) -> Vec<Recommendation>
where
    F: Fn(&AnimeRecord) -> f64,
{
    let mut scored: Vec<(f64, &AnimeRecord)> = catalog
        .iter()
        .map(|anime| (score_fn(anime), anime))
        .filter(|(score, _)| *score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(MAX_RECOMMENDATIONS);

    scored
        .into_iter()
        .map(|(score, anime)| Recommendation {
            anime: anime.clone(),
            score: Some(score),
        })
        .collect()
}

/// Lenient fallback score: two points per genre string containing any query
/// token, no taxonomy expansion
fn genre_token_score(anime: &AnimeRecord, terms: &QueryTerms) -> f64 {
    let hits = anime
        .genres()
        .iter()
        .filter(|genre| {
            let genre = genre.to_lowercase();
            terms.tokens().iter().any(|token| genre.contains(token.as_str()))
        })
        .count();

    (hits * 2) as f64
}

/// Last-resort results for the preset phrases, keyed off the phrase intent.
/// These records were never scored, so they carry no relevance score.
fn quick_fallback(catalog: &[AnimeRecord], terms: &QueryTerms) -> Vec<Recommendation> {
    let mut picked: Vec<&AnimeRecord> = if terms.contains("popular") {
        let mut popular: Vec<&AnimeRecord> = catalog
            .iter()
            .filter(|anime| anime.members() >= 100_000)
            .collect();
        popular.sort_by(|a, b| b.members().cmp(&a.members()));
        popular
    } else if terms.contains("best") || terms.contains("highly") {
        let mut rated: Vec<&AnimeRecord> = catalog
            .iter()
            .filter(|anime| anime.rating() >= 8.0)
            .collect();
        rated.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
        rated
    } else {
        catalog.iter().collect()
    };

    picked.truncate(MAX_RECOMMENDATIONS);
    picked
        .into_iter()
        .map(|anime| Recommendation {
            anime: anime.clone(),
            score: None,
        })
        .collect()
}
