use crate::{
    error::{AppError, AppResult},
    models::{AnimeRecord, CatalogEntry, DescriptiveEntry, Episodes},
};

/// Catalog loading
///
/// Two heterogeneous text sources feed one unified in-memory record list:
/// a comma-delimited catalog with a header row, and a pipe-delimited
/// descriptive list without one. Rows that cannot be parsed are dropped
/// whole and logged; they never produce half-populated records.

const TITLE_PLACEHOLDER: &str = "Unknown Title";
const GENRE_PLACEHOLDER: &str = "Unspecified";

/// Loads both sources from disk and combines them
///
/// Failure to read either file aborts catalog population; the caller keeps
/// serving and renders the load-error message instead of recommendations.
pub async fn load_from_files(
    catalog_path: &str,
    descriptive_path: &str,
) -> AppResult<Vec<AnimeRecord>> {
    let catalog_raw = tokio::fs::read_to_string(catalog_path).await.map_err(|e| {
        AppError::CatalogLoad(format!("failed to read {}: {}", catalog_path, e))
    })?;
    let descriptive_raw = tokio::fs::read_to_string(descriptive_path)
        .await
        .map_err(|e| {
            AppError::CatalogLoad(format!("failed to read {}: {}", descriptive_path, e))
        })?;

    let records = combine(&catalog_raw, &descriptive_raw);

    tracing::info!(records = records.len(), "Catalog loaded");

    Ok(records)
}

/// Parses both raw blobs into one ordered record list
///
/// All catalog-source records come first in source order, followed by all
/// descriptive-source records in source order. Plain concatenation, no merge.
pub fn combine(catalog_raw: &str, descriptive_raw: &str) -> Vec<AnimeRecord> {
    let mut records = parse_catalog(catalog_raw);
    records.extend(parse_descriptive(descriptive_raw));
    records
}

/// Parses the comma-delimited catalog source
///
/// Field order: id, title, genre list (possibly quoted), type, episodes,
/// rating, members. The first line is a header and is skipped.
pub fn parse_catalog(raw: &str) -> Vec<AnimeRecord> {
    raw.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(number, line)| match parse_catalog_line(line) {
            Some(entry) => Some(AnimeRecord::Catalog(entry)),
            None => {
                tracing::warn!(line = number + 1, "Skipping malformed catalog row");
                None
            }
        })
        .collect()
}

/// Parses the pipe-delimited descriptive source: title|genres|description
pub fn parse_descriptive(raw: &str) -> Vec<AnimeRecord> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(number, line)| match parse_descriptive_line(line) {
            Some(entry) => Some(AnimeRecord::Descriptive(entry)),
            None => {
                tracing::warn!(line = number + 1, "Skipping malformed descriptive row");
                None
            }
        })
        .collect()
}

fn parse_catalog_line(line: &str) -> Option<CatalogEntry> {
    let fields = split_delimited(line, ',');
    let [id, title, genre, kind, episodes, rating, members]: [String; 7] =
        fields.try_into().ok()?;

    let episodes = if episodes == "Unknown" {
        Episodes::Ongoing
    } else {
        Episodes::Count(episodes)
    };

    Some(CatalogEntry {
        id,
        title: or_placeholder(title, TITLE_PLACEHOLDER),
        genres: split_genres(&genre),
        kind: or_placeholder(kind, "Unknown"),
        episodes,
        rating: parse_rating(&rating)?,
        members: parse_members(&members)?,
    })
}

fn parse_descriptive_line(line: &str) -> Option<DescriptiveEntry> {
    let mut parts = line.splitn(3, '|');
    let title = parts.next()?.trim().to_string();
    let genres = parts.next()?.trim();
    let description = parts.next()?.trim().to_string();

    Some(DescriptiveEntry {
        title: or_placeholder(title, TITLE_PLACEHOLDER),
        genres: split_genres(genres),
        description,
    })
}

/// Splits one row on the delimiter, keeping delimiters inside double quotes
/// as part of the field
fn split_delimited(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
            current.push(c);
        } else if c == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Strips surrounding quotes from a genre field, then splits on commas
fn split_genres(field: &str) -> Vec<String> {
    let genres: Vec<String> = field
        .trim()
        .trim_matches('"')
        .split(',')
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();

    if genres.is_empty() {
        vec![GENRE_PLACEHOLDER.to_string()]
    } else {
        genres
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

/// An empty rating field means "no rating" and becomes 0; a non-empty field
/// that is not a finite number marks the row malformed
fn parse_rating(field: &str) -> Option<f64> {
    if field.is_empty() {
        return Some(0.0);
    }
    field
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(0.0, 10.0))
}

/// Same policy as ratings: empty means 0, garbage drops the row
fn parse_members(field: &str) -> Option<u64> {
    if field.is_empty() {
        return Some(0);
    }
    field.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
anime_id,name,genre,type,episodes,rating,members
20,Naruto,\"Action, Comedy, Shounen\",TV,220,7.81,683297
5114,Fullmetal Alchemist: Brotherhood,\"Action, Adventure\",TV,64,9.26,793665
199,Spirited Away,Adventure,Movie,1,8.93,466254
999,Airing Show,Drama,TV,Unknown,8.1,120000
";

    const DESCRIPTIVE: &str = "\
Mushishi|Mystery, Slice of Life|A wanderer studies strange lifeforms.
Barakamon|Comedy, Slice of Life|A calligrapher moves to a remote island.
";

    #[test]
    fn test_parse_catalog_well_formed() {
        let records = parse_catalog(CATALOG);
        assert_eq!(records.len(), 4);

        for record in &records {
            assert!(!record.title().is_empty());
            assert!(!record.genres().is_empty());
            assert!(record.rating() >= 0.0 && record.rating() <= 10.0);
        }

        match &records[0] {
            AnimeRecord::Catalog(entry) => {
                assert_eq!(entry.id, "20");
                assert_eq!(entry.title, "Naruto");
                assert_eq!(
                    entry.genres,
                    vec!["Action".to_string(), "Comedy".to_string(), "Shounen".to_string()]
                );
                assert_eq!(entry.kind, "TV");
                assert_eq!(entry.episodes, Episodes::Count("220".to_string()));
                assert_eq!(entry.rating, 7.81);
                assert_eq!(entry.members, 683297);
            }
            other => panic!("expected catalog record, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_episodes_become_ongoing() {
        let records = parse_catalog(CATALOG);
        match &records[3] {
            AnimeRecord::Catalog(entry) => assert_eq!(entry.episodes, Episodes::Ongoing),
            other => panic!("expected catalog record, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_rows_are_dropped_whole() {
        let raw = "\
anime_id,name,genre,type,episodes,rating,members
1,Good Show,Action,TV,12,8.0,1000
2,Too Few Fields,Action,TV
3,Bad Rating,Action,TV,12,not-a-number,1000
4,Bad Members,Action,TV,12,8.0,minus-five
5,Another Good Show,Comedy,Movie,1,7.0,500
";
        let records = parse_catalog(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title(), "Good Show");
        assert_eq!(records[1].title(), "Another Good Show");
    }

    #[test]
    fn test_empty_numeric_fields_default_to_zero() {
        let raw = "\
anime_id,name,genre,type,episodes,rating,members
1,No Stats,Action,TV,12,,
";
        let records = parse_catalog(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rating(), 0.0);
        assert_eq!(records[0].members(), 0);
    }

    #[test]
    fn test_missing_title_and_genre_placeholders() {
        let raw = "\
anime_id,name,genre,type,episodes,rating,members
1,,,,,7.5,100
";
        let records = parse_catalog(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Unknown Title");
        assert_eq!(records[0].genres(), ["Unspecified".to_string()]);
        assert_eq!(records[0].kind(), Some("Unknown"));
    }

    #[test]
    fn test_rating_clamped_to_range() {
        let raw = "\
anime_id,name,genre,type,episodes,rating,members
1,Over,Action,TV,12,11.5,100
";
        let records = parse_catalog(raw);
        assert_eq!(records[0].rating(), 10.0);
    }

    #[test]
    fn test_parse_descriptive() {
        let records = parse_descriptive(DESCRIPTIVE);
        assert_eq!(records.len(), 2);

        match &records[0] {
            AnimeRecord::Descriptive(entry) => {
                assert_eq!(entry.title, "Mushishi");
                assert_eq!(
                    entry.genres,
                    vec!["Mystery".to_string(), "Slice of Life".to_string()]
                );
                assert_eq!(entry.description, "A wanderer studies strange lifeforms.");
            }
            other => panic!("expected descriptive record, got {:?}", other),
        }
    }

    #[test]
    fn test_descriptive_wrong_field_count_dropped() {
        let records = parse_descriptive("Only A Title|Action\nValid|Action|Some text\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Valid");
    }

    #[test]
    fn test_combine_orders_catalog_before_descriptive() {
        let records = combine(CATALOG, DESCRIPTIVE);
        assert_eq!(records.len(), 6);
        assert!(matches!(records[0], AnimeRecord::Catalog(_)));
        assert!(matches!(records[3], AnimeRecord::Catalog(_)));
        assert!(matches!(records[4], AnimeRecord::Descriptive(_)));
        assert_eq!(records[4].title(), "Mushishi");
    }

    #[test]
    fn test_loader_is_deterministic() {
        let first = combine(CATALOG, DESCRIPTIVE);
        let second = combine(CATALOG, DESCRIPTIVE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let raw = "header\n\n1,Show,Action,TV,12,8.0,100\n   \n";
        let records = parse_catalog(raw);
        assert_eq!(records.len(), 1);
    }
}
