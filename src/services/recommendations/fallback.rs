use std::collections::{HashMap, HashSet};

use crate::{
    error::AppResult,
    models::{MovieId, WatchEntry},
    services::providers::CatalogReader,
};

/// Merges neighbor outputs into one deduplicated list
///
/// Neighbors are visited in rank order and each neighbor's items in its own
/// order; the first occurrence of a movie wins.
pub fn merge_candidates(results: Vec<Vec<MovieId>>) -> Vec<MovieId> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .flatten()
        .filter(|movie_id| seen.insert(*movie_id))
        .collect()
}

/// Most frequent genre token across `entries`
///
/// Ties go to the token encountered first. Entries without a genre
/// contribute nothing.
pub fn top_genre(entries: &[WatchEntry]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for token in entries.iter().flat_map(|entry| entry.genre_tokens()) {
        let count = counts.entry(token).or_insert_with(|| {
            order.push(token);
            0
        });
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for token in order {
        let count = counts[token];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((token, count));
        }
    }

    best.map(|(token, _)| token.to_string())
}

/// Catalog movies sharing the user's most watched genre
///
/// `entries` are the target user's own watch entries. Already watched movies
/// are skipped and catalog order is kept.
pub async fn genre_affinity(
    catalog: &dyn CatalogReader,
    entries: &[WatchEntry],
    limit: usize,
) -> AppResult<Vec<MovieId>> {
    let Some(genre) = top_genre(entries) else {
        return Ok(Vec::new());
    };

    let watched: HashSet<MovieId> = entries.iter().map(|e| e.movie_id).collect();
    let candidates = catalog.movies_by_genre_substring(&genre).await?;

    let picked: Vec<MovieId> = candidates
        .into_iter()
        .filter(|movie_id| !watched.contains(movie_id))
        .take(limit)
        .collect();

    tracing::debug!(genre = %genre, candidates = picked.len(), "Genre affinity");

    Ok(picked)
}

/// Highest rated, most recent movies in the catalog
pub async fn popularity(catalog: &dyn CatalogReader, limit: usize) -> AppResult<Vec<MovieId>> {
    catalog.top_rated_recent(limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockCatalogReader;

    fn entry(movie_id: MovieId, genre: Option<&str>) -> WatchEntry {
        WatchEntry::new(1, movie_id, "", genre)
    }

    #[test]
    fn test_merge_dedups_keeping_first() {
        let merged = merge_candidates(vec![vec![3, 1], vec![1, 4], vec![], vec![4, 5, 3]]);
        assert_eq!(merged, vec![3, 1, 4, 5]);
    }

    #[test]
    fn test_top_genre_counts_tokens() {
        let entries = vec![entry(1, Some("Action, Drama")), entry(2, Some("Action"))];
        assert_eq!(top_genre(&entries), Some("Action".to_string()));
    }

    #[test]
    fn test_top_genre_tie_goes_to_first_seen() {
        let entries = vec![entry(1, Some("Drama, Comedy")), entry(2, Some("Comedy, Drama"))];
        assert_eq!(top_genre(&entries), Some("Drama".to_string()));
    }

    #[test]
    fn test_top_genre_later_token_can_win() {
        let entries = vec![
            entry(1, Some("Drama")),
            entry(2, Some("Horror")),
            entry(3, Some("Horror")),
        ];
        assert_eq!(top_genre(&entries), Some("Horror".to_string()));
    }

    #[test]
    fn test_top_genre_without_genres() {
        assert_eq!(top_genre(&[]), None);
        assert_eq!(top_genre(&[entry(1, None), entry(2, Some(" , "))]), None);
    }

    #[tokio::test]
    async fn test_genre_affinity_excludes_watched() {
        let mut catalog = MockCatalogReader::new();
        catalog
            .expect_movies_by_genre_substring()
            .withf(|token| token == "Action")
            .times(1)
            .returning(|_| Ok(vec![1, 3, 4, 2]));

        let entries = vec![entry(1, Some("Action, Drama")), entry(2, Some("Action"))];
        let result = genre_affinity(&catalog, &entries, 5).await.unwrap();

        assert_eq!(result, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_genre_affinity_respects_limit() {
        let mut catalog = MockCatalogReader::new();
        catalog
            .expect_movies_by_genre_substring()
            .returning(|_| Ok((100..120).collect()));

        let entries = vec![entry(1, Some("Sci-Fi"))];
        let result = genre_affinity(&catalog, &entries, 5).await.unwrap();

        assert_eq!(result, vec![100, 101, 102, 103, 104]);
    }

    #[tokio::test]
    async fn test_genre_affinity_without_tokens_skips_catalog() {
        let mut catalog = MockCatalogReader::new();
        catalog.expect_movies_by_genre_substring().times(0);

        let result = genre_affinity(&catalog, &[entry(1, None)], 5).await.unwrap();
        assert!(result.is_empty());

        let result = genre_affinity(&catalog, &[], 5).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_genre_affinity_propagates_catalog_failure() {
        let mut catalog = MockCatalogReader::new();
        catalog
            .expect_movies_by_genre_substring()
            .returning(|_| Err(AppError::Internal("catalog down".to_string())));

        let result = genre_affinity(&catalog, &[entry(1, Some("Action"))], 5).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_popularity_asks_for_limit() {
        let mut catalog = MockCatalogReader::new();
        catalog
            .expect_top_rated_recent()
            .withf(|limit| *limit == 5)
            .times(1)
            .returning(|_| Ok(vec![9, 8, 7, 6, 5]));

        assert_eq!(popularity(&catalog, 5).await.unwrap(), vec![9, 8, 7, 6, 5]);
    }
}
