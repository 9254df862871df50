use nw_core::Article;
use std::collections::HashSet;

/// Concatenates per-provider results in the order given.
pub fn merge<I>(batches: I) -> Vec<Article>
where
    I: IntoIterator<Item = Vec<Article>>,
{
    batches.into_iter().flatten().collect()
}

/// Keeps the first article for each identity key and drops keyless ones.
pub fn dedup(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| match article.identity_key() {
            Some(key) => seen.insert(key.to_string()),
            None => false,
        })
        .collect()
}

/// Newest first. The sort is stable, so equal timestamps keep input order.
pub fn sort_by_recency(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Merge, dedup and sort in one pass over provider results.
pub fn combine<I>(batches: I) -> Vec<Article>
where
    I: IntoIterator<Item = Vec<Article>>,
{
    let mut articles = dedup(merge(batches));
    sort_by_recency(&mut articles);
    articles
}
