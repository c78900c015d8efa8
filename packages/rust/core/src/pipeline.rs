//! End-to-end card pipeline: locate → extract → order → assemble.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use blogcards_shared::{BlogCardsError, CardsConfig, FailurePolicy, MarkupParser, Node, Result};

use crate::assembler::{Limit, assemble};
use crate::extractor::{ExtractedDocument, extract};
use crate::locator::locate;
use crate::ordering::order_documents;

/// Inputs for one card run.
#[derive(Debug, Clone)]
pub struct CardsRequest {
    /// Site root that the post pattern is resolved against.
    pub root: PathBuf,
    /// Limit, pattern, ordering, and failure policy.
    pub cards: CardsConfig,
}

impl CardsRequest {
    /// Request for `root` with default card settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cards: CardsConfig::default(),
        }
    }
}

/// Run the card pipeline sequentially.
///
/// 1. Locate post sources (lexical path order)
/// 2. Extract each post's frontmatter and inline fragments
/// 3. Apply the configured ordering
/// 4. Assemble cards and keep the first `limit`
///
/// Every located post is extracted before truncation, so under
/// [`FailurePolicy::FailFast`] a bad post anywhere fails the run.
#[instrument(skip_all, fields(root = %request.root.display(), limit = request.cards.limit))]
pub fn collect_cards(parser: &dyn MarkupParser, request: &CardsRequest) -> Result<Vec<Node>> {
    let start = Instant::now();
    let sources = locate(&request.root, &request.cards.pattern)?;
    let total = sources.len();

    let mut extracted = Vec::with_capacity(total);
    for source in sources {
        let path = source.path.clone();
        match extract(parser, source) {
            Ok(document) => extracted.push(document),
            Err(e) => admit_failure(request.cards.on_error, &path, e)?,
        }
    }

    let cards = finish(extracted, &request.cards);
    info!(
        located = total,
        cards = cards.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "card pipeline complete"
    );
    Ok(cards)
}

/// Run the card pipeline with extraction spread over the blocking pool.
///
/// At most `cards.concurrency` posts are read and parsed at once. Results
/// are put back into path order before failures are handled, so the output
/// (and the error returned under fail-fast) matches [`collect_cards`].
#[instrument(skip_all, fields(root = %request.root.display(), limit = request.cards.limit))]
pub async fn collect_cards_concurrent(
    parser: Arc<dyn MarkupParser>,
    request: &CardsRequest,
) -> Result<Vec<Node>> {
    let start = Instant::now();
    let sources = locate(&request.root, &request.cards.pattern)?;
    let total = sources.len();

    let semaphore = Arc::new(Semaphore::new(request.cards.concurrency.max(1) as usize));
    let mut tasks = JoinSet::new();

    for (index, source) in sources.into_iter().enumerate() {
        let parser = Arc::clone(&parser);
        let sem = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let path = source.path.clone();
            let outcome = match sem.acquire_owned().await {
                Ok(_permit) => tokio::task::spawn_blocking(move || extract(&*parser, source))
                    .await
                    .unwrap_or_else(|e| {
                        Err(BlogCardsError::validation(format!(
                            "extraction task for {path} failed: {e}"
                        )))
                    }),
                Err(e) => Err(BlogCardsError::validation(format!(
                    "extraction slot unavailable: {e}"
                ))),
            };
            (index, path, outcome)
        });
    }

    let mut slots: Vec<Option<(String, Result<ExtractedDocument>)>> =
        (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, path, outcome) = joined
            .map_err(|e| BlogCardsError::validation(format!("extraction task failed: {e}")))?;
        slots[index] = Some((path, outcome));
    }

    let mut extracted = Vec::with_capacity(total);
    for (path, outcome) in slots.into_iter().flatten() {
        match outcome {
            Ok(document) => extracted.push(document),
            Err(e) => admit_failure(request.cards.on_error, &path, e)?,
        }
    }

    let cards = finish(extracted, &request.cards);
    info!(
        located = total,
        cards = cards.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "concurrent card pipeline complete"
    );
    Ok(cards)
}

/// Apply the failure policy to one failed post.
fn admit_failure(policy: FailurePolicy, path: &str, err: BlogCardsError) -> Result<()> {
    match policy {
        FailurePolicy::FailFast => Err(err),
        FailurePolicy::Skip => {
            warn!(path, error = %err, "skipping post");
            Ok(())
        }
    }
}

fn finish(mut extracted: Vec<ExtractedDocument>, cards: &CardsConfig) -> Vec<Node> {
    order_documents(&mut extracted, cards.order);
    assemble(&extracted, Limit::new(cards.limit))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::testing::{RejectingParser, post, write_post};
    use blogcards_markdown::CommonMarkParser;
    use blogcards_shared::{SortOrder, kind};

    fn request(root: &Path, limit: i64) -> CardsRequest {
        let mut request = CardsRequest::new(root);
        request.cards.limit = limit;
        request
    }

    fn scenario_site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "posts/a.md",
            &post(&[("title", "A"), ("date", "2024-01-01")], "First.\n"),
        );
        write_post(dir.path(), "posts/b.md", &post(&[("title", "B")], "Second.\n"));
        write_post(
            dir.path(),
            "posts/c.md",
            &post(&[("title", "C"), ("subtitle", "sub")], "Third.\n"),
        );
        dir
    }

    fn urls(cards: &[Node]) -> Vec<&str> {
        cards.iter().filter_map(|c| c.url.as_deref()).collect()
    }

    #[test]
    fn three_posts_limit_two() {
        let site = scenario_site();
        let cards = collect_cards(&CommonMarkParser::new(), &request(site.path(), 2)).unwrap();

        assert_eq!(urls(&cards), vec!["/posts/a", "/posts/b"]);

        let a = &cards[0];
        assert!(a.is(kind::CARD));
        assert_eq!(a.children[0].text_content(), "A");
        let footer = a.children.last().unwrap();
        assert!(footer.is(kind::FOOTER));
        assert_eq!(footer.text_content(), "Date: 2024-01-01");

        let b = &cards[1];
        assert_eq!(b.children.len(), 1);
        assert!(b.children.iter().all(|n| !n.is(kind::FOOTER)));
    }

    #[test]
    fn card_blocks_keep_field_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "posts/a.md",
            &post(&[("subtitle", "A *tour*"), ("description", "Things")], "# Lifted\n"),
        );

        let cards = collect_cards(&CommonMarkParser::new(), &request(dir.path(), 1)).unwrap();
        let kinds: Vec<&str> = cards[0].children.iter().map(|n| n.kind.as_str()).collect();
        assert_eq!(kinds, vec!["cardTitle", "paragraph", "paragraph"]);
        assert_eq!(cards[0].children[0].text_content(), "Lifted");
        assert_eq!(cards[0].children[1].text_content(), "A tour");
        assert_eq!(cards[0].children[2].text_content(), "Things");
    }

    #[test]
    fn default_limit_is_three() {
        let site = scenario_site();
        write_post(site.path(), "posts/d.md", &post(&[("title", "D")], ""));

        let cards = collect_cards(&CommonMarkParser::new(), &CardsRequest::new(site.path())).unwrap();
        assert_eq!(urls(&cards), vec!["/posts/a", "/posts/b", "/posts/c"]);
    }

    #[test]
    fn zero_and_negative_limits_are_empty() {
        let site = scenario_site();
        let parser = CommonMarkParser::new();
        assert!(collect_cards(&parser, &request(site.path(), 0)).unwrap().is_empty());
        assert!(collect_cards(&parser, &request(site.path(), -3)).unwrap().is_empty());
    }

    #[test]
    fn no_posts_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let cards = collect_cards(&CommonMarkParser::new(), &request(dir.path(), 3)).unwrap();
        assert!(cards.is_empty());
    }

    #[test]
    fn output_is_deterministic() {
        let site = scenario_site();
        let parser = CommonMarkParser::new();
        let first = serde_json::to_string(&collect_cards(&parser, &request(site.path(), 3)).unwrap())
            .unwrap();
        let second =
            serde_json::to_string(&collect_cards(&parser, &request(site.path(), 3)).unwrap())
                .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn bad_post_fails_whole_batch_by_default() {
        let site = scenario_site();
        write_post(site.path(), "posts/z.md", "---\ntitle: [broken\n---\n");

        // The broken post sorts last and would be truncated away, yet it
        // still fails the run.
        let err = collect_cards(&CommonMarkParser::new(), &request(site.path(), 1)).unwrap_err();
        assert!(matches!(err, BlogCardsError::Parse { .. }));
        assert!(err.to_string().contains("posts/z.md"));
    }

    #[test]
    fn skip_policy_drops_bad_posts() {
        let site = scenario_site();
        write_post(site.path(), "posts/aa.md", "---\ntitle: [broken\n---\n");

        let mut req = request(site.path(), 3);
        req.cards.on_error = FailurePolicy::Skip;

        let cards = collect_cards(&CommonMarkParser::new(), &req).unwrap();
        assert_eq!(urls(&cards), vec!["/posts/a", "/posts/b", "/posts/c"]);
    }

    #[test]
    fn parser_failure_respects_policy() {
        let site = scenario_site();
        let parser = RejectingParser { marker: "Second." };

        let err = collect_cards(&parser, &request(site.path(), 3)).unwrap_err();
        assert!(err.to_string().contains("posts/b.md"));

        let mut req = request(site.path(), 3);
        req.cards.on_error = FailurePolicy::Skip;
        let cards = collect_cards(&parser, &req).unwrap();
        assert_eq!(urls(&cards), vec!["/posts/a", "/posts/c"]);
    }

    #[test]
    fn date_order_puts_dated_posts_first() {
        let site = scenario_site();
        write_post(
            site.path(),
            "posts/d.md",
            &post(&[("title", "D"), ("date", "2025-06-30")], ""),
        );

        let mut req = request(site.path(), 2);
        req.cards.order = SortOrder::DeclaredDate;
        let cards = collect_cards(&CommonMarkParser::new(), &req).unwrap();
        assert_eq!(urls(&cards), vec!["/posts/d", "/posts/a"]);
    }

    #[tokio::test]
    async fn concurrent_matches_sequential() {
        let site = scenario_site();
        for name in ["d", "e", "f", "g"] {
            write_post(
                site.path(),
                &format!("posts/{name}.md"),
                &post(&[("title", name), ("description", "'*more*'")], ""),
            );
        }

        let mut req = request(site.path(), 5);
        req.cards.concurrency = 3;

        let sequential = collect_cards(&CommonMarkParser::new(), &req).unwrap();
        let parser: Arc<dyn MarkupParser> = Arc::new(CommonMarkParser::new());
        let concurrent = collect_cards_concurrent(parser, &req).await.unwrap();

        assert_eq!(sequential, concurrent);
        assert_eq!(
            urls(&concurrent),
            vec!["/posts/a", "/posts/b", "/posts/c", "/posts/d", "/posts/e"]
        );
    }

    #[tokio::test]
    async fn concurrent_reports_first_failure_in_path_order() {
        let site = scenario_site();
        write_post(site.path(), "posts/x.md", "---\ntitle: [broken\n---\n");
        write_post(site.path(), "posts/y.md", "---\ntitle: [broken\n---\n");

        let parser: Arc<dyn MarkupParser> = Arc::new(CommonMarkParser::new());
        let err = collect_cards_concurrent(parser, &request(site.path(), 3))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("posts/x.md"));
    }

    #[tokio::test]
    async fn concurrent_empty_site() {
        let dir = tempfile::tempdir().unwrap();
        let parser: Arc<dyn MarkupParser> = Arc::new(CommonMarkParser::new());
        let cards = collect_cards_concurrent(parser, &request(dir.path(), 3))
            .await
            .unwrap();
        assert!(cards.is_empty());
    }
}
