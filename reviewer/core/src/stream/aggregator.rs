//! Fragment types and the fail-fast fold over them.

use futures::{Stream, StreamExt};
use thiserror::Error;

/// Failure reported by the upstream producer in the middle of a stream
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StreamError {
    message: String,
}

impl StreamError {
    /// Create a stream error with a human-readable message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The upstream message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One incremental piece of a streamed response
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// A piece of generated text; may be empty
    Text(String),
    /// Terminal failure; the producer sends nothing after this
    Error(StreamError),
}

impl Fragment {
    /// Convenience constructor for a text fragment
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Convenience constructor for an error fragment
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(StreamError::new(message))
    }
}

/// Why aggregation produced no text
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The upstream producer failed mid-stream
    #[error("failed to generate content: {0}")]
    Stream(#[from] StreamError),

    /// The stream ended cleanly but carried no text at all
    #[error("no content generated")]
    NoContent,
}

/// Accumulator shared by the sync and async folds
#[derive(Default)]
struct Accumulator {
    text: String,
}

impl Accumulator {
    /// Feed one fragment; `Err` means stop consuming
    fn push(&mut self, fragment: Fragment) -> Result<(), StreamError> {
        match fragment {
            Fragment::Text(text) => {
                if !text.is_empty() {
                    self.text.push_str(&text);
                }
                Ok(())
            }
            Fragment::Error(err) => Err(err),
        }
    }

    fn finish(self) -> Result<String, GenerationError> {
        if self.text.is_empty() {
            Err(GenerationError::NoContent)
        } else {
            Ok(self.text)
        }
    }
}

/// Fold an ordered sequence of fragments into one response.
///
/// Text is concatenated in arrival order with no separators. The first
/// error fragment ends consumption and is returned; any text gathered
/// before it is discarded. A clean sequence with no text at all yields
/// [`GenerationError::NoContent`].
///
/// # Errors
///
/// [`GenerationError::Stream`] for the first error fragment,
/// [`GenerationError::NoContent`] for an empty result.
pub fn aggregate<I>(fragments: I) -> Result<String, GenerationError>
where
    I: IntoIterator<Item = Fragment>,
{
    let mut acc = Accumulator::default();
    for fragment in fragments {
        acc.push(fragment)?;
    }
    acc.finish()
}

/// Async counterpart of [`aggregate`] for fragments arriving over a stream.
///
/// # Errors
///
/// Same as [`aggregate`].
pub async fn aggregate_stream<S>(fragments: S) -> Result<String, GenerationError>
where
    S: Stream<Item = Fragment>,
{
    let mut acc = Accumulator::default();
    let mut fragments = std::pin::pin!(fragments);
    let mut count = 0usize;

    while let Some(fragment) = fragments.next().await {
        count += 1;
        if let Err(err) = acc.push(fragment) {
            tracing::debug!(fragments = count, error = %err, "stream failed");
            return Err(err.into());
        }
    }

    tracing::debug!(fragments = count, chars = acc.text.len(), "stream complete");
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(parts: &[&str]) -> Vec<Fragment> {
        parts.iter().map(|p| Fragment::text(*p)).collect()
    }

    #[test]
    fn test_concatenates_in_order_without_separators() {
        let result = aggregate(texts(&["Hello", " world"]));
        assert_eq!(result, Ok("Hello world".to_string()));
    }

    #[test]
    fn test_preserves_embedded_boundaries() {
        let result = aggregate(texts(&["## Title\n", "\n", "- item", "\n"]));
        assert_eq!(result, Ok("## Title\n\n- item\n".to_string()));
    }

    #[test]
    fn test_error_discards_preceding_text() {
        let mut fragments = texts(&["Hello", " wor"]);
        fragments.push(Fragment::error("quota exceeded"));

        let result = aggregate(fragments);
        assert_eq!(
            result,
            Err(GenerationError::Stream(StreamError::new("quota exceeded")))
        );
    }

    #[test]
    fn test_stops_consuming_at_first_error() {
        let mut consumed = 0;
        let fragments = vec![
            Fragment::text("a"),
            Fragment::error("first"),
            Fragment::error("second"),
            Fragment::text("b"),
        ]
        .into_iter()
        .inspect(|_| consumed += 1);

        let result = aggregate(fragments);
        assert_eq!(
            result,
            Err(GenerationError::Stream(StreamError::new("first")))
        );
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_empty_sequence_is_no_content() {
        assert_eq!(aggregate(Vec::new()), Err(GenerationError::NoContent));
    }

    #[test]
    fn test_blank_fragments_are_no_content() {
        assert_eq!(
            aggregate(texts(&["", "", ""])),
            Err(GenerationError::NoContent)
        );
    }

    #[test]
    fn test_empty_fragments_are_skipped() {
        assert_eq!(aggregate(texts(&["", "ok", ""])), Ok("ok".to_string()));
    }

    #[test]
    fn test_whitespace_counts_as_content() {
        assert_eq!(aggregate(texts(&[" "])), Ok(" ".to_string()));
    }

    #[test]
    fn test_stream_fold_matches_iterator_fold() {
        let fragments = texts(&["Report", " ", "OK"]);
        let result =
            tokio_test::block_on(aggregate_stream(futures::stream::iter(fragments.clone())));
        assert_eq!(result, aggregate(fragments));
    }

    #[tokio::test]
    async fn test_stream_fold_over_channel() {
        let (tx, rx) = tokio::sync::mpsc::channel(8);
        tokio::spawn(async move {
            for part in ["Hel", "lo"] {
                tx.send(Fragment::text(part)).await.unwrap();
            }
            tx.send(Fragment::error("connection reset")).await.unwrap();
        });

        let result = aggregate_stream(tokio_stream::wrappers::ReceiverStream::new(rx)).await;
        assert_eq!(
            result,
            Err(GenerationError::Stream(StreamError::new("connection reset")))
        );
    }

    #[test]
    fn test_error_display_distinguishes_kinds() {
        let stream = GenerationError::Stream(StreamError::new("boom"));
        assert_eq!(stream.to_string(), "failed to generate content: boom");
        assert_eq!(GenerationError::NoContent.to_string(), "no content generated");
    }
}
