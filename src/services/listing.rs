//! Lazy, paginated key listing over an [`ObjectStore`].

use crate::services::errors::{ServiceError, ServiceResult};
use crate::services::traits::ObjectStore;
use futures::stream::{self, Stream, TryStreamExt};

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Stream every key under `prefix`, following continuation tokens until the
/// listing is exhausted.
///
/// Pages are fetched on demand. The stream is finite and restartable: calling
/// this again issues a fresh listing from the first page.
pub fn list_all_keys<'a>(
    store: &'a dyn ObjectStore,
    bucket: &'a str,
    prefix: &'a str,
) -> impl Stream<Item = ServiceResult<String>> + Send + 'a {
    stream::try_unfold(Cursor::Start, move |cursor| async move {
        let token = match cursor {
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
            Cursor::Done => return Ok(None),
        };

        let page = store.list_objects(bucket, prefix, token).await?;
        let next = match page.next_continuation_token {
            Some(token) => Cursor::Next(token),
            None => Cursor::Done,
        };

        Ok::<_, ServiceError>(Some((page.keys, next)))
    })
    .map_ok(|keys| stream::iter(keys.into_iter().map(Ok::<String, ServiceError>)))
    .try_flatten()
}
