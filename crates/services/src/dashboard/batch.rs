use std::collections::HashSet;
use std::future::Future;

use bson::oid::ObjectId;
use futures::future::join_all;

use crate::dao::base::DaoResult;

use super::outcome::{FetchOutcome, Stage, StageFailure};

/// Drops repeated ids, keeping the first occurrence of each.
pub fn dedupe_ids<'a>(ids: impl IntoIterator<Item = &'a ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(**id))
        .copied()
        .collect()
}

/// Splits de-duplicated `ids` into consecutive chunks of at most `size`.
pub fn chunk_ids(ids: &[ObjectId], size: usize) -> Vec<Vec<ObjectId>> {
    let size = size.max(1);
    dedupe_ids(ids)
        .chunks(size)
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Runs `query` once per chunk, all chunks concurrently, and concatenates
/// whatever succeeded in chunk order.
///
/// A failing chunk is logged and recorded; it never discards the rows of
/// other chunks. The outcome is `Failed` only when every chunk failed.
pub async fn fan_out<T, F, Fut>(
    stage: Stage,
    ids: &[ObjectId],
    batch_size: usize,
    query: F,
) -> FetchOutcome<Vec<T>>
where
    F: Fn(Vec<ObjectId>) -> Fut,
    Fut: Future<Output = DaoResult<Vec<T>>>,
{
    let chunks = chunk_ids(ids, batch_size);
    if chunks.is_empty() {
        return FetchOutcome::Complete(Vec::new());
    }

    let total = chunks.len();
    let results = join_all(chunks.into_iter().map(&query)).await;

    let mut rows = Vec::new();
    let mut failures = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(mut chunk_rows) => rows.append(&mut chunk_rows),
            Err(e) => {
                let failure = StageFailure::from_dao(stage, &e).in_chunk(index);
                failure.log();
                failures.push(failure);
            }
        }
    }

    if failures.len() == total {
        // Every chunk failed: the first failure stands for the stage, the
        // rest were already logged.
        return FetchOutcome::Failed(failures.swap_remove(0));
    }
    FetchOutcome::from_parts(rows, failures)
}
