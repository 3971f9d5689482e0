//! Contiguous-chunk sharding for the transform passes.
//!
//! Rows have no cross-record dependencies, so a pass can run on arbitrary
//! partitions without affecting results. Chunks stay contiguous and results
//! are reassembled in chunk order, so output is identical for any worker
//! count.

/// Map `items` through `f`, splitting into at most `workers` contiguous
/// chunks processed on scoped threads. `workers <= 1` runs inline.
pub fn map_sharded<T, R, F>(items: Vec<T>, workers: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let workers = workers.max(1);
    if workers == 1 || items.len() <= 1 {
        return items.into_iter().map(f).collect();
    }

    let chunk_size = items.len().div_ceil(workers);
    let mut chunks: Vec<Vec<T>> = Vec::new();
    let mut items = items;
    while !items.is_empty() {
        let rest = items.split_off(items.len().min(chunk_size));
        chunks.push(items);
        items = rest;
    }

    let f = &f;
    let mut results: Vec<Vec<R>> = Vec::with_capacity(chunks.len());
    std::thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| scope.spawn(move || chunk.into_iter().map(f).collect::<Vec<R>>()))
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(mapped) => results.push(mapped),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
    });
    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::map_sharded;

    #[test]
    fn preserves_input_order() {
        let input: Vec<u32> = (0..103).collect();
        let doubled = map_sharded(input.clone(), 4, |v| v * 2);
        let expected: Vec<u32> = input.iter().map(|v| v * 2).collect();
        assert_eq!(doubled, expected);
    }

    #[test]
    fn worker_count_does_not_change_output() {
        let input: Vec<u32> = (0..50).collect();
        let one = map_sharded(input.clone(), 1, |v| v + 7);
        let many = map_sharded(input, 8, |v| v + 7);
        assert_eq!(one, many);
    }

    #[test]
    fn more_workers_than_items_is_fine() {
        let out = map_sharded(vec![1, 2], 16, |v| v);
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out: Vec<u32> = map_sharded(Vec::<u32>::new(), 4, |v| v);
        assert!(out.is_empty());
    }
}
