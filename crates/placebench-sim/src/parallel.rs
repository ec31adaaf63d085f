//! Thread pool helpers for the decide phase.
//!
//! Work is split into one contiguous chunk per worker and run on a rayon pool
//! sized to the requested worker count. Results come back in chunk order so
//! callers can merge them deterministically.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

/// Build a pool with exactly `workers` threads.
///
/// # Errors
///
/// Returns [`SimError::ThreadPool`](crate::SimError::ThreadPool) if the
/// threads cannot be spawned.
pub(crate) fn build_pool(workers: NonZeroUsize) -> Result<ThreadPool> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.get())
        .thread_name(|i| format!("placebench-worker-{i}"))
        .build()?;
    Ok(pool)
}

/// Run `f` over `items` split into `pool.current_num_threads()` contiguous
/// chunks and return each chunk's result in order.
///
/// # Errors
///
/// Returns an error produced by one of the chunks. Which one is unspecified
/// when several fail.
pub(crate) fn map_chunks<T, R, F>(pool: &ThreadPool, items: &mut [T], f: F) -> Result<Vec<R>>
where
    T: Send,
    R: Send,
    F: Fn(&mut [T]) -> Result<R> + Sync,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let chunk = items.len().div_ceil(pool.current_num_threads());
    pool.install(|| items.par_chunks_mut(chunk).map(&f).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn pool(n: usize) -> ThreadPool {
        build_pool(NonZeroUsize::new(n).unwrap()).unwrap()
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(pool(3).current_num_threads(), 3);
        assert_eq!(pool(1).current_num_threads(), 1);
    }

    #[test]
    fn test_chunks_cover_all_items_in_order() {
        let mut items: Vec<u64> = (0..103).collect();
        let sums = map_chunks(&pool(4), &mut items, |part| {
            for x in part.iter_mut() {
                *x *= 2;
            }
            Ok(part.len())
        })
        .unwrap();
        assert_eq!(sums, vec![26, 26, 26, 25]);
        assert_eq!(items, (0..103).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_more_workers_than_items() {
        let mut items = vec![1u8, 2, 3];
        let parts = map_chunks(&pool(8), &mut items, |part| Ok(part.to_vec())).unwrap();
        assert_eq!(parts, vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_single_worker_is_one_chunk() {
        let mut items = vec![0u32; 10];
        let lens = map_chunks(&pool(1), &mut items, |part| Ok(part.len())).unwrap();
        assert_eq!(lens, vec![10]);
    }

    #[test]
    fn test_runs_inside_the_pool() {
        let mut items = vec![0u32; 6];
        let names = map_chunks(&pool(2), &mut items, |_| {
            Ok(std::thread::current().name().map(str::to_owned))
        })
        .unwrap();
        for name in names {
            assert!(name.unwrap().starts_with("placebench-worker-"));
        }
    }

    #[test]
    fn test_empty_input() {
        let mut items: Vec<u32> = Vec::new();
        let out: Vec<()> = map_chunks(&pool(3), &mut items, |_| Ok(())).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_error_propagates() {
        let mut items = vec![0u32; 9];
        let err = map_chunks(&pool(3), &mut items, |part| {
            if part.len() == 3 {
                return Err(SimError::InvalidTopology("boom".into()));
            }
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidTopology(_)));
    }
}
