use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row length must be valid.
    #[error("row length must be > 0, got {0}")]
    InvalidRowLength(usize),

    /// The buffers are not a whole number of rows or differ in length.
    #[error("buffers of length {0} and {1} cannot be split in rows of {2}")]
    SizeMismatch(usize, usize, usize),
}

/// Controls how the per-row units of the pipeline are executed.
///
/// Every unit writes only to its own row of a pre-allocated output buffer,
/// so all strategies produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    #[default]
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Check that the strategy can be executed.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match self {
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }
}

fn check_rows(len: usize, other_len: usize, row_len: usize) -> Result<(), ParallelError> {
    if row_len == 0 {
        return Err(ParallelError::InvalidRowLength(row_len));
    }
    if len != other_len || len % row_len != 0 {
        return Err(ParallelError::SizeMismatch(len, other_len, row_len));
    }
    Ok(())
}

fn run_in_pool<F>(n: usize, op: F) -> Result<(), ParallelError>
where
    F: FnOnce() + Send,
{
    if n == 0 {
        return Err(ParallelError::InvalidThreadCount(n));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))?;
    pool.install(op);
    Ok(())
}

/// Apply `op` to every row of `dst` with the given strategy.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The destination buffer, a whole number of rows.
/// * `row_len` - The number of elements in a row.
/// * `op` - Called with the row index and the mutable row.
pub fn for_each_row<T, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    row_len: usize,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    check_rows(dst.len(), dst.len(), row_len)?;

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| op(r, row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| op(r, row));
        }
        ExecutionStrategy::Fixed(n) => run_in_pool(n, || {
            dst.par_chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| op(r, row));
        })?,
    }

    Ok(())
}

/// Apply `op` to every pair of rows of two equally sized buffers.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst1` - The first destination buffer.
/// * `dst2` - The second destination buffer, same length as `dst1`.
/// * `row_len` - The number of elements in a row.
/// * `op` - Called with the row index and both mutable rows.
pub fn for_each_row_pair<T1, T2, F>(
    strategy: ExecutionStrategy,
    dst1: &mut [T1],
    dst2: &mut [T2],
    row_len: usize,
    op: F,
) -> Result<(), ParallelError>
where
    T1: Send,
    T2: Send,
    F: Fn(usize, &mut [T1], &mut [T2]) + Sync + Send,
{
    check_rows(dst1.len(), dst2.len(), row_len)?;

    match strategy {
        ExecutionStrategy::Serial => {
            dst1.chunks_exact_mut(row_len)
                .zip(dst2.chunks_exact_mut(row_len))
                .enumerate()
                .for_each(|(r, (row1, row2))| op(r, row1, row2));
        }
        ExecutionStrategy::ParallelRows => {
            dst1.par_chunks_exact_mut(row_len)
                .zip(dst2.par_chunks_exact_mut(row_len))
                .enumerate()
                .for_each(|(r, (row1, row2))| op(r, row1, row2));
        }
        ExecutionStrategy::Fixed(n) => run_in_pool(n, || {
            dst1.par_chunks_exact_mut(row_len)
                .zip(dst2.par_chunks_exact_mut(row_len))
                .enumerate()
                .for_each(|(r, (row1, row2))| op(r, row1, row2));
        })?,
    }

    Ok(())
}
