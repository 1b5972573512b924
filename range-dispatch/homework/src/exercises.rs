// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use rand::Rng;
use range_dispatch_core::{DispatchError, RangeDispatcher, RangePolicy, Reduction};

#[derive(Debug)]
pub enum ExerciseError {
    Dispatch(DispatchError),
    /// Operands whose inner dimensions differ
    Shape {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Length that does not fit the exercise's index or value type
    TooLarge { len: usize },
}

impl fmt::Display for ExerciseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseError::Dispatch(e) => write!(f, "Dispatch failed: {}", e),
            ExerciseError::Shape { left, right } => write!(
                f,
                "Dimensions of A:[{},{}] and B:[{},{}] don't line up",
                left.0, left.1, right.0, right.1
            ),
            ExerciseError::TooLarge { len } => write!(f, "Length {} is too large", len),
        }
    }
}

impl std::error::Error for ExerciseError {}

impl From<DispatchError> for ExerciseError {
    fn from(e: DispatchError) -> Self {
        ExerciseError::Dispatch(e)
    }
}

/// Dense row-major matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl Matrix {
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> i64) -> Self {
        let data = (0..rows * cols).map(|k| f(k / cols, k % cols)).collect();
        Self { rows, cols, data }
    }

    pub fn random(rows: usize, cols: usize, rng: &mut impl Rng) -> Self {
        let data = (0..rows * cols).map(|_| rng.random_range(0..10)).collect();
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.cols + col]
    }

    fn from_cells(rows: usize, cols: usize, cells: Vec<AtomicI64>) -> Self {
        let data = cells.into_iter().map(AtomicI64::into_inner).collect();
        Self { rows, cols, data }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.cols)
                .map(|col| self.get(row, col).to_string())
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

fn zeroed(len: usize) -> Vec<AtomicI64> {
    (0..len).map(|_| AtomicI64::new(0)).collect()
}

/// Policy over `[0, len)`
fn indices(len: usize) -> Result<RangePolicy, ExerciseError> {
    let end = i64::try_from(len).map_err(|_| ExerciseError::TooLarge { len })?;
    Ok(RangePolicy::new(0, end))
}

/// Fills a `rows x cols` matrix with `1000 * i * j`, one row per index
pub fn fill(
    dispatcher: &RangeDispatcher,
    rows: usize,
    cols: usize,
) -> Result<Matrix, ExerciseError> {
    let cells = zeroed(rows * cols);
    dispatcher.parallel_for("Loop1", indices(rows)?, &|i: i64| {
        let i = i as usize;
        for j in 0..cols {
            cells[i * cols + j].store(1000 * (i * j) as i64, Ordering::Relaxed);
        }
    })?;
    Ok(Matrix::from_cells(rows, cols, cells))
}

/// Values `2 * i` for `i` in `[0, len)` and their maximum
pub fn max_of_doubled(
    dispatcher: &RangeDispatcher,
    len: usize,
) -> Result<(Vec<i32>, i32), ExerciseError> {
    let end = i32::try_from(len)
        .ok()
        .filter(|&end| end <= i32::MAX / 2 + 1)
        .ok_or(ExerciseError::TooLarge { len })?;
    let values: Vec<i32> = (0..end).map(|i| i * 2).collect();
    let max = dispatcher.parallel_reduce(
        "Maximum reduce",
        indices(len)?,
        &|i: i64, max_val: &mut i32| {
            if *max_val < values[i as usize] {
                *max_val = values[i as usize];
            }
        },
        Reduction::max(),
    )?;
    Ok((values, max))
}

#[derive(Debug, Clone, Copy)]
pub struct SumTiming {
    pub serial_sum: i64,
    pub serial_time: Duration,
    pub parallel_sum: i64,
    pub parallel_time: Duration,
}

/// Sums `i + 1` over `[0, len)` once with a plain loop and once with a parallel reduce
pub fn timed_sum(dispatcher: &RangeDispatcher, len: usize) -> Result<SumTiming, ExerciseError> {
    let cells = zeroed(len);
    let policy = indices(len)?;
    dispatcher.parallel_for("init", policy, &|i: i64| {
        cells[i as usize].store(i + 1, Ordering::Relaxed);
    })?;

    let timer = Instant::now();
    let serial_sum: i64 = cells.iter().map(|c| c.load(Ordering::Relaxed)).sum();
    let serial_time = timer.elapsed();

    let timer = Instant::now();
    let parallel_sum: i64 = dispatcher.parallel_sum(
        "parallel",
        policy,
        &|i: i64, lsum: &mut i64| *lsum += cells[i as usize].load(Ordering::Relaxed),
    )?;
    let parallel_time = timer.elapsed();

    Ok(SumTiming {
        serial_sum,
        serial_time,
        parallel_sum,
        parallel_time,
    })
}

/// Adds `row` to every row of `matrix`
pub fn matrix_add(
    dispatcher: &RangeDispatcher,
    matrix: &Matrix,
    row: &[i64],
) -> Result<Matrix, ExerciseError> {
    if matrix.cols() != row.len() {
        return Err(ExerciseError::Shape {
            left: matrix.shape(),
            right: (row.len(), 1),
        });
    }
    let cols = matrix.cols();
    let cells = zeroed(matrix.rows() * cols);
    dispatcher.parallel_for("add", indices(matrix.rows())?, &|i: i64| {
        let i = i as usize;
        for (j, b) in row.iter().enumerate() {
            cells[i * cols + j].store(matrix.get(i, j) + b, Ordering::Relaxed);
        }
    })?;
    Ok(Matrix::from_cells(matrix.rows(), cols, cells))
}

/// Inclusive prefix sums of the indices `[0, len)` and their total
pub fn prefix_sum(
    dispatcher: &RangeDispatcher,
    len: usize,
) -> Result<(Vec<i64>, i64), ExerciseError> {
    let out = zeroed(len);
    let total: i64 = dispatcher.parallel_scan(
        "Prefix sum",
        indices(len)?,
        &|i: i64, partial: &mut i64, is_final: bool| {
            *partial += i;
            if is_final {
                out[i as usize].store(*partial, Ordering::Relaxed);
            }
        },
    )?;
    Ok((out.into_iter().map(AtomicI64::into_inner).collect(), total))
}

/// `a * b`, one output row per index
pub fn matrix_mul(
    dispatcher: &RangeDispatcher,
    a: &Matrix,
    b: &Matrix,
) -> Result<Matrix, ExerciseError> {
    if a.cols() != b.rows() {
        return Err(ExerciseError::Shape {
            left: a.shape(),
            right: b.shape(),
        });
    }
    let cols = b.cols();
    let cells = zeroed(a.rows() * cols);
    dispatcher.parallel_for("Loop1", indices(a.rows())?, &|i: i64| {
        let i = i as usize;
        for j in 0..cols {
            let dot: i64 = (0..a.cols()).map(|k| a.get(i, k) * b.get(k, j)).sum();
            cells[i * cols + j].store(dot, Ordering::Relaxed);
        }
    })?;
    Ok(Matrix::from_cells(a.rows(), cols, cells))
}
