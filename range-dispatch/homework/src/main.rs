// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod exercises;
mod homework_config;

use std::time::Instant;

use clap::{Parser, Subcommand};
use exercises::Matrix;
use homework_config::HomeworkConfig;
use range_dispatch_core::{runtime, RangeDispatcher};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "range-dispatch-homework", about = "Index-parallel dispatch exercises")]
struct Cli {
    /// JSON config file; missing or malformed files fall back to defaults
    #[arg(long, default_value = "homework.json")]
    config: String,

    /// Worker count, overriding the config file
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// 2-D fill with 1000 * i * j
    Fill,
    /// Max reduction over doubled values
    Max,
    /// Plain loop against parallel reduce
    SumTiming,
    /// 3x3 matrix plus a broadcast row
    MatrixAdd,
    /// Prefix sum over the indices
    PrefixSum,
    /// Matrix multiply with a dimension check
    MatrixMul,
    /// Every exercise in turn
    All,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mut config = HomeworkConfig::load_or_default(&cli.config);
    if let Some(threads) = cli.threads {
        config.dispatch = config.dispatch.with_concurrency(threads);
    }

    runtime::initialize(&config.dispatch)?;
    let dispatcher = runtime::dispatcher();
    println!("=== RANGE DISPATCH HOMEWORK ===");
    println!("Workers: {}", dispatcher.concurrency());

    let start_time = Instant::now();
    run(cli.command, dispatcher, &config)?;

    println!("\n=== PROGRAM COMPLETE ===");
    println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

fn run(
    command: Command,
    dispatcher: &RangeDispatcher,
    config: &HomeworkConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Fill => {
            println!("\n--- fill ---");
            let m = exercises::fill(dispatcher, config.fill_rows, config.fill_cols)?;
            print!("{}", m);
        }
        Command::Max => {
            println!("\n--- max ---");
            let (values, max) = exercises::max_of_doubled(dispatcher, config.max_len)?;
            let line: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            println!("{}", line.join(" "));
            println!("Maximum result: {}", max);
        }
        Command::SumTiming => {
            println!("\n--- sum-timing ---");
            let timing = exercises::timed_sum(dispatcher, config.sum_len)?;
            println!(
                "Normal loop: {:.6} seconds (sum {})",
                timing.serial_time.as_secs_f64(),
                timing.serial_sum
            );
            println!(
                "Parallel reduce loop: {:.6} seconds (sum {})",
                timing.parallel_time.as_secs_f64(),
                timing.parallel_sum
            );
        }
        Command::MatrixAdd => {
            println!("\n--- matrix-add ---");
            let a = Matrix::from_fn(3, 3, |i, j| (i * 3 + j) as i64);
            let b: Vec<i64> = (1..=3).map(|i| i * 3).collect();
            let c = exercises::matrix_add(dispatcher, &a, &b)?;
            println!("A:\n{}", a);
            println!("B:");
            for value in &b {
                println!("{}", value);
            }
            println!("\nC:\n{}", c);
        }
        Command::PrefixSum => {
            println!("\n--- prefix-sum ---");
            let timer = Instant::now();
            let (prefix, total) = exercises::prefix_sum(dispatcher, config.prefix_len)?;
            let elapsed = timer.elapsed();
            for (i, value) in prefix.iter().enumerate() {
                println!("A[{}]: {}", i, value);
            }
            println!("Total: {}", total);
            println!("Total time: {:.12} seconds", elapsed.as_secs_f64());
        }
        Command::MatrixMul => {
            println!("\n--- matrix-mul ---");
            let (a, b) = if config.random_matrices {
                let mut rng = rand::rng();
                (
                    Matrix::random(config.mul_rows, config.mul_inner, &mut rng),
                    Matrix::random(config.mul_inner, config.mul_cols, &mut rng),
                )
            } else {
                (
                    Matrix::from_fn(config.mul_rows, config.mul_inner, |i, j| (i + j) as i64),
                    Matrix::from_fn(config.mul_inner, config.mul_cols, |i, j| (i + j) as i64),
                )
            };
            let c = exercises::matrix_mul(dispatcher, &a, &b)?;
            println!("A:\n{}", a);
            println!("B:\n{}", b);
            println!("C:\n{}", c);
        }
        Command::All => {
            for command in [
                Command::Fill,
                Command::Max,
                Command::SumTiming,
                Command::MatrixAdd,
                Command::PrefixSum,
                Command::MatrixMul,
            ] {
                run(command, dispatcher, config)?;
            }
        }
    }
    Ok(())
}
