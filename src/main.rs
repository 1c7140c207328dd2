use std::sync::Mutex;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use dynkin_count::*;
use tracing_subscriber::EnvFilter;

/// Dynkin 系の数え上げ: n = 0..=max_n について "<n> <count>" を標準出力に出す
#[derive(Parser)]
#[command(name = "dynkin-count", version, about)]
struct Args {
    /// ワーカースレッド数（省略時はハードウェア並列度）
    #[arg(long)]
    threads: Option<usize>,

    /// 数える台集合サイズの上限 (0..=7)
    #[arg(long, default_value_t = MAX_N)]
    max_n: u32,

    /// 最上位分岐を並列化せず1スレッドで数える
    #[arg(long)]
    serial: bool,

    /// n <= 4 で総当たりと突き合わせる（結果は標準エラー）
    #[arg(long)]
    verify: bool,

    /// 進捗を標準エラーに表示する
    #[arg(long)]
    progress: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // 計算を始める前に範囲外の n を拒否する
    let driver = Driver::new(DriverConfig {
        threads: args.threads,
        max_n: args.max_n,
        serial: args.serial,
    })?;

    let timer = Instant::now();
    let last_print = Mutex::new(Instant::now());
    let show_progress = args.progress;
    let results = driver.run(|n, done, total| {
        if !show_progress || total == 0 {
            return;
        }
        let now = Instant::now();
        if let Ok(mut lp) = last_print.try_lock() {
            if done == total || now.duration_since(*lp).as_millis() >= 500 {
                eprint!(
                    "\x1b[2K\r  [{:.1}s] n={} 分岐 {}/{} ({:.1}%) | {}スレッド",
                    timer.elapsed().as_secs_f64(),
                    n,
                    done,
                    total,
                    done as f64 / total as f64 * 100.0,
                    driver.threads()
                );
                *lp = now;
            }
        }
    })?;
    if show_progress {
        eprintln!();
    }

    for r in &results {
        println!("{} {}", r.n, r.count);
    }

    if args.verify {
        let checks = verify_counts(&driver, driver.config().max_n)?;
        let mut all_ok = true;
        for c in &checks {
            eprintln!(
                "検証 n={}: 探索={} 列挙={} 総当たり={} {}",
                c.n,
                c.search,
                c.listed,
                c.brute_force,
                if c.matches() { "一致" } else { "不一致" }
            );
            all_ok &= c.matches();
        }
        if !all_ok {
            bail!("探索結果が総当たりと一致しません");
        }
    }

    Ok(())
}
