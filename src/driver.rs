use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use crate::closure::{self, Worklist};
use crate::enumerate;
use crate::error::Error;
use crate::family::Family;
use crate::ground::{GroundSet, Subset, MAX_N};

/// ドライバの設定。プロセス全体の設定ではなく、ドライバごとに渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// ワーカースレッド数。None ならハードウェア並列度
    pub threads: Option<usize>,
    /// `run` で数える台集合サイズの上限
    pub max_n: u32,
    /// 最上位分岐を並列化せず逐次で数える
    pub serial: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            threads: None,
            max_n: MAX_N,
            serial: false,
        }
    }
}

/// 1つの n に対する結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountResult {
    pub n: u32,
    pub count: u64,
    pub elapsed: Duration,
}

/// 最上位の分岐を専用スレッドプールで並列に数えるドライバ。
/// 逐次モードではスレッドプールを作らない。
pub struct Driver {
    config: DriverConfig,
    pool: Option<ThreadPool>,
}

impl Driver {
    /// `max_n` が上限を超えていれば計算前に拒否する。
    pub fn new(config: DriverConfig) -> Result<Self, Error> {
        if config.max_n > MAX_N {
            return Err(Error::GroundSetTooLarge {
                n: config.max_n,
                max: MAX_N,
            });
        }
        let pool = if config.serial {
            None
        } else {
            let mut builder = ThreadPoolBuilder::new();
            if let Some(threads) = config.threads {
                builder = builder.num_threads(threads);
            }
            Some(builder.build()?)
        };
        Ok(Driver { config, pool })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// 実際のワーカー数
    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
    }

    /// 台集合サイズ n の Dynkin 系の数
    pub fn count(&self, n: u32) -> Result<u64, Error> {
        self.count_with_progress(n, |_, _| {})
    }

    /// progress_callback: (完了した最上位分岐数, 最上位分岐の総数)。
    /// 並列モードではワーカースレッドから呼ばれる。
    pub fn count_with_progress(
        &self,
        n: u32,
        progress_callback: impl Fn(usize, usize) + Sync,
    ) -> Result<u64, Error> {
        let ground = GroundSet::new(n)?;
        Ok(match &self.pool {
            Some(pool) => pool.install(|| count_systems_parallel(&ground, &progress_callback)),
            None => count_systems_serial(&ground, &progress_callback),
        })
    }

    /// n = 0..=max_n を順に数える。
    /// progress_callback: (n, 完了した最上位分岐数, 総数)
    pub fn run(
        &self,
        progress_callback: impl Fn(u32, usize, usize) + Sync,
    ) -> Result<Vec<CountResult>, Error> {
        (0..=self.config.max_n)
            .map(|n| {
                let timer = Instant::now();
                let count = self.count_with_progress(n, |done, total| progress_callback(n, done, total))?;
                let elapsed = timer.elapsed();
                info!(n, count, ?elapsed, threads = self.threads(), "counted Dynkin systems");
                Ok(CountResult { n, count, elapsed })
            })
            .collect()
    }
}

/// 最上位の除外集合の前計算。
///
/// 要素 m は代表元 1..=m を昇順に「含めない」と決めた後の除外集合（要素 0 は空）。
/// 最上位の分岐 m はこの要素 m-1 から始まるので、分岐どうしを逐次化せずに済む。
pub fn prefix_exclusions(ground: &GroundSet) -> Vec<Family> {
    let mut prefix = Vec::with_capacity(ground.limit().max(1) as usize);
    let mut excluded = Family::empty();
    prefix.push(excluded);
    for m in ground.representatives() {
        excluded.insert(m);
        excluded.insert(ground.complement(m));
        prefix.push(excluded);
    }
    prefix
}

/// 最上位の分岐 m（m を含め、1..m は含めない）の部分木のノード数。
fn count_branch(
    ground: &GroundSet,
    base: &Family,
    prefix: &[Family],
    m: Subset,
    worklist: &mut Worklist,
) -> u64 {
    let excluded = &prefix[(m - 1) as usize];
    if base.contains(m) || excluded.contains(m) {
        return 0;
    }
    match closure::extend(ground, base, m, excluded, worklist) {
        Ok(closed) => {
            let mut next = *excluded;
            next.insert(m);
            next.insert(ground.complement(m));
            enumerate::count_with(ground, m + 1, &closed, next, worklist)
        }
        Err(contradiction) => {
            debug!(m, subset = contradiction.subset, "top-level branch pruned");
            0
        }
    }
}

/// 1スレッドで数える（参照実装）。
/// progress_callback: (完了した最上位分岐数, 最上位分岐の総数)
pub fn count_systems_serial(
    ground: &GroundSet,
    progress_callback: &(impl Fn(usize, usize) + Sync),
) -> u64 {
    let base = ground.base_family();
    let prefix = prefix_exclusions(ground);
    let total_branches = ground.representatives().len();
    let mut worklist = Worklist::new();
    let sum: u64 = ground
        .representatives()
        .enumerate()
        .map(|(i, m)| {
            let count = count_branch(ground, &base, &prefix, m, &mut worklist);
            progress_callback(i + 1, total_branches);
            count
        })
        .sum();
    // 基底 {∅, Ω} のまま何も加えない根の分
    sum + 1
}

/// 現在の Rayon プール上で最上位分岐を並列に数える。
///
/// 部分木の大きさは m によって桁違いに異なるので、固定チャンクではなくワークスティーリングに任せる。
/// 共有するのは読み取り専用の Ω と前計算の除外集合のみ。
pub fn count_systems_parallel(
    ground: &GroundSet,
    progress_callback: &(impl Fn(usize, usize) + Sync),
) -> u64 {
    let base = ground.base_family();
    let prefix = prefix_exclusions(ground);
    let total_branches = ground.representatives().len();
    let done = AtomicUsize::new(0);

    let sum: u64 = ground
        .representatives()
        .into_par_iter()
        .map_init(Worklist::new, |worklist, m| {
            let timer = Instant::now();
            let count = count_branch(ground, &base, &prefix, m, worklist);
            debug!(n = ground.n(), m, count, elapsed = ?timer.elapsed(), "top-level branch done");
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress_callback(finished, total_branches);
            count
        })
        .sum();

    sum + 1
}
