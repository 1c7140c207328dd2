//! 探索結果の独立な検証。
//!
//! 小さな n では全ての集合族（2^(2ⁿ) 個）を総当たりして公理を直接検査できる。
//! 探索が「全ノードを1と数える」ことの正しさ（各ノードが相異なる Dynkin 系であること）をここで確かめる。

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use tracing::info;

use crate::closure::is_dynkin;
use crate::driver::Driver;
use crate::enumerate;
use crate::error::Error;
use crate::family::Family;
use crate::ground::GroundSet;

/// 総当たり検証の上限。n=4 で 2^16 個、n=5 だと 2^32 個になる。
pub const BRUTE_FORCE_MAX_N: u32 = 4;

/// n = 0..=7 の既知の個数
pub const KNOWN_COUNTS: [u64; 8] = [1, 1, 2, 5, 19, 137, 3708, 1506404];

/// 検証結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    pub n: u32,
    /// ドライバの数えた個数
    pub search: u64,
    /// 探索木を列挙した集合族の数
    pub listed: u64,
    /// 列挙した集合族が全て Dynkin 系で、互いに異なるか
    pub listed_valid: bool,
    /// 総当たりの個数
    pub brute_force: u64,
}

impl VerifyResult {
    pub fn matches(&self) -> bool {
        self.listed_valid && self.search == self.listed && self.search == self.brute_force
    }
}

/// 全ての集合族を総当たりして Dynkin 系を数える（並列版）。
/// チャンクごとに数えて合計する。
pub fn brute_force_count(ground: &GroundSet) -> Result<u64, Error> {
    if ground.n() > BRUTE_FORCE_MAX_N {
        return Err(Error::BruteForceTooLarge {
            n: ground.n(),
            max: BRUTE_FORCE_MAX_N,
        });
    }

    let total_families = 1u64 << ground.subset_count();
    let chunk_size: u64 = 4096;
    let num_chunks = total_families.div_ceil(chunk_size);
    let found = AtomicU64::new(0);

    (0..num_chunks).into_par_iter().for_each(|chunk_idx| {
        let chunk_start = chunk_idx * chunk_size;
        let chunk_end = (chunk_start + chunk_size).min(total_families);
        let local = (chunk_start..chunk_end)
            .filter(|&bits| is_dynkin(ground, &Family::from_words([bits, 0])))
            .count() as u64;
        found.fetch_add(local, Ordering::Relaxed);
    });

    Ok(found.load(Ordering::Relaxed))
}

/// 探索が数える全ての集合族を列挙順に返す。
pub fn systems(ground: &GroundSet) -> Vec<Family> {
    let mut out = Vec::new();
    enumerate::walk(ground, 1, &ground.base_family(), Family::empty(), &mut |f: &Family| {
        out.push(*f)
    });
    out
}

/// n = 0..=max_n（ただし総当たり可能な範囲）で、探索・列挙・総当たりを突き合わせる。
pub fn verify_counts(driver: &Driver, max_n: u32) -> Result<Vec<VerifyResult>, Error> {
    (0..=max_n.min(BRUTE_FORCE_MAX_N))
        .map(|n| {
            let ground = GroundSet::new(n)?;
            let search = driver.count(n)?;

            let listed = systems(&ground);
            let mut distinct: Vec<[u64; 2]> = listed.iter().map(|f| *f.words()).collect();
            distinct.sort_unstable();
            distinct.dedup();
            let listed_valid =
                distinct.len() == listed.len() && listed.iter().all(|f| is_dynkin(&ground, f));

            let brute_force = brute_force_count(&ground)?;
            let result = VerifyResult {
                n,
                search,
                listed: listed.len() as u64,
                listed_valid,
                brute_force,
            };
            info!(n, search, brute_force, ok = result.matches(), "verified");
            Ok(result)
        })
        .collect()
}
