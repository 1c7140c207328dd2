use std::ops::Range;

use crate::error::Error;
use crate::family::Family;

/// 部分集合。Ω 上のビットマスク（ビット i が要素 i）。
pub type Subset = u32;

/// 対応する台集合サイズの上限。n=8 は 2^8 = 256 ビットの集合族になり表現に収まらない。
pub const MAX_N: u32 = 7;

/// n = MAX_N のときの部分集合の総数 (= 集合族ビット集合の容量)
pub const MAX_SUBSETS: usize = 1 << MAX_N;

/// 台集合 Ω = {0, …, n-1}。
///
/// 集合族の有効容量 2ⁿ と代表元の範囲はここから導く。
/// 探索の各関数はこの値を明示的に受け取り、グローバルな容量定数には頼らない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundSet {
    n: u32,
    omega: Subset,
}

impl GroundSet {
    /// n > MAX_N は計算を始める前に拒否する。
    pub fn new(n: u32) -> Result<Self, Error> {
        if n > MAX_N {
            return Err(Error::GroundSetTooLarge { n, max: MAX_N });
        }
        Ok(GroundSet {
            n,
            omega: (1 << n) - 1,
        })
    }

    #[inline]
    pub fn n(&self) -> u32 {
        self.n
    }

    /// 全体集合のマスク（n=0 なら 0）
    #[inline]
    pub fn omega(&self) -> Subset {
        self.omega
    }

    /// 部分集合の個数 2ⁿ
    #[inline]
    pub fn subset_count(&self) -> usize {
        1 << self.n
    }

    /// 集合族のうち実際に使う u64 ワード数
    #[inline]
    pub fn family_words(&self) -> usize {
        self.subset_count().div_ceil(64)
    }

    #[inline]
    pub fn complement(&self, x: Subset) -> Subset {
        self.omega ^ x
    }

    /// 代表元の上限 (Ω+1)/2。
    /// 補集合ペア {m, Ω\m} のうち小さい方 m ∈ [1, limit) だけを分岐対象にする。
    #[inline]
    pub fn limit(&self) -> Subset {
        (self.omega + 1) >> 1
    }

    /// 未決定になりうる代表元の範囲。limit ≤ 1 なら空。
    pub fn representatives(&self) -> Range<Subset> {
        1..self.limit().max(1)
    }

    /// 基底の集合族 {∅, Ω}
    pub fn base_family(&self) -> Family {
        let mut family = Family::empty();
        family.insert(0);
        family.insert(self.omega);
        family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omega_and_limit() {
        let cases = [(0, 0, 0), (1, 1, 1), (2, 3, 2), (3, 7, 4), (7, 127, 64)];
        for (n, omega, limit) in cases {
            let g = GroundSet::new(n).unwrap();
            assert_eq!(g.omega(), omega, "omega for n={}", n);
            assert_eq!(g.limit(), limit, "limit for n={}", n);
        }
    }

    #[test]
    fn test_representatives_empty_for_trivial_sets() {
        assert!(GroundSet::new(0).unwrap().representatives().is_empty());
        assert!(GroundSet::new(1).unwrap().representatives().is_empty());
        assert_eq!(GroundSet::new(3).unwrap().representatives(), 1..4);
    }

    #[test]
    fn test_rejects_n_above_max() {
        match GroundSet::new(MAX_N + 1) {
            Err(Error::GroundSetTooLarge { n, max }) => {
                assert_eq!(n, 8);
                assert_eq!(max, MAX_N);
            }
            other => panic!("expected GroundSetTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_base_family() {
        let g = GroundSet::new(3).unwrap();
        let base = g.base_family();
        assert_eq!(base.iter().collect::<Vec<_>>(), vec![0, 7]);

        // n=0 では ∅ = Ω なので要素は1つ
        let g0 = GroundSet::new(0).unwrap();
        assert_eq!(g0.base_family().len(), 1);
    }

    #[test]
    fn test_family_words() {
        assert_eq!(GroundSet::new(0).unwrap().family_words(), 1);
        assert_eq!(GroundSet::new(6).unwrap().family_words(), 1);
        assert_eq!(GroundSet::new(7).unwrap().family_words(), 2);
    }
}
