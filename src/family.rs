//! 部分集合族のビット集合。
//!
//! 部分集合 x ∈ [0, 2ⁿ) をビット位置 x に対応させる。
//! n ≤ 7 なら 2ⁿ ≤ 128 なので u64 ワード2つに収まり、集合族は `Copy` な値として扱える。
//! ビット位置 x のメンバーは word[x/64] の (x%64) ビット目。

use crate::ground::{Subset, MAX_SUBSETS};

/// 集合族を保持する u64 ワード数
pub const FAMILY_WORDS: usize = MAX_SUBSETS / 64;

/// 部分集合族。値セマンティクス（コピー後は元と独立）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Family {
    words: [u64; FAMILY_WORDS],
}

impl Family {
    pub const fn empty() -> Self {
        Family {
            words: [0; FAMILY_WORDS],
        }
    }

    pub const fn from_words(words: [u64; FAMILY_WORDS]) -> Self {
        Family { words }
    }

    #[inline]
    pub fn words(&self) -> &[u64; FAMILY_WORDS] {
        &self.words
    }

    #[inline]
    pub fn word(&self, w: usize) -> u64 {
        self.words[w]
    }

    pub fn clear(&mut self) {
        self.words = [0; FAMILY_WORDS];
    }

    #[inline]
    pub fn insert(&mut self, x: Subset) {
        debug_assert!((x as usize) < MAX_SUBSETS, "subset {} out of range", x);
        self.words[(x >> 6) as usize] |= 1u64 << (x & 63);
    }

    #[inline]
    pub fn contains(&self, x: Subset) -> bool {
        debug_assert!((x as usize) < MAX_SUBSETS, "subset {} out of range", x);
        (self.words[(x >> 6) as usize] >> (x & 63)) & 1 != 0
    }

    /// メンバー数
    pub fn len(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// 共通のメンバーを持たないか
    pub fn is_disjoint(&self, other: &Family) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & b == 0)
    }

    /// self ⊆ other
    pub fn is_subset(&self, other: &Family) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & !b == 0)
    }

    /// メンバーを昇順に列挙する
    pub fn iter(&self) -> Members {
        Members {
            words: self.words,
            index: 0,
        }
    }
}

impl FromIterator<Subset> for Family {
    fn from_iter<I: IntoIterator<Item = Subset>>(iter: I) -> Self {
        let mut family = Family::empty();
        for x in iter {
            family.insert(x);
        }
        family
    }
}

/// [`Family::iter`] のイテレータ。最下位ビットから順に取り出す。
pub struct Members {
    words: [u64; FAMILY_WORDS],
    index: usize,
}

impl Iterator for Members {
    type Item = Subset;

    fn next(&mut self) -> Option<Subset> {
        while self.index < FAMILY_WORDS {
            let word = self.words[self.index];
            if word != 0 {
                let bit = word.trailing_zeros();
                self.words[self.index] = word & (word - 1);
                return Some(((self.index as u32) << 6) + bit);
            }
            self.index += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains() {
        let mut f = Family::empty();
        assert!(f.is_empty());
        f.insert(0);
        f.insert(63);
        f.insert(64);
        f.insert(127);
        assert!(f.contains(0));
        assert!(f.contains(63));
        assert!(f.contains(64));
        assert!(f.contains(127));
        assert!(!f.contains(1));
        assert!(!f.contains(65));
        assert_eq!(f.len(), 4);
        assert_eq!(f.words(), &[1 | (1 << 63), 1 | (1 << 63)]);
    }

    #[test]
    fn test_clear() {
        let mut f: Family = [3, 5, 100].into_iter().collect();
        f.clear();
        assert!(f.is_empty());
        assert_eq!(f, Family::empty());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut a: Family = [1, 2].into_iter().collect();
        let b = a;
        a.insert(70);
        assert!(a.contains(70));
        assert!(!b.contains(70));
    }

    #[test]
    fn test_iter_ascending_across_words() {
        let f: Family = [100, 3, 64, 0, 63].into_iter().collect();
        assert_eq!(f.iter().collect::<Vec<_>>(), vec![0, 3, 63, 64, 100]);
    }

    #[test]
    fn test_disjoint_and_subset() {
        let a: Family = [1, 2, 80].into_iter().collect();
        let b: Family = [3, 81].into_iter().collect();
        let c: Family = [1, 80].into_iter().collect();
        assert!(a.is_disjoint(&b));
        assert!(!a.is_disjoint(&c));
        assert!(c.is_subset(&a));
        assert!(!a.is_subset(&c));
    }
}
