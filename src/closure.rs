//! 閉包計算。
//!
//! 閉じた集合族 `included` に候補 `candidate` を1つ加え、
//!   (a) x ∈ F ⇒ Ω\x ∈ F
//!   (b) x, y ∈ F かつ x∩y = ∅ ⇒ x∪y ∈ F
//! を不動点まで伝播する。強制された部分集合が `excluded` に入っていれば矛盾。
//!
//! 各部分集合は高々1回しか追加されないので、ワークリストは高々 2ⁿ 回で空になる。

use thiserror::Error;

use crate::family::Family;
use crate::ground::{GroundSet, Subset, MAX_SUBSETS};

/// 除外済みの部分集合が閉包により強制された。探索の枝刈り信号であり、エラーではない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("部分集合 {subset:#b} は除外済みだが閉包により強制される")]
pub struct Contradiction {
    pub subset: Subset,
}

/// 閉包計算用の FIFO。ワーカーごとに1つ持ち回し、共有しない。
pub struct Worklist {
    data: [Subset; MAX_SUBSETS],
    head: usize,
    len: usize,
}

impl Worklist {
    pub fn new() -> Self {
        Worklist {
            data: [0; MAX_SUBSETS],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    #[inline]
    fn push(&mut self, x: Subset) {
        self.data[self.len] = x;
        self.len += 1;
    }

    #[inline]
    fn pop(&mut self) -> Option<Subset> {
        if self.head < self.len {
            let x = self.data[self.head];
            self.head += 1;
            Some(x)
        } else {
            None
        }
    }
}

impl Default for Worklist {
    fn default() -> Self {
        Self::new()
    }
}

/// `x` を追加する。既にあれば何もしない。
#[inline]
fn force(
    closure: &mut Family,
    x: Subset,
    excluded: &Family,
    worklist: &mut Worklist,
) -> Result<(), Contradiction> {
    if closure.contains(x) {
        return Ok(());
    }
    if excluded.contains(x) {
        return Err(Contradiction { subset: x });
    }
    closure.insert(x);
    worklist.push(x);
    Ok(())
}

/// `included ∪ {candidate}` を含む最小の Dynkin 閉包を返す。
///
/// `included` は既に閉じていること（基底 {∅, Ω} や過去の `extend` の結果）。
/// 呼び出し側の `included` / `excluded` は変更しない。
/// 候補が既に含まれていれば `included` をそのまま返す。
pub fn extend(
    ground: &GroundSet,
    included: &Family,
    candidate: Subset,
    excluded: &Family,
    worklist: &mut Worklist,
) -> Result<Family, Contradiction> {
    let mut closure = *included;
    if closure.contains(candidate) {
        return Ok(closure);
    }
    closure.insert(candidate);
    worklist.reset();
    worklist.push(candidate);

    let words = ground.family_words();
    while let Some(x) = worklist.pop() {
        force(&mut closure, ground.complement(x), excluded, worklist)?;

        // 走査開始時点のワードのスナップショットを使う。
        // 走査中に追加されたメンバーは自身がワークリストから取り出されたときに x と組になる。
        for w in 0..words {
            let mut bits = closure.word(w);
            while bits != 0 {
                let y = ((w as Subset) << 6) + bits.trailing_zeros();
                bits &= bits - 1;
                if x & y == 0 {
                    force(&mut closure, x | y, excluded, worklist)?;
                }
            }
        }
    }
    Ok(closure)
}

/// 集合族が Dynkin 系の公理を満たすかを直接検査する。
///
/// ∅ を含み、補集合と互いに素な2つの和で閉じていること。
/// 2つの和で閉じていれば、帰納的に有限個の互いに素な和でも閉じる。
pub fn is_dynkin(ground: &GroundSet, family: &Family) -> bool {
    if !family.contains(0) {
        return false;
    }
    let count = ground.subset_count() as Subset;
    if family.iter().any(|x| x >= count) {
        return false;
    }
    for x in family.iter() {
        if !family.contains(ground.complement(x)) {
            return false;
        }
        for y in family.iter().filter(|&y| y > x) {
            if x & y == 0 && !family.contains(x | y) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground(n: u32) -> GroundSet {
        GroundSet::new(n).unwrap()
    }

    #[test]
    fn test_extend_n2_closes_to_power_set() {
        let g = ground(2);
        let base = g.base_family();
        let mut wl = Worklist::new();
        let closed = extend(&g, &base, 1, &Family::empty(), &mut wl).unwrap();
        assert_eq!(closed.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_extend_n3_singleton() {
        // {0} を加えると補集合 {1,2} だけが強制される
        let g = ground(3);
        let mut wl = Worklist::new();
        let closed = extend(&g, &g.base_family(), 0b001, &Family::empty(), &mut wl).unwrap();
        assert_eq!(closed.iter().collect::<Vec<_>>(), vec![0, 0b001, 0b110, 0b111]);
        assert!(is_dynkin(&g, &closed));
    }

    #[test]
    fn test_extend_n3_two_singletons_forces_power_set() {
        let g = ground(3);
        let mut wl = Worklist::new();
        let first = extend(&g, &g.base_family(), 0b001, &Family::empty(), &mut wl).unwrap();
        let second = extend(&g, &first, 0b010, &Family::empty(), &mut wl).unwrap();
        assert_eq!(second.len(), 8);
    }

    #[test]
    fn test_extend_contradiction_on_excluded_complement() {
        let g = ground(3);
        let mut wl = Worklist::new();
        let excluded: Family = [0b110].into_iter().collect();
        let err = extend(&g, &g.base_family(), 0b001, &excluded, &mut wl).unwrap_err();
        assert_eq!(err, Contradiction { subset: 0b110 });
    }

    #[test]
    fn test_extend_contradiction_on_excluded_union() {
        let g = ground(3);
        let mut wl = Worklist::new();
        let first = extend(&g, &g.base_family(), 0b001, &Family::empty(), &mut wl).unwrap();
        // {0} と {1} の和 {0,1} を除外しておくと {1} は入れられない
        let excluded: Family = [0b011, 0b100].into_iter().collect();
        assert!(extend(&g, &first, 0b010, &excluded, &mut wl).is_err());
    }

    #[test]
    fn test_extend_is_noop_when_present() {
        let g = ground(4);
        let mut wl = Worklist::new();
        let closed = extend(&g, &g.base_family(), 0b0011, &Family::empty(), &mut wl).unwrap();
        let again = extend(&g, &closed, 0b0011, &Family::empty(), &mut wl).unwrap();
        assert_eq!(again, closed);
    }

    #[test]
    fn test_extend_does_not_touch_inputs() {
        let g = ground(3);
        let mut wl = Worklist::new();
        let base = g.base_family();
        let excluded: Family = [0b110].into_iter().collect();
        let _ = extend(&g, &base, 0b001, &excluded, &mut wl);
        assert_eq!(base, g.base_family());
        assert_eq!(excluded.len(), 1);
    }

    #[test]
    fn test_extend_uses_second_word_for_n7() {
        let g = ground(7);
        let mut wl = Worklist::new();
        let closed = extend(&g, &g.base_family(), 1, &Family::empty(), &mut wl).unwrap();
        assert!(closed.contains(126));
        assert!(is_dynkin(&g, &closed));
    }

    #[test]
    fn test_is_dynkin() {
        let g = ground(2);
        assert!(is_dynkin(&g, &g.base_family()));
        assert!(!is_dynkin(&g, &[0, 1, 3].into_iter().collect()));
        assert!(!is_dynkin(&g, &[3].into_iter().collect()));
        // n=3 で {0},{1} を含むのに {0,1} を含まない
        let g3 = ground(3);
        let f: Family = [0, 0b001, 0b110, 0b010, 0b101, 0b111].into_iter().collect();
        assert!(!is_dynkin(&g3, &f));
    }
}
