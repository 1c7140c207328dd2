//! バックトラック探索。
//!
//! 探索木の各ノードは閉じた集合族 `included` と、その枝で含まれないことが確定した `excluded` の組。
//! ノード自身（「これ以上加えない」葉）を1と数え、代表元 m を昇順に試す。
//! m を含める枝は再帰し、m を含めない兄弟枝は以降の反復の `excluded` に m と Ω\m を加えることで表す。
//! この `excluded` を反復間で受け渡す畳み込みとして書いている。

use crate::closure::{self, Worklist};
use crate::family::Family;
use crate::ground::{GroundSet, Subset};

/// `lower_bound` 以上の代表元だけを未決定として、到達可能な Dynkin 系の数を返す（常に ≥ 1）。
pub fn count(ground: &GroundSet, lower_bound: Subset, included: &Family, excluded: Family) -> u64 {
    let mut worklist = Worklist::new();
    search(ground, lower_bound, included, excluded, &mut worklist, &mut |_: &Family| {})
}

/// [`count`] と同じ探索を行い、数えたノードの集合族ごとに `visit` を呼ぶ。
pub fn walk<F: FnMut(&Family)>(
    ground: &GroundSet,
    lower_bound: Subset,
    included: &Family,
    excluded: Family,
    visit: &mut F,
) -> u64 {
    let mut worklist = Worklist::new();
    search(ground, lower_bound, included, excluded, &mut worklist, visit)
}

/// ワークリストを呼び出し側から借りる版。並列ドライバのワーカーが使う。
pub(crate) fn count_with(
    ground: &GroundSet,
    lower_bound: Subset,
    included: &Family,
    excluded: Family,
    worklist: &mut Worklist,
) -> u64 {
    search(ground, lower_bound, included, excluded, worklist, &mut |_: &Family| {})
}

// 再帰の深さは代表元の数 (n=7 で 64) で抑えられる。
fn search<F: FnMut(&Family)>(
    ground: &GroundSet,
    lower_bound: Subset,
    included: &Family,
    excluded: Family,
    worklist: &mut Worklist,
    visit: &mut F,
) -> u64 {
    visit(included);

    let (total, _) = (lower_bound..ground.limit()).fold((1u64, excluded), |(total, mut excluded), m| {
        // m と Ω\m は常に同時に決まり、含める側と除外する側は交わらない
        debug_assert_eq!(
            excluded.contains(m),
            excluded.contains(ground.complement(m)),
            "representative {} excluded without its complement",
            m
        );
        debug_assert!(included.is_disjoint(&excluded), "included and excluded overlap");

        if included.contains(m) || excluded.contains(m) {
            // 以前の閉包で強制済み
            return (total, excluded);
        }

        let branch = match closure::extend(ground, included, m, &excluded, worklist) {
            Ok(closed) => search(ground, m + 1, &closed, excluded, worklist, visit),
            Err(_) => 0,
        };

        // 以降の反復は「m を含めない」兄弟枝
        let before = excluded;
        excluded.insert(m);
        excluded.insert(ground.complement(m));
        debug_assert!(before.is_subset(&excluded));
        (total + branch, excluded)
    });
    total
}
