use thiserror::Error;

/// ライブラリ全体のエラー。
///
/// 閉包計算での矛盾（[`crate::Contradiction`]）は探索の枝刈り信号であり、ここには含めない。
#[derive(Debug, Error)]
pub enum Error {
    /// 固定長の集合族表現に収まらない台集合サイズ
    #[error("台集合サイズ n={n} は上限 {max} を超えています (ground set size n={n} exceeds the supported maximum {max})")]
    GroundSetTooLarge { n: u32, max: u32 },

    /// 総当たり検証が現実的な時間で終わらないサイズ
    #[error("総当たり検証は n={max} までです: n={n} (brute-force check is limited to n <= {max})")]
    BruteForceTooLarge { n: u32, max: u32 },

    #[error("スレッドプールを構築できません: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
