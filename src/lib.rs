//! Dynkin 系の数え上げ
//!
//! 台集合 Ω = {0, …, n-1} (0 ≤ n ≤ 7) 上の Dynkin 系
//! （∅ と Ω を含み、補集合と互いに素な和について閉じた集合族）の個数を数える。
//!
//! 集合族は部分集合をインデックスとする 128 ビットのビット集合で表し、
//! 閉包計算 → バックトラック探索 → 最上位分岐の並列化（Rayon）の順に組み立てる。

pub mod closure;
pub mod driver;
pub mod enumerate;
pub mod error;
pub mod family;
pub mod ground;
pub mod verify;

pub use closure::{extend, is_dynkin, Contradiction, Worklist};
pub use driver::{count_systems_parallel, count_systems_serial, prefix_exclusions, CountResult, Driver, DriverConfig};
pub use enumerate::{count, walk};
pub use error::Error;
pub use family::Family;
pub use ground::{GroundSet, Subset, MAX_N, MAX_SUBSETS};
pub use verify::{brute_force_count, systems, verify_counts, VerifyResult, BRUTE_FORCE_MAX_N, KNOWN_COUNTS};
