//! Core item model: type normalization, pool building and best-fit lookup

pub mod bisect;
pub mod category;
pub mod item;
pub mod pool;

pub use bisect::{FIT_TOLERANCE, SUM_PRECISION, best_fit, fits, upper_bound};
pub use category::{TYPE_SUFFIX, UnitType, normalize_type, normalize_type_value};
pub use item::{PoolItem, RawItem};
pub use pool::{CandidatePool, PoolFilter, PoolStats};
