//! 加权选择模块
//!
//! - `rng` - 可注入的共享随机源
//! - `weighted` - 按权重比例挑选候选

mod rng;
mod weighted;

pub use rng::SharedRng;
pub use weighted::{select_by, select_index};
