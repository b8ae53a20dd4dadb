//! 共享随机源
//!
//! 加权选择唯一的可变共享状态。用一把锁保护 `StdRng`，
//! 测试时可注入固定种子。

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

static GLOBAL_RNG: Lazy<SharedRng> = Lazy::new(SharedRng::from_entropy);

/// 线程安全的随机源
#[derive(Debug)]
pub struct SharedRng {
    inner: Mutex<StdRng>,
}

impl SharedRng {
    /// 使用系统熵初始化
    pub fn from_entropy() -> Self {
        Self {
            inner: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// 使用固定种子初始化，结果可复现
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// 进程级默认随机源
    pub fn global() -> &'static SharedRng {
        &GLOBAL_RNG
    }

    /// 均匀抽取 [0, upper) 内的整数，`upper` 为 0 时返回 0
    pub fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        self.inner.lock().gen_range(0..upper)
    }

    /// 同 `below`，用于超出 u64 的权重总和
    pub fn below_u128(&self, upper: u128) -> u128 {
        if upper == 0 {
            return 0;
        }
        self.inner.lock().gen_range(0..upper)
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
