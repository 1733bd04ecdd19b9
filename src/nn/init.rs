/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 参数初始化策略
 */

use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 参数初始化策略
///
/// 权重布局约定为`[out_features, in_features]`，故扇入（fan_in）取形状的最后一维。
#[derive(Debug, Clone)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// Kaiming/He 初始化（适用于 `ReLU`）
    Kaiming,
    /// Xavier/Glorot 初始化（适用于 Sigmoid/Tanh）
    Xavier,
}

impl Init {
    /// 生成初始化后的 Tensor（使用全局 RNG）
    pub fn generate(&self, shape: &[usize]) -> Tensor {
        match self {
            Self::Constant(v) => &Tensor::ones(shape) * *v,
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::new_normal(*mean, *std, shape),
            Self::Kaiming => {
                let fan_in = shape.last().copied().unwrap_or(1);
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::new_normal(0.0, std, shape)
            }
            Self::Xavier => {
                let (fan_out, fan_in) = (shape[0], shape.last().copied().unwrap_or(1));
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::new_normal(0.0, std, shape)
            }
        }
    }

    /// 生成初始化后的 Tensor（使用指定的 RNG，保证可重复）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => &Tensor::ones(shape) * *v,
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::new_normal_with_rng(*mean, *std, shape, rng),
            Self::Kaiming => {
                let fan_in = shape.last().copied().unwrap_or(1);
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::new_normal_with_rng(0.0, std, shape, rng)
            }
            Self::Xavier => {
                let (fan_out, fan_in) = (shape[0], shape.last().copied().unwrap_or(1));
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::new_normal_with_rng(0.0, std, shape, rng)
            }
        }
    }
}
