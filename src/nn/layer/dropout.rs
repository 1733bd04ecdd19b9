/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Dropout 正则化层
 */

use crate::nn::{Module, ModuleError, ModuleId};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Dropout 正则化层
///
/// 训练模式下，每个元素独立地以概率`p`置零，存活元素缩放`1/(1-p)`
/// （反向缩放，保证激活值的期望不变）；推理（eval）模式下是恒等映射。
///
/// 正因为前向行为依赖模式，模式传播（`set_training`）必须在前向传播前
/// 触达树中的每个 Dropout 实例。
///
/// # 随机性
/// 每个实例持有自己的可播种随机源（构造时注入种子），
/// 不依赖全局熵：测试可重复，多棵树之间也不会竞争共享的随机状态。
pub struct Dropout {
    id: ModuleId,
    name: String,
    /// 置零概率，须在[0, 1)内
    p: f32,
    /// 训练模式标志
    training: bool,
    /// 本实例专属的随机源
    rng: StdRng,
}

impl Dropout {
    /// 创建新的 Dropout 层（随机源取自系统熵）
    ///
    /// # 错误
    /// `p`不在[0, 1)内时返回`InvalidArgument`（p=1会让缩放因子除零，故不允许）
    pub fn new(p: f32) -> Result<Self, ModuleError> {
        Self::check_probability(p)?;
        Ok(Self {
            id: ModuleId::next(),
            name: "dropout".to_string(),
            p,
            training: true,
            rng: StdRng::from_entropy(),
        })
    }

    /// 创建新的 Dropout 层（带种子，掩码序列可重复）
    pub fn new_seeded(p: f32, seed: u64) -> Result<Self, ModuleError> {
        Self::check_probability(p)?;
        Ok(Self {
            id: ModuleId::next(),
            name: "dropout".to_string(),
            p,
            training: true,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn check_probability(p: f32) -> Result<(), ModuleError> {
        if !(0.0..1.0).contains(&p) {
            return Err(ModuleError::InvalidArgument(format!(
                "Dropout的置零概率必须在[0, 1)内，但得到{p}"
            )));
        }
        Ok(())
    }

    /// 获取置零概率
    pub fn p(&self) -> f32 {
        self.p
    }
}

impl Module for Dropout {
    fn id(&self) -> ModuleId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "Dropout"
    }

    /// 前向传播：训练模式下乘以随机掩码，推理模式下恒等
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModuleError> {
        if !self.training {
            return Ok(input.clone());
        }
        let mask = Tensor::new_dropout_mask_with_rng(self.p, input.shape(), &mut self.rng);
        Ok(input * &mask)
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }
}
