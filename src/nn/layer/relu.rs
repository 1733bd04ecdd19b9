/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : ReLU 激活层
 */

use crate::nn::{Module, ModuleError, ModuleId};
use crate::tensor::Tensor;

/// ReLU 激活层
///
/// forward: f(x) = max(x, 0)，逐元素
///
/// 无参数、无状态、与训练/推理模式无关；对任意形状的输入都成立，
/// 且满足幂等性：`relu(relu(x)) == relu(x)`
pub struct ReLU {
    id: ModuleId,
    name: String,
}

impl ReLU {
    pub fn new() -> Self {
        Self {
            id: ModuleId::next(),
            name: "relu".to_string(),
        }
    }
}

impl Default for ReLU {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for ReLU {
    fn id(&self) -> ModuleId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "ReLU"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModuleError> {
        Ok(input.where_with_f32(|x| x > 0.0, |x| x, |_| 0.0))
    }
}
