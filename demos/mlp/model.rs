//! MLP 模型定义
//!
//! ## 网络结构
//! ```text
//! Input(4) -> Linear(8) -> ReLU -> Linear(2) -> Dropout(0.5)
//! ```
//!
//! 前向编排是手写的：注册表（`Block`）只负责参数遍历的顺序与模式传播，
//! 不会根据注册顺序自动串联子组件。

use mini_torch::nn::{
    Block, Dropout, Linear, Module, ModuleError, ModuleHandle, ModuleId, ReLU,
};
use mini_torch::tensor::Tensor;

/// 带 dropout 正则化的多层感知机
pub struct Mlp {
    registry: Block,
    l1: ModuleHandle,
    relu: ModuleHandle,
    l2: ModuleHandle,
    dropout: ModuleHandle,
}

impl Mlp {
    pub fn new_seeded(seed: u64) -> Result<Self, ModuleError> {
        let mut registry = Block::new("mlp");
        let l1 = registry.register("l1", Linear::new_seeded(4, 8, true, "l1", seed)?)?;
        let relu = registry.register("relu", ReLU::new())?;
        let l2 = registry.register("l2", Linear::new_seeded(8, 2, true, "l2", seed + 1)?)?;
        let dropout = registry.register("dropout", Dropout::new_seeded(0.5, seed + 2)?)?;
        Ok(Self {
            registry,
            l1,
            relu,
            l2,
            dropout,
        })
    }
}

impl Module for Mlp {
    fn id(&self) -> ModuleId {
        self.registry.id()
    }

    fn name(&self) -> &str {
        self.registry.name()
    }

    fn kind(&self) -> &'static str {
        "Mlp"
    }

    fn children(&self) -> Vec<(String, ModuleHandle)> {
        self.registry.children()
    }

    fn set_training(&mut self, training: bool) {
        self.registry.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.registry.is_training()
    }

    /// 手写的前向编排：l1 → relu → l2 → dropout
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModuleError> {
        let hidden = self.l1.forward(input)?;
        let hidden = self.relu.forward(&hidden)?;
        let hidden = self.l2.forward(&hidden)?;
        self.dropout.forward(&hidden)
    }
}
