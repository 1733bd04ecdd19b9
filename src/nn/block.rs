/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Block - 通用组合模块（命名子组件注册表）
 */

use super::error::ModuleError;
use super::module::{Module, ModuleHandle, ModuleId};
use crate::tensor::Tensor;

/// 通用组合模块：持有`名称 → 子组件`的有序注册表
///
/// # 设计原则
/// - 注册顺序即`children()`/参数遍历/展示的顺序，对未变动的树完全确定
/// - 子组件的所有权是独占的：重名注册、环状注册都会在注册期被拒绝
/// - `Block`**不**定义前向编排：注册顺序不隐含“依次串联”的语义，
///   前向的接线由具体组合模块在自己的`forward`里显式手写
///   （参见`Module` trait文档中的`Mlp`示例）
///
/// # 使用示例
/// ```
/// use mini_torch::nn::{Block, Linear, Module, ModuleError, ReLU};
///
/// let mut net = Block::new("net");
/// let fc1 = net.register("fc1", Linear::new(4, 8, true, "fc1")?)?;
/// let act = net.register("act", ReLU::new())?;
/// assert_eq!(net.children().len(), 2);
/// assert_eq!(net.num_params()?, 2); // fc1_W 与 fc1_b
/// # Ok::<(), ModuleError>(())
/// ```
pub struct Block {
    id: ModuleId,
    name: String,
    /// 有序注册表：`(注册名, 子组件句柄)`
    children: Vec<(String, ModuleHandle)>,
    training: bool,
}

impl Block {
    /// 创建空的组合模块，初始为训练模式
    pub fn new(name: &str) -> Self {
        Self {
            id: ModuleId::next(),
            name: name.to_string(),
            children: Vec::new(),
            training: true,
        }
    }

    /// 注册子组件：接受任何可转为句柄的模块，成功时返回注册后的句柄。
    /// 与trait版`Module::register`语义一致，只是入参更宽松（便于直接传层的值）
    pub fn register(
        &mut self,
        name: &str,
        child: impl Into<ModuleHandle>,
    ) -> Result<ModuleHandle, ModuleError> {
        Module::register(self, name, child.into())
    }

    /// 按注册名查找直接子组件
    pub fn child(&self, name: &str) -> Option<ModuleHandle> {
        self.children
            .iter()
            .find(|(child_name, _)| child_name == name)
            .map(|(_, handle)| handle.clone())
    }

    /// 直接子组件的个数
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Module for Block {
    fn id(&self) -> ModuleId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "Block"
    }

    /// 裸`Block`没有前向语义：基础组合机制不规定子组件的串联顺序。
    /// 需要前向传播时，请定义自己的组合模块并显式编排（见`Module`文档）
    fn forward(&mut self, _input: &Tensor) -> Result<Tensor, ModuleError> {
        Err(ModuleError::InvalidOperation(format!(
            "Block`{}`不定义前向传播：子组件的串联须由具体组合模块在自己的forward里显式编排",
            self.name
        )))
    }

    fn children(&self) -> Vec<(String, ModuleHandle)> {
        self.children.clone()
    }

    fn register(&mut self, name: &str, child: ModuleHandle) -> Result<ModuleHandle, ModuleError> {
        // 1. 名称查重：重名注册会静默孤立此前的子组件，并破坏遍历顺序的稳定性，故直接拒绝
        if self.children.iter().any(|(child_name, _)| child_name == name) {
            return Err(ModuleError::DuplicateName(name.to_string()));
        }

        // 2. 环检测：child是本模块自身或其祖先时，注册会让所有权成环
        if child.subtree_contains(self.id) {
            return Err(ModuleError::Cycle {
                module: self.name.clone(),
                child: child.name(),
            });
        }

        // 3. 插入注册表并返回句柄，注册立即对遍历可见
        self.children.push((name.to_string(), child.clone()));
        Ok(child)
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
        for (_, child) in &self.children {
            child.set_training(training);
        }
    }

    fn is_training(&self) -> bool {
        self.training
    }
}
