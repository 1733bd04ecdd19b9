/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Module trait 与 ModuleHandle - 模块组合的内核
 *
 * 设计要点：
 * - 组合通过显式的 `register(name, component)` 完成，不靠属性赋值之类的隐式手段
 * - 层级多态用 trait 对象表达（而不是深继承树）：任何实现了 Module 的类型
 *   都能被挂进模块树
 * - 基础抽象不规定子组件的前向编排顺序：注册顺序只约束遍历/展示的确定性，
 *   前向的串联由具体组合模块在自己的 forward 里手写
 */

use super::descriptor::{ChildDescriptor, ModuleDescriptor, ParamDescriptor};
use super::display::format_module_display;
use super::error::ModuleError;
use super::parameter::{ParamId, Parameter};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

// ==================== ModuleId ====================

static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(0);

/// 模块的全局唯一标识。环检测与所有权校验都依赖它
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ModuleId(u64);

impl ModuleId {
    pub(crate) fn next() -> Self {
        Self(NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==================== Module trait ====================

/// 模块 trait - 一切层（Layer）与组合模块的公共接口
///
/// # 设计原则
/// - `forward()` 是唯一必须手写语义的方法：叶子层在这里调用张量能力，
///   组合模块在这里显式编排子组件
/// - `parameters()`/`children()`/`set_training()` 都有基于 `children()`
///   的默认实现，叶子层与常规组合模块无需重写遍历逻辑
/// - `new()` **不是** trait 方法（各层参数各异）
///
/// # 使用示例
///
/// ```ignore
/// use mini_torch::nn::{Block, Linear, Module, ModuleError, ModuleHandle, ReLU};
/// use mini_torch::tensor::Tensor;
///
/// struct Mlp {
///     registry: Block,
///     fc1: ModuleHandle,
///     act: ModuleHandle,
///     fc2: ModuleHandle,
/// }
///
/// impl Mlp {
///     fn new(in_dim: usize, hidden: usize, out_dim: usize) -> Result<Self, ModuleError> {
///         let mut registry = Block::new("mlp");
///         let fc1 = registry.register("fc1", Linear::new(in_dim, hidden, true, "fc1")?.into_handle())?;
///         let act = registry.register("act", ReLU::new().into_handle())?;
///         let fc2 = registry.register("fc2", Linear::new(hidden, out_dim, true, "fc2")?.into_handle())?;
///         Ok(Mlp { registry, fc1, act, fc2 })
///     }
/// }
///
/// impl Module for Mlp {
///     fn id(&self) -> mini_torch::nn::ModuleId { self.registry.id() }
///     fn name(&self) -> &str { self.registry.name() }
///     fn kind(&self) -> &'static str { "Mlp" }
///     fn children(&self) -> Vec<(String, ModuleHandle)> { self.registry.children() }
///     fn set_training(&mut self, training: bool) { self.registry.set_training(training); }
///     fn is_training(&self) -> bool { self.registry.is_training() }
///
///     // 前向编排是手写的：fc1 → act → fc2
///     fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModuleError> {
///         let hidden = self.fc1.forward(input)?;
///         let hidden = self.act.forward(&hidden)?;
///         self.fc2.forward(&hidden)
///     }
/// }
/// ```
pub trait Module {
    /// 模块的唯一标识
    fn id(&self) -> ModuleId;

    /// 模块名称（用于展示与参数归属标记）
    fn name(&self) -> &str;

    /// 模块类型名（如"Linear"、"Block"）
    fn kind(&self) -> &'static str;

    /// 前向传播：把输入张量映射为输出张量。
    /// 形状违约须上抛`ShapeMismatch`，内核不做任何恢复
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModuleError>;

    /// 本模块**直接**拥有的参数（不含子组件的）。叶子层按声明顺序返回，
    /// 无参数的模块用默认实现即可
    fn own_parameters(&self) -> Vec<Parameter> {
        Vec::new()
    }

    /// 直接子组件的`(名称, 句柄)`序列，按注册顺序。
    /// 对未变动的树，重复调用必须产出相同的序列（参数遍历、展示与
    /// 外部序列化器都依赖这一确定性）
    fn children(&self) -> Vec<(String, ModuleHandle)> {
        Vec::new()
    }

    /// 把`child`注册为本模块名为`name`的子组件。
    /// 默认拒绝：叶子层没有子组件。支持注册的组合模块（如`Block`）会重写本方法
    fn register(&mut self, name: &str, child: ModuleHandle) -> Result<ModuleHandle, ModuleError> {
        let _ = child;
        Err(ModuleError::InvalidOperation(format!(
            "{}不支持注册子组件`{}`",
            format_module_display(self.id(), self.name(), self.kind()),
            name
        )))
    }

    /// 设置训练/推理模式，自顶向下传播到所有后代。
    /// Dropout这类前向行为依赖模式的层要求传播必须触达每个实例
    fn set_training(&mut self, training: bool) {
        for (_, child) in self.children() {
            child.set_training(training);
        }
    }

    /// 是否处于训练模式。无模式状态的模块（Linear、ReLU）默认视为训练模式
    fn is_training(&self) -> bool {
        true
    }

    /// 递归收集本模块子树内的全部参数：深度优先，先本模块自有参数、
    /// 后子组件（按注册顺序）。
    ///
    /// 独占所有权保证每个参数只会出现一次；若同一模块/参数经由多条路径可达，
    /// 说明树不变式已被破坏，返回`OwnershipInvariantViolation`而不是静默去重
    fn parameters(&self) -> Result<Vec<Parameter>, ModuleError> {
        let mut seen_modules = HashSet::new();
        let mut seen_params = HashSet::new();
        let mut result = Vec::new();
        seen_modules.insert(self.id());
        collect_own_parameters(
            self.own_parameters(),
            self.name(),
            &mut seen_params,
            &mut result,
        )?;
        for (_, child) in self.children() {
            collect_parameters_recursive(&child, &mut seen_modules, &mut seen_params, &mut result)?;
        }
        Ok(result)
    }

    /// 获取参数张量的个数
    fn num_params(&self) -> Result<usize, ModuleError> {
        Ok(self.parameters()?.len())
    }

    /// 生成本模块子树的结构化描述（供展示与外部序列化器使用）
    fn describe(&self) -> ModuleDescriptor {
        ModuleDescriptor {
            id: self.id(),
            name: self.name().to_string(),
            kind: self.kind().to_string(),
            training: self.is_training(),
            params: self
                .own_parameters()
                .iter()
                .map(ParamDescriptor::from_parameter)
                .collect(),
            children: self
                .children()
                .into_iter()
                .map(|(child_name, child)| ChildDescriptor {
                    name: child_name,
                    module: child.describe(),
                })
                .collect(),
        }
    }

    /// 把模块装入句柄，便于注册与共享访问
    fn into_handle(self) -> ModuleHandle
    where
        Self: Sized + 'static,
    {
        ModuleHandle::from(self)
    }
}

// ==================== 参数遍历 ====================

fn collect_own_parameters(
    own: Vec<Parameter>,
    module_name: &str,
    seen_params: &mut HashSet<ParamId>,
    result: &mut Vec<Parameter>,
) -> Result<(), ModuleError> {
    for param in own {
        if !seen_params.insert(param.id()) {
            return Err(ModuleError::OwnershipInvariantViolation(format!(
                "参数`{}`（id={}，归属`{}`）在模块树中出现了多于一次",
                param.name(),
                param.id(),
                module_name
            )));
        }
        result.push(param);
    }
    Ok(())
}

fn collect_parameters_recursive(
    handle: &ModuleHandle,
    seen_modules: &mut HashSet<ModuleId>,
    seen_params: &mut HashSet<ParamId>,
    result: &mut Vec<Parameter>,
) -> Result<(), ModuleError> {
    let module = handle.inner.borrow();
    if !seen_modules.insert(module.id()) {
        return Err(ModuleError::OwnershipInvariantViolation(format!(
            "{}在模块树中出现了多于一次",
            format_module_display(module.id(), module.name(), module.kind())
        )));
    }
    collect_own_parameters(module.own_parameters(), module.name(), seen_params, result)?;
    for (_, child) in module.children() {
        collect_parameters_recursive(&child, seen_modules, seen_params, result)?;
    }
    Ok(())
}

// ==================== ModuleHandle ====================

/// 模块句柄 - 携带内部可变性的共享访问凭证
///
/// # 设计原则
/// - 持有 `Rc<RefCell<dyn Module>>`，Clone 开销极低
/// - 注册、遍历与模式传播都以句柄为流通货币
/// - Rc/RefCell 使模块树天然 `!Send`/`!Sync`：并发场景须每个线程
///   自建一棵树（或由调用方在外部串行化），这正是本内核的并发契约
#[derive(Clone)]
pub struct ModuleHandle {
    inner: Rc<RefCell<dyn Module>>,
}

impl<M: Module + 'static> From<M> for ModuleHandle {
    fn from(module: M) -> Self {
        Self {
            inner: Rc::new(RefCell::new(module)),
        }
    }
}

impl ModuleHandle {
    pub fn id(&self) -> ModuleId {
        self.inner.borrow().id()
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name().to_string()
    }

    pub fn kind(&self) -> &'static str {
        self.inner.borrow().kind()
    }

    /// 前向传播（转发给内部模块）
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, ModuleError> {
        self.inner.borrow_mut().forward(input)
    }

    /// 把`child`注册为本模块名为`name`的子组件，成功时返回子组件句柄
    /// （注册即返回组件，方便调用方存下句柄用于前向编排）。
    ///
    /// # 错误
    /// - `DuplicateName`: `name`已被直接子组件占用
    /// - `Cycle`: `child`是本模块自身或其祖先
    /// - `InvalidOperation`: 内部模块不支持注册（叶子层）
    pub fn register(
        &self,
        name: &str,
        child: impl Into<ModuleHandle>,
    ) -> Result<ModuleHandle, ModuleError> {
        let child = child.into();
        // 环检测须在可变借用之前完成：自注册时对子树的遍历会再次（不可变）借用本模块
        if child.subtree_contains(self.id()) {
            return Err(ModuleError::Cycle {
                module: self.name(),
                child: child.name(),
            });
        }
        self.inner.borrow_mut().register(name, child)
    }

    /// 直接子组件的`(名称, 句柄)`序列，按注册顺序
    pub fn children(&self) -> Vec<(String, ModuleHandle)> {
        self.inner.borrow().children()
    }

    /// 递归收集子树内全部参数（深度优先、确定性顺序）
    pub fn parameters(&self) -> Result<Vec<Parameter>, ModuleError> {
        self.inner.borrow().parameters()
    }

    /// 获取参数张量的个数
    pub fn num_params(&self) -> Result<usize, ModuleError> {
        self.inner.borrow().num_params()
    }

    /// 设置训练/推理模式（递归传播到所有后代）
    pub fn set_training(&self, training: bool) {
        self.inner.borrow_mut().set_training(training);
    }

    /// 切换到训练模式
    pub fn set_train_mode(&self) {
        self.set_training(true);
    }

    /// 切换到推理模式
    pub fn set_eval_mode(&self) {
        self.set_training(false);
    }

    pub fn is_train_mode(&self) -> bool {
        self.inner.borrow().is_training()
    }

    /// 生成子树的结构化描述
    pub fn describe(&self) -> ModuleDescriptor {
        self.inner.borrow().describe()
    }

    /// 检查两个句柄是否指向同一个模块
    pub fn same_module(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// 判断本句柄指向的子树（含自身）中是否存在id为`id`的模块
    pub(crate) fn subtree_contains(&self, id: ModuleId) -> bool {
        let module = self.inner.borrow();
        if module.id() == id {
            return true;
        }
        module
            .children()
            .iter()
            .any(|(_, child)| child.subtree_contains(id))
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = self.inner.borrow();
        f.debug_struct("ModuleHandle")
            .field("id", &module.id())
            .field("name", &module.name())
            .field("kind", &module.kind())
            .finish()
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::display::render_module_tree(&self.describe(), f, 0)
    }
}
