/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : nn 模块的错误类型
 */

use thiserror::Error;

/// 模块组合与前向传播的错误类型
///
/// 本内核不做任何内部重试：所有错误都原样上抛给调用方（训练循环）。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModuleError {
    /// 注册期错误：同一模块的直接子组件重名
    #[error("名称`{0}`已被本模块的直接子组件占用，不允许重复注册")]
    DuplicateName(String),

    /// 注册期错误：把模块注册为它自己（或其祖先）的子组件
    #[error("检测到环状注册：组件`{child}`是模块`{module}`的祖先或其自身")]
    Cycle { module: String, child: String },

    /// 前向期错误：输入形状违反层的契约
    #[error("形状不匹配：期望{expected:?}，实际{got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    /// 构造期错误：非法入参（如dropout概率越界、层维度为0）
    #[error("非法参数：{0}")]
    InvalidArgument(String),

    /// 遍历期错误：模块树的独占所有权不变式被破坏（同一组件/参数被挂到了多个父模块下）。
    /// 不该触及本错误，否则说明注册侧的代码有问题；调用方应视为致命错误而不是静默去重
    #[error("所有权不变式被破坏：{0}")]
    OwnershipInvariantViolation(String),

    /// 对模块做了它不支持的操作（如向叶子层注册子组件、对裸Block做前向传播）
    #[error("非法操作：{0}")]
    InvalidOperation(String),
}
