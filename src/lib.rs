//! # Mini Torch
//!
//! `mini_torch`项目旨在用纯rust实现仿照[pytorch](https://pytorch.org)的
//! 模块（Module）组合内核：层（Layer）的注册与嵌套、训练参数的发现与确定性遍历、
//! 以及由使用者显式编排的前向传播。
//!
//! 自动微分、优化器、损失函数与训练循环是外部协作者：本crate只暴露它们
//! 所依赖的结构骨架（`forward` + `parameters` + `children`）。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
