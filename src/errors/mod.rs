use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("张量形状不兼容（无法广播）")]
    IncompatibleShape,
}
