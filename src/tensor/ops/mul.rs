/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 张量的乘法：张量与纯数相乘（广播到每个元素），
 *                 以及两个张量的逐元素相乘（NumPy 风格广播）。
 *                 注意：这是逐元素乘（Hadamard积），不是矩阵乘，后者见mat_mul.rs。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use crate::tensor::shape::broadcast_shape;
use ndarray::IxDyn;
use std::ops::Mul;

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓f32 *（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Mul<Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, tensor: Tensor) -> Tensor {
        Tensor {
            data: self * &tensor.data,
        }
    }
}
impl<'a> Mul<&'a Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, tensor: &'a Tensor) -> Tensor {
        Tensor {
            data: self * &tensor.data,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑f32 *（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 * f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Mul<f32> for Tensor {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            data: &self.data * scalar,
        }
    }
}
impl Mul<f32> for &Tensor {
    type Output = Tensor;

    fn mul(self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data * scalar,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 * f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 *（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Mul for Tensor {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        mul_within_tensors(&self, &other)
    }
}

impl<'a> Mul<&'a Self> for Tensor {
    type Output = Self;

    fn mul(self, other: &'a Self) -> Self {
        mul_within_tensors(&self, other)
    }
}

impl Mul<Tensor> for &Tensor {
    type Output = Tensor;

    fn mul(self, other: Tensor) -> Tensor {
        mul_within_tensors(self, &other)
    }
}

impl<'b> Mul<&'b Tensor> for &Tensor {
    type Output = Tensor;

    fn mul(self, other: &'b Tensor) -> Tensor {
        mul_within_tensors(self, other)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 *（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/// 两个张量逐元素相乘，支持 NumPy 风格广播（broadcasting）
///
/// # Panics
/// 如果形状不兼容（无法广播）
fn mul_within_tensors(tensor_1: &Tensor, tensor_2: &Tensor) -> Tensor {
    let shape = broadcast_shape(tensor_1.shape(), tensor_2.shape());
    assert!(
        shape.is_some(),
        "{}",
        TensorError::OperatorError {
            operator: Operator::Mul,
            tensor1_shape: tensor_1.shape().to_vec(),
            tensor2_shape: tensor_2.shape().to_vec(),
        }
    );
    let shape = IxDyn(&shape.unwrap());
    let view_1 = tensor_1.data.broadcast(shape.clone()).unwrap();
    let view_2 = tensor_2.data.broadcast(shape).unwrap();
    Tensor {
        data: &view_1 * &view_2,
    }
}
