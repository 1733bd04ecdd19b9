/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 张量的减法，语义与加法一致（NumPy 风格广播），只是运算符不同。
 *                 外部优化器按`w - lr * grad`更新参数时会用到本运算。
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;
use crate::tensor::shape::broadcast_shape;
use ndarray::IxDyn;
use std::ops::Sub;

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓f32 -（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Sub<Tensor> for f32 {
    type Output = Tensor;

    fn sub(self, tensor: Tensor) -> Tensor {
        Tensor {
            data: self - &tensor.data,
        }
    }
}
impl<'a> Sub<&'a Tensor> for f32 {
    type Output = Tensor;

    fn sub(self, tensor: &'a Tensor) -> Tensor {
        Tensor {
            data: self - &tensor.data,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑f32 -（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 - f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Sub<f32> for Tensor {
    type Output = Self;

    fn sub(self, scalar: f32) -> Self {
        Self {
            data: &self.data - scalar,
        }
    }
}
impl Sub<f32> for &Tensor {
    type Output = Tensor;

    fn sub(self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data - scalar,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 - f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 -（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Sub for Tensor {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        sub_within_tensors(&self, &other)
    }
}

impl<'a> Sub<&'a Self> for Tensor {
    type Output = Self;

    fn sub(self, other: &'a Self) -> Self {
        sub_within_tensors(&self, other)
    }
}

impl Sub<Tensor> for &Tensor {
    type Output = Tensor;

    fn sub(self, other: Tensor) -> Tensor {
        sub_within_tensors(self, &other)
    }
}

impl<'b> Sub<&'b Tensor> for &Tensor {
    type Output = Tensor;

    fn sub(self, other: &'b Tensor) -> Tensor {
        sub_within_tensors(self, other)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 -（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/// 两个张量相减，支持 NumPy 风格广播（broadcasting）
///
/// # Panics
/// 如果形状不兼容（无法广播）
fn sub_within_tensors(tensor_1: &Tensor, tensor_2: &Tensor) -> Tensor {
    let shape = broadcast_shape(tensor_1.shape(), tensor_2.shape());
    assert!(shape.is_some(), "{}", TensorError::IncompatibleShape);
    let shape = IxDyn(&shape.unwrap());
    let view_1 = tensor_1.data.broadcast(shape.clone()).unwrap();
    let view_2 = tensor_2.data.broadcast(shape).unwrap();
    Tensor {
        data: &view_1 - &view_2,
    }
}
