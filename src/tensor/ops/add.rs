/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 张量的加法，实现了两个张量“逐元素”（或张量与纯数）相加的运算，并返回一个新的张量。
 *                 该运算支持以下情况：
 *                 1. 其中一个操作数为纯数而另一个为张量：则返回的张量形状与该张量相同。
 *                 2. 两个操作数均为张量：支持 NumPy 风格的广播（broadcasting）。
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;
use crate::tensor::shape::broadcast_shape;
use ndarray::IxDyn;
use std::ops::Add;

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓f32 +（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Add<Tensor> for f32 {
    type Output = Tensor;

    fn add(self, tensor: Tensor) -> Tensor {
        Tensor {
            data: self + &tensor.data,
        }
    }
}
impl<'a> Add<&'a Tensor> for f32 {
    type Output = Tensor;

    fn add(self, tensor: &'a Tensor) -> Tensor {
        Tensor {
            data: self + &tensor.data,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑f32 +（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 + f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Add<f32> for Tensor {
    type Output = Self;

    fn add(self, scalar: f32) -> Self {
        Self {
            data: &self.data + scalar,
        }
    }
}
impl Add<f32> for &Tensor {
    type Output = Tensor;

    fn add(self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data + scalar,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 + f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 +（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Add for Tensor {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        add_within_tensors(&self, &other)
    }
}

impl<'a> Add<&'a Self> for Tensor {
    type Output = Self;

    fn add(self, other: &'a Self) -> Self {
        add_within_tensors(&self, other)
    }
}

impl Add<Tensor> for &Tensor {
    type Output = Tensor;

    fn add(self, other: Tensor) -> Tensor {
        add_within_tensors(self, &other)
    }
}

impl<'b> Add<&'b Tensor> for &Tensor {
    type Output = Tensor;

    fn add(self, other: &'b Tensor) -> Tensor {
        add_within_tensors(self, other)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 +（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/// 两个张量相加，支持 NumPy 风格广播（broadcasting）
///
/// # Panics
/// 如果形状不兼容（无法广播）
fn add_within_tensors(tensor_1: &Tensor, tensor_2: &Tensor) -> Tensor {
    let shape = broadcast_shape(tensor_1.shape(), tensor_2.shape());
    assert!(shape.is_some(), "{}", TensorError::IncompatibleShape);
    // 双侧广播到公共形状后逐元素相加
    let shape = IxDyn(&shape.unwrap());
    let view_1 = tensor_1.data.broadcast(shape.clone()).unwrap();
    let view_2 = tensor_2.data.broadcast(shape).unwrap();
    Tensor {
        data: &view_1 + &view_2,
    }
}
