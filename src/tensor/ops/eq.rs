use crate::tensor::Tensor;
use std::cmp::PartialEq;

/// 两个张量相等，当且仅当形状与逐元素的值都相等
impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
