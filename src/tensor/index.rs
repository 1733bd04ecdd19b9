use super::Tensor;
use ndarray::{IxDyn, NdIndex};
use std::ops::Index;

/// 按多维下标取元素，如`t[[1, 2]]`；下标越界会触发panic
impl<I> Index<I> for Tensor
where
    I: NdIndex<IxDyn>,
{
    type Output = f32;

    fn index(&self, index: I) -> &Self::Output {
        &self.data[index]
    }
}
