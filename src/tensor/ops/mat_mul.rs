use crate::tensor::Tensor;
use ndarray::{Array, Ix2, IxDyn};

impl Tensor {
    /// 实现矩阵乘法。只接受2阶张量，否则会触发panic。
    /// 需要保证前一个张量的列数（col）等于后一个张量的行数（row），否则也会触发panic。
    pub fn mat_mul(&self, other: &Tensor) -> Tensor {
        // 检查输入的张量维度
        assert!(self.dimension() == 2, "输入的张量维度必须为2");
        assert!(other.dimension() == 2, "输入的张量维度必须为2");
        // 检查前一个张量的列数是否等于后一个张量的行数
        assert!(
            self.shape()[1] == other.shape()[0],
            "前一个张量的列数必须等于后一个张量的行数"
        );
        // 将动态维度数组转换为常量维度数组
        let self_data = self.data.view().into_dimensionality::<Ix2>().unwrap();
        let other_data = other.data.view().into_dimensionality::<Ix2>().unwrap();
        // 执行矩阵乘法
        let result_data = self_data.dot(&other_data);
        // 创建并返回新的张量
        Tensor {
            data: result_data.into_dyn(),
        }
    }

    /// 沿最后一维做矩阵乘法：`[..., k] @ [k, n] -> [..., n]`。
    ///
    /// 前导维度全部保留（等价于把前导维度摊平成batch后做二阶矩阵乘再摊回）。
    /// `Linear`层借助本运算实现对任意前导维度的广播。
    ///
    /// # Panics
    /// - `other`不是2阶张量
    /// - `self`是标量（没有最后一维）
    /// - `self`的最后一维不等于`other`的行数
    pub fn mat_mul_last_dim(&self, other: &Tensor) -> Tensor {
        assert!(other.dimension() == 2, "右操作数的张量维度必须为2");
        let k = self.last_dim().expect("左操作数至少需要1个维度");
        assert!(
            k == other.shape()[0],
            "前一个张量的最后一维必须等于后一个张量的行数"
        );
        let n = other.shape()[1];

        // 摊平前导维度: [..., k] -> [m, k]
        let m = self.size() / k;
        let flat = Array::from_shape_vec((m, k), self.data.iter().copied().collect::<Vec<_>>())
            .unwrap();
        let rhs = other.data.view().into_dimensionality::<Ix2>().unwrap();
        let result = flat.dot(&rhs);

        // 摊回前导维度: [m, n] -> [..., n]
        let mut result_shape = self.shape().to_vec();
        *result_shape.last_mut().unwrap() = n;
        Tensor {
            data: Array::from_shape_vec(IxDyn(&result_shape), result.into_raw_vec()).unwrap(),
        }
    }
}
