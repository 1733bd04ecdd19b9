/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 形状相关：广播兼容性判断、广播形状计算与二阶转置
 */

use super::Tensor;
use ndarray::Ix2;

impl Tensor {
    /// 判断两个张量是否可以按NumPy风格广播（broadcasting）
    ///
    /// # 广播规则
    /// - 从右向左对齐维度
    /// - 每个维度必须相等，或其中一个为1
    /// - 维度数不同时，较短的形状前面补1
    pub fn can_broadcast_with(&self, other: &Self) -> bool {
        broadcast_shape(self.shape(), other.shape()).is_some()
    }

    /// 转置一个2阶张量（矩阵），返回新张量。非2阶会触发panic。
    pub fn transpose(&self) -> Tensor {
        assert!(self.dimension() == 2, "转置仅支持2阶张量（矩阵）");
        let view = self.data.view().into_dimensionality::<Ix2>().unwrap();
        Tensor {
            data: view.t().as_standard_layout().to_owned().into_dyn(),
        }
    }
}

/// 计算两个形状按NumPy规则广播后的形状；不兼容则返回None
pub(in crate::tensor) fn broadcast_shape(shape1: &[usize], shape2: &[usize]) -> Option<Vec<usize>> {
    let rank = shape1.len().max(shape2.len());
    let mut result = vec![0; rank];
    for i in 0..rank {
        // 从右向左对齐，缺失的维度按1处理
        let d1 = if i < shape1.len() {
            shape1[shape1.len() - 1 - i]
        } else {
            1
        };
        let d2 = if i < shape2.len() {
            shape2[shape2.len() - 1 - i]
        } else {
            1
        };
        if d1 == d2 || d1 == 1 || d2 == 1 {
            result[rank - 1 - i] = d1.max(d2);
        } else {
            return None;
        }
    }
    Some(result)
}
