use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

mod ops {
    pub mod add;
    pub mod eq;
    pub mod mat_mul;
    pub mod mul;
    pub mod sub;
}

mod filter;
mod index;
mod print;
mod property;
mod shape;

#[cfg(test)]
pub mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
///
/// 本类型是各层（Layer）所消费的“张量能力”：只约定构造、形状自省、逐元素运算、
/// 广播加法、末维矩阵乘与随机掩码的生成，不承诺任何数值内核之外的东西。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：除了`data`长度为1且shape为`[]`的情况（标量），`data`的长度必须和`shape`中所有元素的乘积相等。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap();
        Tensor { data }
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), 0.0),
        }
    }

    /// 创建一个全一张量
    pub fn ones(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), 1.0),
        }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间内均匀分布（使用全局RNG）
    pub fn new_random(min: f32, max: f32, shape: &[usize]) -> Tensor {
        let mut rng = rand::thread_rng();
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(&mut rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间内均匀分布（使用指定RNG，可重复）
    pub fn new_random_with_rng(min: f32, max: f32, shape: &[usize], rng: &mut StdRng) -> Tensor {
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 创建一个服从正态分布的随机张量（使用全局RNG）。
    /// 若为标量，shape可以是[]、[1,1]、[1,1,1]...；
    /// 若为向量，shape可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，shape可以是[n,m]；
    /// 若为更高维度的数组，shape可以是[c,n,m,...]。
    pub fn new_normal(mean: f32, std_dev: f32, shape: &[usize]) -> Tensor {
        let mut rng = rand::thread_rng();
        Self::normal_impl(mean, std_dev, shape, &mut rng)
    }

    /// 创建一个服从正态分布的随机张量（使用指定RNG，可重复）
    pub fn new_normal_with_rng(mean: f32, std_dev: f32, shape: &[usize], rng: &mut StdRng) -> Tensor {
        Self::normal_impl(mean, std_dev, shape, rng)
    }

    // Box-Muller变换。非有限值（可能由ln(0)产生）会被丢弃重采
    fn normal_impl<R: Rng>(mean: f32, std_dev: f32, shape: &[usize], rng: &mut R) -> Tensor {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor::new(&data, shape)
    }

    /// 创建一个dropout掩码张量：每个元素以概率`p`为0，否则为`1/(1-p)`
    /// （反向缩放，保证激活值的期望不变）。
    ///
    /// # 参数
    /// - `p`: 置零概率，须在[0, 1)内（由调用方保证）
    /// - `shape`: 掩码形状
    /// - `rng`: 随机源（可播种，保证可重复）
    pub fn new_dropout_mask_with_rng(p: f32, shape: &[usize], rng: &mut StdRng) -> Tensor {
        let keep_scale = 1.0 / (1.0 - p);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| {
                if rng.r#gen::<f32>() < p {
                    0.0
                } else {
                    keep_scale
                }
            })
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }
}
