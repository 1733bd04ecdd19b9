/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 张量运算相关的单元测试（加减乘、广播、矩阵乘、转置、条件过滤）
 */

use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

// ==================== 加法与广播 ====================

#[test]
fn test_add_same_shape() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = Tensor::new(&[10.0, 20.0, 30.0, 40.0], &[2, 2]);
    let c = &a + &b;
    assert_eq!(c, Tensor::new(&[11.0, 22.0, 33.0, 44.0], &[2, 2]));
}

#[test]
fn test_add_scalar_number() {
    let a = Tensor::new(&[1.0, -1.0], &[2]);
    assert_eq!(&a + 1.0, Tensor::new(&[2.0, 0.0], &[2]));
    assert_eq!(1.0 + &a, Tensor::new(&[2.0, 0.0], &[2]));
}

/// 偏置式广播：[2, 3] + [3]
#[test]
fn test_add_broadcast_bias() {
    let y = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = Tensor::new(&[0.5, -0.5, 1.0], &[3]);
    let out = &y + &b;
    assert_eq!(out, Tensor::new(&[1.5, 1.5, 4.0, 4.5, 4.5, 7.0], &[2, 3]));
}

/// 双侧广播：[2, 1] + [1, 3] -> [2, 3]
#[test]
fn test_add_broadcast_both_sides() {
    let a = Tensor::new(&[1.0, 2.0], &[2, 1]);
    let b = Tensor::new(&[10.0, 20.0, 30.0], &[1, 3]);
    let c = &a + &b;
    assert_eq!(c.shape(), &[2, 3]);
    assert_abs_diff_eq!(c[[1, 2]], 32.0);
}

#[test]
#[should_panic(expected = "张量形状不兼容")]
fn test_add_incompatible_shape() {
    let a = Tensor::new(&[1.0, 2.0, 3.0], &[3]);
    let b = Tensor::new(&[1.0, 2.0], &[2]);
    let _ = &a + &b;
}

// ==================== 减法与乘法 ====================

#[test]
fn test_sub_same_shape() {
    let a = Tensor::new(&[3.0, 2.0], &[2]);
    let b = Tensor::new(&[1.0, 5.0], &[2]);
    assert_eq!(&a - &b, Tensor::new(&[2.0, -3.0], &[2]));
}

#[test]
fn test_mul_by_number() {
    let a = Tensor::new(&[1.0, -2.0], &[2]);
    assert_eq!(&a * 2.0, Tensor::new(&[2.0, -4.0], &[2]));
    assert_eq!(0.5 * &a, Tensor::new(&[0.5, -1.0], &[2]));
}

/// 逐元素乘（Hadamard积），dropout掩码依赖本运算
#[test]
fn test_mul_elementwise() {
    let x = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let mask = Tensor::new(&[0.0, 2.0, 2.0, 0.0], &[2, 2]);
    assert_eq!(&x * &mask, Tensor::new(&[0.0, 4.0, 6.0, 0.0], &[2, 2]));
}

// ==================== 矩阵乘 ====================

#[test]
fn test_mat_mul() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = Tensor::new(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0], &[3, 2]);
    let c = a.mat_mul(&b);
    assert_eq!(c, Tensor::new(&[1.0, 2.0, 4.0, 5.0], &[2, 2]));
}

#[test]
#[should_panic(expected = "前一个张量的列数必须等于后一个张量的行数")]
fn test_mat_mul_dim_mismatch() {
    let a = Tensor::new(&[1.0, 2.0], &[1, 2]);
    let b = Tensor::new(&[1.0, 2.0, 3.0], &[3, 1]);
    let _ = a.mat_mul(&b);
}

/// 末维矩阵乘对2阶输入退化为普通矩阵乘
#[test]
fn test_mat_mul_last_dim_2d() {
    let x = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let w = Tensor::new(&[1.0, 0.0, 0.0, 1.0], &[2, 2]);
    assert_eq!(x.mat_mul_last_dim(&w), x.mat_mul(&w));
}

/// 末维矩阵乘保留所有前导维度：[2, 3, 4] @ [4, 2] -> [2, 3, 2]
#[test]
fn test_mat_mul_last_dim_3d() {
    let x = Tensor::ones(&[2, 3, 4]);
    let w = Tensor::ones(&[4, 2]);
    let y = x.mat_mul_last_dim(&w);
    assert_eq!(y.shape(), &[2, 3, 2]);
    // 每个输出元素都是4个1相乘求和
    assert!(y.as_slice().iter().all(|&v| (v - 4.0).abs() < 1e-6));
}

/// 1阶输入也可做末维矩阵乘：[k] @ [k, n] -> [n]
#[test]
fn test_mat_mul_last_dim_1d() {
    let x = Tensor::new(&[1.0, 2.0], &[2]);
    let w = Tensor::new(&[1.0, 10.0, 100.0, 1.0, 10.0, 100.0], &[2, 3]);
    let y = x.mat_mul_last_dim(&w);
    assert_eq!(y, Tensor::new(&[3.0, 30.0, 300.0], &[3]));
}

// ==================== 转置与条件过滤 ====================

#[test]
fn test_transpose() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let t = a.transpose();
    assert_eq!(t, Tensor::new(&[1.0, 4.0, 2.0, 5.0, 3.0, 6.0], &[3, 2]));
}

#[test]
fn test_where_with_f32() {
    let t = Tensor::new(&[-2.0, 0.0, 3.0], &[3]);
    let relu = t.where_with_f32(|x| x > 0.0, |x| x, |_| 0.0);
    assert_eq!(relu, Tensor::new(&[0.0, 0.0, 3.0], &[3]));
}

#[test]
fn test_can_broadcast_with() {
    let a = Tensor::ones(&[2, 3]);
    assert!(a.can_broadcast_with(&Tensor::ones(&[3])));
    assert!(a.can_broadcast_with(&Tensor::ones(&[2, 1])));
    assert!(!a.can_broadcast_with(&Tensor::ones(&[4])));
}
