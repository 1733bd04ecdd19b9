/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 张量构造相关的单元测试（含随机构造的可重复性）
 */

use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ==================== 基础构造 ====================

#[test]
fn test_new_with_shape_and_values() {
    let t = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.dimension(), 2);
    assert_eq!(t.size(), 6);
    assert_abs_diff_eq!(t[[0, 0]], 1.0);
    assert_abs_diff_eq!(t[[1, 2]], 6.0);
}

#[test]
fn test_zeros_and_ones() {
    let z = Tensor::zeros(&[3, 2]);
    let o = Tensor::ones(&[3, 2]);
    assert!(z.as_slice().iter().all(|&x| x == 0.0));
    assert!(o.as_slice().iter().all(|&x| x == 1.0));
}

#[test]
fn test_scalar_properties() {
    let s = Tensor::new(&[3.5], &[1]);
    assert!(s.is_scalar());
    assert_eq!(s.number(), Some(3.5));

    let v = Tensor::new(&[1.0, 2.0], &[2]);
    assert!(!v.is_scalar());
    assert_eq!(v.number(), None);
    assert_eq!(v.last_dim(), Some(2));
}

// ==================== 随机构造 ====================

#[test]
fn test_new_random_within_bounds() {
    let t = Tensor::new_random(-0.5, 0.5, &[10, 10]);
    assert!(t.as_slice().iter().all(|&x| (-0.5..=0.5).contains(&x)));
}

/// 同一种子的两次正态采样须产生完全相同的张量
#[test]
fn test_new_normal_with_rng_reproducible() {
    let mut rng_1 = StdRng::seed_from_u64(42);
    let mut rng_2 = StdRng::seed_from_u64(42);
    let t1 = Tensor::new_normal_with_rng(0.0, 1.0, &[4, 4], &mut rng_1);
    let t2 = Tensor::new_normal_with_rng(0.0, 1.0, &[4, 4], &mut rng_2);
    assert_eq!(t1, t2);
}

// ==================== dropout掩码 ====================

/// 掩码元素只会是0或1/(1-p)
#[test]
fn test_dropout_mask_values() {
    let p = 0.5;
    let mut rng = StdRng::seed_from_u64(7);
    let mask = Tensor::new_dropout_mask_with_rng(p, &[100], &mut rng);
    let keep_scale = 1.0 / (1.0 - p);
    assert!(
        mask.as_slice()
            .iter()
            .all(|&x| x == 0.0 || (x - keep_scale).abs() < 1e-6)
    );
}

/// 大样本下，置零比例应接近p
#[test]
fn test_dropout_mask_zero_fraction() {
    let p = 0.7;
    let mut rng = StdRng::seed_from_u64(42);
    let mask = Tensor::new_dropout_mask_with_rng(p, &[100, 100], &mut rng);
    let zero_count = mask.as_slice().iter().filter(|&&x| x == 0.0).count();
    let fraction = zero_count as f32 / mask.size() as f32;
    assert_abs_diff_eq!(fraction, p, epsilon = 0.02);
}
