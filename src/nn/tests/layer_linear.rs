/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Linear layer 单元测试
 */

use crate::nn::{Linear, Module, ModuleError};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

// ==================== 构造 ====================

/// 权重形状[out, in]、偏置形状[out]
#[test]
fn test_linear_parameter_shapes() -> Result<(), ModuleError> {
    let fc = Linear::new(784, 128, true, "fc")?;
    assert_eq!(fc.weights().shape(), &[128, 784]);
    assert_eq!(fc.bias().unwrap().shape(), &[128]);
    assert_eq!(fc.in_features(), 784);
    assert_eq!(fc.out_features(), 128);
    Ok(())
}

/// 无偏置时只有一个参数
#[test]
fn test_linear_without_bias() -> Result<(), ModuleError> {
    let fc = Linear::new(4, 2, false, "fc")?;
    assert!(fc.bias().is_none());
    assert_eq!(fc.own_parameters().len(), 1);
    Ok(())
}

/// 参数命名遵循`{name}_W`/`{name}_b`，归属标记为层名
#[test]
fn test_linear_parameter_names() -> Result<(), ModuleError> {
    let fc = Linear::new(4, 2, true, "hidden")?;
    let params = fc.own_parameters();
    assert_eq!(params[0].name(), "hidden_W");
    assert_eq!(params[1].name(), "hidden_b");
    assert_eq!(params[0].owner(), "hidden");
    Ok(())
}

/// 维度为0须被拒绝
#[test]
fn test_linear_zero_features() {
    assert!(matches!(
        Linear::new(0, 2, true, "fc"),
        Err(ModuleError::InvalidArgument(_))
    ));
    assert!(matches!(
        Linear::new(4, 0, true, "fc"),
        Err(ModuleError::InvalidArgument(_))
    ));
}

/// 权重初始化非退化：不允许全零（否则初始梯度消失）
#[test]
fn test_linear_weights_not_all_zero() -> Result<(), ModuleError> {
    let fc = Linear::new(16, 16, true, "fc")?;
    let weights = fc.weights().value();
    assert!(weights.as_slice().iter().any(|&x| x != 0.0));
    Ok(())
}

/// 同一种子构造出的两个层权重完全一致
#[test]
fn test_linear_seeded_reproducible() -> Result<(), ModuleError> {
    let fc1 = Linear::new_seeded(4, 8, true, "fc", 42)?;
    let fc2 = Linear::new_seeded(4, 8, true, "fc", 42)?;
    assert_eq!(fc1.weights().value(), fc2.weights().value());

    let fc3 = Linear::new_seeded(4, 8, true, "fc", 43)?;
    assert_ne!(fc1.weights().value(), fc3.weights().value());
    Ok(())
}

// ==================== 前向传播 ====================

/// 数值验证：固定权重与偏置后的仿射结果
#[test]
fn test_linear_forward_values() -> Result<(), ModuleError> {
    let mut fc = Linear::new(3, 2, true, "fc")?;
    // 权重[2, 3]：第一行取x的第1个分量，第二行取第2个分量
    fc.weights()
        .set_value(&Tensor::new(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[2, 3]))?;
    fc.bias().unwrap().set_value(&Tensor::new(&[0.5, 0.5], &[2]))?;

    let x = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let y = fc.forward(&x)?;

    // x @ Wᵀ = [[1, 2], [4, 5]]，加偏置 = [[1.5, 2.5], [4.5, 5.5]]
    assert_eq!(y.shape(), &[2, 2]);
    assert_abs_diff_eq!(y[[0, 0]], 1.5, epsilon = 1e-6);
    assert_abs_diff_eq!(y[[0, 1]], 2.5, epsilon = 1e-6);
    assert_abs_diff_eq!(y[[1, 0]], 4.5, epsilon = 1e-6);
    assert_abs_diff_eq!(y[[1, 1]], 5.5, epsilon = 1e-6);
    Ok(())
}

/// 输出形状：[..., in] -> [..., out]，前导维度全部保留
#[test]
fn test_linear_forward_shapes() -> Result<(), ModuleError> {
    let mut fc = Linear::new(4, 8, true, "fc")?;

    assert_eq!(fc.forward(&Tensor::ones(&[1, 4]))?.shape(), &[1, 8]);
    assert_eq!(fc.forward(&Tensor::ones(&[32, 4]))?.shape(), &[32, 8]);
    // 高阶输入：[2, 3, 4] -> [2, 3, 8]
    assert_eq!(fc.forward(&Tensor::ones(&[2, 3, 4]))?.shape(), &[2, 3, 8]);
    // 1阶输入：[4] -> [8]
    assert_eq!(fc.forward(&Tensor::ones(&[4]))?.shape(), &[8]);
    Ok(())
}

/// 最后一维不等于in_features须报ShapeMismatch
#[test]
fn test_linear_forward_shape_mismatch() -> Result<(), ModuleError> {
    let mut fc = Linear::new(4, 8, true, "fc")?;
    let result = fc.forward(&Tensor::ones(&[1, 5]));
    match result {
        Err(ModuleError::ShapeMismatch { expected, got, .. }) => {
            assert_eq!(expected, vec![4]);
            assert_eq!(got, vec![5]);
        }
        other => panic!("期望ShapeMismatch，但得到{other:?}"),
    }
    Ok(())
}

// ==================== 参数更新 ====================

/// set_value的形状校验：参数形状自创建起不可改变
#[test]
fn test_parameter_set_value_shape_checked() -> Result<(), ModuleError> {
    let fc = Linear::new(3, 2, true, "fc")?;
    let result = fc.weights().set_value(&Tensor::ones(&[3, 2]));
    assert!(matches!(result, Err(ModuleError::ShapeMismatch { .. })));
    Ok(())
}

/// 外部优化器风格的参数更新：w ← w - lr * grad
#[test]
fn test_parameter_update_like_optimizer() -> Result<(), ModuleError> {
    let fc = Linear::new(2, 2, false, "fc")?;
    let weights = fc.weights().clone();
    weights.set_value(&Tensor::ones(&[2, 2]))?;
    weights.set_grad(Some(&Tensor::new(&[0.5, 0.5, 0.5, 0.5], &[2, 2])))?;

    let learning_rate = 1.0;
    let updated = weights.value() - learning_rate * weights.grad().unwrap();
    weights.set_value(&updated)?;

    assert_eq!(weights.value(), Tensor::new(&[0.5, 0.5, 0.5, 0.5], &[2, 2]));
    Ok(())
}
