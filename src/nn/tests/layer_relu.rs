/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : ReLU layer 单元测试
 */

use crate::nn::{Module, ModuleError, ReLU};
use crate::tensor::Tensor;

/// 逐元素max(x, 0)
#[test]
fn test_relu_elementwise_max() -> Result<(), ModuleError> {
    let mut relu = ReLU::new();
    let x = Tensor::new(&[-2.0, -0.5, 0.0, 0.5, 2.0], &[5]);
    let y = relu.forward(&x)?;
    assert_eq!(y, Tensor::new(&[0.0, 0.0, 0.0, 0.5, 2.0], &[5]));
    Ok(())
}

/// 幂等性：relu(relu(x)) == relu(x)
#[test]
fn test_relu_idempotent() -> Result<(), ModuleError> {
    let mut relu = ReLU::new();
    let x = Tensor::new(&[-3.0, -1.0, 0.0, 1.0, 3.0, -0.1], &[2, 3]);
    let once = relu.forward(&x)?;
    let twice = relu.forward(&once)?;
    assert_eq!(once, twice);
    Ok(())
}

/// 形状保持不变，且对任意阶输入都成立
#[test]
fn test_relu_preserves_shape() -> Result<(), ModuleError> {
    let mut relu = ReLU::new();
    for shape in [vec![4], vec![2, 3], vec![2, 3, 4]] {
        let x = Tensor::new_random(-1.0, 1.0, &shape);
        assert_eq!(relu.forward(&x)?.shape(), &shape[..]);
    }
    Ok(())
}

/// 无参数、模式无关
#[test]
fn test_relu_stateless() -> Result<(), ModuleError> {
    let mut relu = ReLU::new();
    assert!(relu.own_parameters().is_empty());
    assert_eq!(relu.num_params()?, 0);

    // 切换模式不影响行为
    let x = Tensor::new(&[-1.0, 1.0], &[2]);
    let in_train = relu.forward(&x)?;
    relu.set_training(false);
    let in_eval = relu.forward(&x)?;
    assert_eq!(in_train, in_eval);
    Ok(())
}
