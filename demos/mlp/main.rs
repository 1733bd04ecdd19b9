//! # MLP 组合示例
//!
//! 展示 mini_torch 的模块组合内核：
//! - `Block` 注册表 + 手写前向编排
//! - 训练/推理模式切换（Dropout 的行为差异）
//! - `parameters()` 的确定性遍历（外部优化器的消费入口）
//! - 模块树的结构化描述（JSON）
//!
//! ## 运行
//! ```bash
//! cargo run --example mlp
//! ```

mod model;

use mini_torch::nn::{Module, ModuleError};
use mini_torch::tensor::Tensor;
use model::Mlp;

fn main() -> Result<(), ModuleError> {
    let mut mlp = Mlp::new_seeded(42)?;

    // 1. 结构一览
    println!("===== 模块树 =====");
    println!("{}", mlp.describe().to_json().expect("描述序列化失败"));

    // 2. 参数遍历（外部优化器就按这个顺序消费）
    println!("===== 参数 =====");
    for param in mlp.parameters()? {
        println!("{param}");
    }

    // 3. 推理模式前向：dropout恒等，同种子结果可复现
    mlp.set_training(false);
    let x = Tensor::new(&[0.5, -1.0, 2.0, 0.0], &[1, 4]);
    let y = mlp.forward(&x)?;
    println!("===== eval前向 =====");
    println!("输入: {x}");
    println!("输出: {y}");

    // 4. 训练模式前向：dropout随机置零并反向缩放
    mlp.set_training(true);
    let y = mlp.forward(&x)?;
    println!("===== train前向 =====");
    println!("输出: {y}");

    Ok(())
}
