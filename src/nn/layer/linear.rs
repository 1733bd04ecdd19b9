/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Linear (全连接) 层
 */

use crate::nn::{Init, Module, ModuleError, ModuleId, Parameter};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Linear (全连接) 层
///
/// PyTorch 风格的仿射变换：`output = x @ Wᵀ + b`
///
/// # 参数布局
/// - 权重：[out_features, in_features]（Kaiming 初始化，保证初始梯度不退化）
/// - 偏置：[out_features]（可选，零初始化）
///
/// # 输入/输出形状
/// - 输入：[..., in_features]，前导维度任意（全部广播保留）
/// - 输出：[..., out_features]
///
/// # 使用示例
/// ```ignore
/// let fc = Linear::new(784, 128, true, "fc1")?;
/// let h = fc.forward(&x)?;
/// ```
pub struct Linear {
    id: ModuleId,
    /// 层名称（参数归属标记用）
    name: String,
    /// 输入特征维度
    in_features: usize,
    /// 输出特征维度
    out_features: usize,
    /// 权重参数 [out_features, in_features]
    weights: Parameter,
    /// 偏置参数 [out_features]（可选）
    bias: Option<Parameter>,
}

impl Linear {
    /// 创建新的 Linear 层
    ///
    /// # 参数
    /// - `in_features`: 输入特征维度
    /// - `out_features`: 输出特征维度
    /// - `use_bias`: 是否使用偏置
    /// - `name`: 层名称（参数将命名为`{name}_W`/`{name}_b`）
    ///
    /// # 错误
    /// 任一维度为0时返回`InvalidArgument`
    pub fn new(
        in_features: usize,
        out_features: usize,
        use_bias: bool,
        name: &str,
    ) -> Result<Self, ModuleError> {
        Self::check_features(in_features, out_features, name)?;

        // 权重参数：Kaiming 初始化适合 ReLU
        let weights = Parameter::new(
            &format!("{name}_W"),
            name,
            Init::Kaiming.generate(&[out_features, in_features]),
        );
        // 偏置参数（可选）：零初始化
        let bias = if use_bias {
            Some(Parameter::new(
                &format!("{name}_b"),
                name,
                Init::Zeros.generate(&[out_features]),
            ))
        } else {
            None
        };

        Ok(Self {
            id: ModuleId::next(),
            name: name.to_string(),
            in_features,
            out_features,
            weights,
            bias,
        })
    }

    /// 创建新的 Linear 层（带种子，确保权重可重复）
    ///
    /// # 参数
    /// - `seed`: 随机种子。同一种子+同一形状必产生相同的初始权重
    pub fn new_seeded(
        in_features: usize,
        out_features: usize,
        use_bias: bool,
        name: &str,
        seed: u64,
    ) -> Result<Self, ModuleError> {
        Self::check_features(in_features, out_features, name)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let weights = Parameter::new(
            &format!("{name}_W"),
            name,
            Init::Kaiming.generate_with_rng(&[out_features, in_features], &mut rng),
        );
        // 偏置零初始化，无需种子
        let bias = if use_bias {
            Some(Parameter::new(
                &format!("{name}_b"),
                name,
                Init::Zeros.generate(&[out_features]),
            ))
        } else {
            None
        };

        Ok(Self {
            id: ModuleId::next(),
            name: name.to_string(),
            in_features,
            out_features,
            weights,
            bias,
        })
    }

    fn check_features(
        in_features: usize,
        out_features: usize,
        name: &str,
    ) -> Result<(), ModuleError> {
        if in_features == 0 || out_features == 0 {
            return Err(ModuleError::InvalidArgument(format!(
                "Linear层`{name}`的输入/输出特征维度必须大于0，但得到{in_features}→{out_features}"
            )));
        }
        Ok(())
    }

    /// 获取输入特征维度
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// 获取输出特征维度
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// 获取权重参数句柄
    pub fn weights(&self) -> &Parameter {
        &self.weights
    }

    /// 获取偏置参数句柄（如果有）
    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }
}

impl Module for Linear {
    fn id(&self) -> ModuleId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "Linear"
    }

    /// 前向传播：`y = x @ Wᵀ (+ b)`，沿最后一维做仿射变换，前导维度全部保留
    ///
    /// # 错误
    /// 输入最后一维不等于`in_features`（或输入是0阶标量）时返回`ShapeMismatch`
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModuleError> {
        // 1. 形状验证
        let last_dim = input.last_dim().ok_or_else(|| ModuleError::ShapeMismatch {
            expected: vec![self.in_features],
            got: vec![],
            message: format!("Linear层`{}`的输入不能是0阶标量", self.name),
        })?;
        if last_dim != self.in_features {
            return Err(ModuleError::ShapeMismatch {
                expected: vec![self.in_features],
                got: vec![last_dim],
                message: format!(
                    "Linear层`{}`要求输入最后一维为{}，但得到{}",
                    self.name, self.in_features, last_dim
                ),
            });
        }

        // 2. 仿射变换：[..., in] @ [in, out] = [..., out]
        let output = input.mat_mul_last_dim(&self.weights.value().transpose());

        // 3. 偏置广播：[..., out] + [out]
        match &self.bias {
            Some(bias) => Ok(&output + &bias.value()),
            None => Ok(output),
        }
    }

    fn own_parameters(&self) -> Vec<Parameter> {
        let mut params = vec![self.weights.clone()];
        if let Some(bias) = &self.bias {
            params.push(bias.clone());
        }
        params
    }
}
