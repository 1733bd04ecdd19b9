/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Parameter - 可训练参数句柄
 *
 * 参数在层构造时按初始化策略创建，前向传播期间只读；
 * 值与梯度只会被外部优化器通过 set_value / set_grad 修改。
 */

use super::ModuleError;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

// ==================== ParamId ====================

static NEXT_PARAM_ID: AtomicU64 = AtomicU64::new(0);

/// 参数的全局唯一标识。
/// 参数遍历用它检测重复归属（同一参数经由两条路径可达说明树被破坏了）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamId(u64);

impl ParamId {
    fn next() -> Self {
        Self(NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==================== Parameter ====================

struct ParamInner {
    id: ParamId,
    /// 参数名（如"fc1_W"）
    name: String,
    /// 归属标记：声明本参数的层的名称
    owner: String,
    value: Tensor,
    grad: Option<Tensor>,
    trainable: bool,
}

/// 可训练参数句柄 - 携带内部可变性，供外部优化器持有并更新
///
/// # 设计原则
/// - Clone 语义（非 Copy），但开销极低（Rc clone）
/// - 参数由声明它的层独占拥有；句柄只是访问凭证，不是第二个所有者
/// - `set_value`/`set_grad` 会做形状校验，参数形状自创建起不可改变
#[derive(Clone)]
pub struct Parameter {
    inner: Rc<RefCell<ParamInner>>,
}

impl Parameter {
    /// 创建新参数（由层在构造期调用）
    pub(crate) fn new(name: &str, owner: &str, value: Tensor) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ParamInner {
                id: ParamId::next(),
                name: name.to_string(),
                owner: owner.to_string(),
                value,
                grad: None,
                trainable: true,
            })),
        }
    }

    pub fn id(&self) -> ParamId {
        self.inner.borrow().id
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    /// 声明本参数的层的名称
    pub fn owner(&self) -> String {
        self.inner.borrow().owner.clone()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.inner.borrow().value.shape().to_vec()
    }

    /// 参数张量的元素个数
    pub fn size(&self) -> usize {
        self.inner.borrow().value.size()
    }

    /// 取参数当前值（克隆）
    pub fn value(&self) -> Tensor {
        self.inner.borrow().value.clone()
    }

    /// 更新参数值。新值的形状必须与创建时一致
    pub fn set_value(&self, value: &Tensor) -> Result<(), ModuleError> {
        let mut inner = self.inner.borrow_mut();
        if value.shape() != inner.value.shape() {
            return Err(ModuleError::ShapeMismatch {
                expected: inner.value.shape().to_vec(),
                got: value.shape().to_vec(),
                message: format!("参数`{}`的形状自创建起不可改变", inner.name),
            });
        }
        inner.value = value.clone();
        Ok(())
    }

    /// 取梯度（若反向传播后已被外部引擎填入）
    pub fn grad(&self) -> Option<Tensor> {
        self.inner.borrow().grad.clone()
    }

    /// 写入/清除梯度。梯度形状必须与参数值一致
    pub fn set_grad(&self, grad: Option<&Tensor>) -> Result<(), ModuleError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(grad) = grad {
            if grad.shape() != inner.value.shape() {
                return Err(ModuleError::ShapeMismatch {
                    expected: inner.value.shape().to_vec(),
                    got: grad.shape().to_vec(),
                    message: format!("参数`{}`的梯度形状必须与值一致", inner.name),
                });
            }
        }
        inner.grad = grad.cloned();
        Ok(())
    }

    pub fn is_trainable(&self) -> bool {
        self.inner.borrow().trainable
    }

    /// 冻结/解冻参数（优化器应跳过不可训练的参数）
    pub fn set_trainable(&self, trainable: bool) {
        self.inner.borrow_mut().trainable = trainable;
    }

    /// 检查两个句柄是否指向同一个参数
    pub fn same_parameter(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Parameter")
            .field("id", &inner.id)
            .field("name", &inner.name)
            .field("shape", &inner.value.shape())
            .finish()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        write!(
            f,
            "参数[id={}, name={}, owner={}, shape={:?}]",
            inner.id,
            inner.name,
            inner.owner,
            inner.value.shape()
        )
    }
}
