/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 模块描述符（Module Descriptor）
 *                 统一的中间表示（IR），用于展示、调试输出与外部序列化。
 *                 内核自身不定义存盘格式：外部序列化器用本描述加`parameters()`
 *                 即可重建一棵树
 */

use super::module::ModuleId;
use super::parameter::{ParamId, Parameter};
use serde::{Deserialize, Serialize};

/// 模块子树的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// 模块 ID
    pub id: ModuleId,
    /// 模块名称
    pub name: String,
    /// 模块类型（如"Linear"、"Block"）
    pub kind: String,
    /// 是否处于训练模式
    pub training: bool,
    /// 本模块直接拥有的参数描述
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDescriptor>,
    /// 子组件描述，按注册顺序
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildDescriptor>,
}

/// 子组件描述：注册名 + 子模块描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDescriptor {
    /// 注册名
    pub name: String,
    /// 子模块描述
    pub module: ModuleDescriptor,
}

/// 参数描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// 参数 ID
    pub id: ParamId,
    /// 参数名称
    pub name: String,
    /// 归属标记：声明本参数的层的名称
    pub owner: String,
    /// 参数形状
    pub shape: Vec<usize>,
    /// 元素个数
    pub size: usize,
    /// 是否可训练
    pub trainable: bool,
}

impl ParamDescriptor {
    pub fn from_parameter(param: &Parameter) -> Self {
        Self {
            id: param.id(),
            name: param.name(),
            owner: param.owner(),
            shape: param.shape(),
            size: param.size(),
            trainable: param.is_trainable(),
        }
    }
}

impl ModuleDescriptor {
    /// 序列化为 JSON 字符串（pretty 格式）
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串反序列化
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
