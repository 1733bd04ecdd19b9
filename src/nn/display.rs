/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 模块树的显示格式化
 */

use super::descriptor::ModuleDescriptor;
use super::module::ModuleId;
use std::fmt;

/// 格式化单个模块的显示
///
/// # Arguments
/// * `id` - 模块ID
/// * `name` - 模块名称
/// * `kind` - 模块类型名称
///
/// # Returns
/// 返回格式化后的字符串，格式为：`模块[id={}, name={}, type={}]`
pub(in crate::nn) fn format_module_display(id: ModuleId, name: &str, kind: &str) -> String {
    format!("模块[id={}, name={}, type={}]", id, name, kind)
}

/// 按缩进层级递归渲染模块树（子组件带注册名，参数单列一行）
pub(in crate::nn) fn render_module_tree(
    descriptor: &ModuleDescriptor,
    f: &mut fmt::Formatter<'_>,
    depth: usize,
) -> fmt::Result {
    let indent = "    ".repeat(depth);
    writeln!(
        f,
        "{indent}模块[id={}, name={}, type={}]（{}模式）",
        descriptor.id,
        descriptor.name,
        descriptor.kind,
        if descriptor.training { "train" } else { "eval" }
    )?;
    for param in &descriptor.params {
        writeln!(
            f,
            "{indent}  · 参数[id={}, name={}, shape={:?}]",
            param.id, param.name, param.shape
        )?;
    }
    for child in &descriptor.children {
        writeln!(f, "{indent}  └ {}:", child.name)?;
        render_module_tree(&child.module, f, depth + 1)?;
    }
    Ok(())
}
