//! zstudio - 虚拟文件树与文档会话核心库
//!
//! 模块结构：
//! - models: 数据模型（FileTree, 路径工具）
//! - kernel: 无界面核心（state/action/effect/store、会话、资源管理器、查找）
//! - kernel::services: 端口（ContentProvider, Settings）与适配器（内存内容表、示例工程、配置文件）

pub mod kernel;
pub mod models;
