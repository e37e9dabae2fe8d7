//! 应用配置
//!
//! 配置来源按优先级从低到高：内置默认值、config.toml、config.{APP_ENV}.toml、
//! SCHOOL_ 前缀环境变量、常用环境变量覆盖。

mod load;
mod structs;

pub use structs::*;
