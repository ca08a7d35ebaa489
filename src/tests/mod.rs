//! 单元测试模块
//! 覆盖来源解析、图片绑定、格式转换、身份注册表、屏幕与配置

pub mod dummy;
pub mod registry_tests;
