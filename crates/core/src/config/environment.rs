use std::env;

use crate::error::{AppError, AppResult};

/// 读取布尔型环境变量：支持 true/false/1/0（大小写不敏感）
pub fn env_is_true(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => {
            let v = v.trim();
            v.eq_ignore_ascii_case("true") || v == "1"
        }
        Err(_) => default,
    }
}

/// 读取字符串环境变量，若不存在则返回默认值
pub fn env_or_default(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// 读取可选字符串环境变量（空字符串视为未配置）
pub fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 读取 u64 环境变量；未配置时返回默认值，配置了但无法解析则报错
pub fn env_u64(key: &str, default: u64) -> AppResult<u64> {
    match env_opt(key) {
        Some(v) => v
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("{}={} 不是合法的整数: {}", key, v, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_helpers_fall_back_to_defaults() {
        assert_eq!(env_or_default("QW_TEST_UNSET_STR", "abc"), "abc");
        assert!(env_is_true("QW_TEST_UNSET_BOOL", true));
        assert_eq!(env_u64("QW_TEST_UNSET_U64", 42).unwrap(), 42);
        assert!(env_opt("QW_TEST_UNSET_OPT").is_none());
    }

    #[test]
    fn test_env_u64_rejects_garbage() {
        env::set_var("QW_TEST_BAD_U64", "12x");
        assert!(env_u64("QW_TEST_BAD_U64", 1).is_err());
        env::set_var("QW_TEST_GOOD_U64", " 15 ");
        assert_eq!(env_u64("QW_TEST_GOOD_U64", 1).unwrap(), 15);
    }
}
