//! 账户目录：账户 ID -> 联系邮箱

use std::collections::HashMap;

use crate::errors::QuoteWatchError;

pub trait Directory: Send + Sync {
    /// 查不到时返回 [`QuoteWatchError::AccountNotFound`]
    fn resolve(&self, account_id: &str) -> Result<String, QuoteWatchError>;
}

impl Directory for HashMap<String, String> {
    fn resolve(&self, account_id: &str) -> Result<String, QuoteWatchError> {
        self.get(account_id)
            .filter(|email| !email.trim().is_empty())
            .cloned()
            .ok_or_else(|| QuoteWatchError::AccountNotFound(account_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_email_counts_as_missing() {
        let mut directory = HashMap::new();
        directory.insert("adv-1".to_string(), "alice@example.com".to_string());
        directory.insert("adv-2".to_string(), "  ".to_string());

        assert_eq!(directory.resolve("adv-1").unwrap(), "alice@example.com");
        assert!(directory.resolve("adv-2").is_err());
        assert!(directory.resolve("nobody").is_err());
    }
}
