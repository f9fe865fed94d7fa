//! 短码生成
//!
//! Keys are drawn uniformly from a 62-character alphabet using the thread-local
//! CSPRNG. No collision check happens here: uniqueness is enforced by the
//! mapping store's insert, and callers regenerate on conflict.

use std::iter;

pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_KEY_LENGTH: usize = 6;

/// 自定义短码最大长度（与数据库列宽一致）
pub const MAX_SHORT_KEY_LENGTH: usize = 64;

pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct RandomKeyGenerator {
    length: usize,
}

impl RandomKeyGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(1, MAX_SHORT_KEY_LENGTH),
        }
    }
}

impl Default for RandomKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LENGTH)
    }
}

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> String {
        // ThreadRng 是定期从 OsRng 重新播种的 ChaCha，满足密码学安全要求
        iter::repeat_with(|| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
            .take(self.length)
            .collect()
    }
}

/// 校验短码格式：1..=64 个 `[A-Za-z0-9_-]` 字符
pub fn is_valid_short_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_SHORT_KEY_LENGTH
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
