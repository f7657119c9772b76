//! Value Objects
//!
//! 不変で、値そのものが同一性を表すドメインの型。
//! 生成時にバリデーションを行い、不正な値を持つインスタンスが存在しないことを保証します。

use std::{cmp::Ordering, fmt};

use super::error::ValueObjectError;

/// 表示名の最大文字数
pub const DISPLAY_NAME_MAX_CHARS: usize = 32;
/// グループ ID の最大文字数
pub const GROUP_ID_MAX_CHARS: usize = 64;
/// メッセージ本文の最大バイト数
pub const MESSAGE_CONTENT_MAX_BYTES: usize = 4096;

/// クライアント ID
///
/// サーバーが接続時に採番する固定幅の数字文字列（例: `000001`）。
///
/// 順序は数値としての大小（桁数、次に文字列）。`999999` < `1000000`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::ClientIdEmpty);
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValueObjectError::ClientIdNotNumeric(value));
        }
        Ok(Self(value))
    }

    /// 連番から固定幅のクライアント ID を作る（数字のみなので検証は不要）
    pub(crate) fn from_sequence(sequence: u64, width: usize) -> Self {
        Self(format!("{:0width$}", sequence, width = width))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Ord for ClientId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ClientId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// クライアントが名乗る表示名
///
/// 一意性は要求しない（同じ名前のクライアントが複数存在し得る）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        let chars = trimmed.chars().count();
        if chars > DISPLAY_NAME_MAX_CHARS {
            return Err(ValueObjectError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// グループ ID
///
/// クライアントが任意に選ぶ文字列。最初の join で暗黙的にグループが作られる。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::GroupIdEmpty);
        }
        let chars = trimmed.chars().count();
        if chars > GROUP_ID_MAX_CHARS {
            return Err(ValueObjectError::GroupIdTooLong {
                max: GROUP_ID_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for GroupId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ本文（空文字列は許容する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.len() > MESSAGE_CONTENT_MAX_BYTES {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX_BYTES,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒、UTC）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_accepts_fixed_width_digits() {
        // テスト項目: 数字のみの ID は ClientId として受け入れられる
        // given (前提条件):
        let value = "000042".to_string();

        // when (操作):
        let result = ClientId::new(value);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "000042");
    }

    #[test]
    fn test_client_id_rejects_empty_and_non_numeric() {
        // テスト項目: 空文字列や数字以外を含む ID はエラーになる
        // given (前提条件):
        let empty = String::new();
        let alpha = "alice".to_string();

        // when (操作):
        let empty_result = ClientId::new(empty);
        let alpha_result = ClientId::new(alpha);

        // then (期待する結果):
        assert_eq!(empty_result, Err(ValueObjectError::ClientIdEmpty));
        assert_eq!(
            alpha_result,
            Err(ValueObjectError::ClientIdNotNumeric("alice".to_string()))
        );
    }

    #[test]
    fn test_client_id_orders_numerically_past_six_digits() {
        // テスト項目: 7 桁に増えた ID も数値の大小で並ぶ
        // given (前提条件):
        let six = ClientId::new("999999".to_string()).unwrap();
        let seven = ClientId::new("1000000".to_string()).unwrap();
        let first = ClientId::new("000001".to_string()).unwrap();

        // when (操作):
        let mut ids = vec![seven.clone(), six.clone(), first.clone()];
        ids.sort();

        // then (期待する結果):
        assert!(six < seven);
        assert_eq!(ids, vec![first, six, seven]);
    }

    #[test]
    fn test_display_name_is_trimmed() {
        // テスト項目: 表示名の前後の空白は取り除かれる
        // given (前提条件):
        let value = "  alice \n".to_string();

        // when (操作):
        let name = DisplayName::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn test_display_name_rejects_blank_and_too_long() {
        // テスト項目: 空白のみ、または上限を超える表示名はエラーになる
        // given (前提条件):
        let blank = "   ".to_string();
        let long = "a".repeat(DISPLAY_NAME_MAX_CHARS + 1);

        // when (操作):
        let blank_result = DisplayName::new(blank);
        let long_result = DisplayName::new(long);

        // then (期待する結果):
        assert_eq!(blank_result, Err(ValueObjectError::DisplayNameEmpty));
        assert_eq!(
            long_result,
            Err(ValueObjectError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX_CHARS,
                actual: DISPLAY_NAME_MAX_CHARS + 1,
            })
        );
    }

    #[test]
    fn test_display_name_counts_characters_not_bytes() {
        // テスト項目: 表示名の長さはバイト数ではなく文字数で判定される
        // given (前提条件):
        let value = "縁".repeat(DISPLAY_NAME_MAX_CHARS);

        // when (操作):
        let result = DisplayName::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_group_id_validation() {
        // テスト項目: グループ ID は空白のみや上限超過を拒否し、それ以外は trim して受け入れる
        // given (前提条件):
        let valid = " lobby ".to_string();
        let blank = "".to_string();
        let long = "g".repeat(GROUP_ID_MAX_CHARS + 1);

        // when (操作):
        let valid_result = GroupId::new(valid);
        let blank_result = GroupId::new(blank);
        let long_result = GroupId::new(long);

        // then (期待する結果):
        assert_eq!(valid_result.unwrap().as_str(), "lobby");
        assert_eq!(blank_result, Err(ValueObjectError::GroupIdEmpty));
        assert!(matches!(
            long_result,
            Err(ValueObjectError::GroupIdTooLong { .. })
        ));
    }

    #[test]
    fn test_message_content_allows_empty_and_rejects_oversized() {
        // テスト項目: 空の本文は許容され、上限を超える本文はエラーになる
        // given (前提条件):
        let empty = String::new();
        let oversized = "x".repeat(MESSAGE_CONTENT_MAX_BYTES + 1);

        // when (操作):
        let empty_result = MessageContent::new(empty);
        let oversized_result = MessageContent::new(oversized);

        // then (期待する結果):
        assert!(empty_result.is_ok());
        assert_eq!(
            oversized_result,
            Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX_BYTES,
                actual: MESSAGE_CONTENT_MAX_BYTES + 1,
            })
        );
    }
}
