//! メッセージのドメインモデル
//!
//! - `InboundRequest`: トランスポートがデコードした受信レコード（種別は未分類の文字列）
//! - `Request`: 種別ごとに必要なフィールドだけを持つ分類済みリクエスト
//! - `OutboundMessage`: 受信者ごとに送信される配送レコード

use super::{
    entity::Identity,
    error::RequestError,
    value_object::{GroupId, MessageContent, Timestamp},
};

/// メッセージ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Broadcast,
    GroupSend,
    DirectSend,
    GroupJoin,
    GroupLeave,
    IdentityQuery,
    ListUsers,
    ListGroups,
    AnalyticsQuery,
    Exit,
    /// 接続直後にサーバーから送る ID 通知
    Connected,
    /// 送信者への失敗通知
    Error,
}

impl MessageKind {
    /// ワイヤ上の種別タグ
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::GroupSend => "group-send",
            Self::DirectSend => "direct-send",
            Self::GroupJoin => "group-join",
            Self::GroupLeave => "group-leave",
            Self::IdentityQuery => "identity-query",
            Self::ListUsers => "list-users",
            Self::ListGroups => "list-groups",
            Self::AnalyticsQuery => "analytics-query",
            Self::Exit => "exit",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// クライアントが送ってよい種別タグを解釈する
    ///
    /// 旧クライアントの種別タグ（`world`, `p2p`, `sys-*` など）も別名として受け付ける。
    /// `connected` と `error` はサーバーからしか送らないため `None` になる。
    pub fn from_request_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "broadcast" | "world" => Self::Broadcast,
            "group-send" | "group" => Self::GroupSend,
            "direct-send" | "p2p" | "private" => Self::DirectSend,
            "group-join" | "sys-group-join" => Self::GroupJoin,
            "group-leave" | "sys-group-leave" => Self::GroupLeave,
            "identity-query" | "sys-myId" => Self::IdentityQuery,
            "list-users" | "sys-peoples" => Self::ListUsers,
            "list-groups" | "sys-groups" => Self::ListGroups,
            "analytics-query" | "sys-analytics" => Self::AnalyticsQuery,
            "exit" | "sys-exit" => Self::Exit,
            _ => return None,
        };
        Some(kind)
    }
}

/// トランスポートから渡される受信レコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub kind: String,
    pub target: Option<String>,
    pub content: String,
}

/// 分類済みのリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Broadcast {
        content: MessageContent,
    },
    GroupSend {
        group: GroupId,
        content: MessageContent,
    },
    /// `target` はクライアント ID または表示名
    DirectSend {
        target: String,
        content: MessageContent,
    },
    GroupJoin {
        group: GroupId,
    },
    GroupLeave {
        group: GroupId,
    },
    IdentityQuery,
    ListUsers,
    ListGroups,
    AnalyticsQuery,
    Exit,
}

impl Request {
    /// 受信レコードを種別タグで分類し、種別ごとに必要なフィールドを検証する
    pub fn classify(inbound: InboundRequest) -> Result<Self, RequestError> {
        let kind = MessageKind::from_request_tag(&inbound.kind)
            .ok_or_else(|| RequestError::UnknownType(inbound.kind.clone()))?;
        let target = inbound
            .target
            .map(|target| target.trim().to_string())
            .filter(|target| !target.is_empty());

        let request = match kind {
            MessageKind::Broadcast => Self::Broadcast {
                content: MessageContent::new(inbound.content)?,
            },
            MessageKind::GroupSend => Self::GroupSend {
                group: GroupId::new(require_target(kind, target)?)?,
                content: MessageContent::new(inbound.content)?,
            },
            MessageKind::DirectSend => Self::DirectSend {
                target: require_target(kind, target)?,
                content: MessageContent::new(inbound.content)?,
            },
            // join / leave は target が無ければ本文をグループ ID として扱う
            MessageKind::GroupJoin => Self::GroupJoin {
                group: GroupId::new(target_or_content(kind, target, inbound.content)?)?,
            },
            MessageKind::GroupLeave => Self::GroupLeave {
                group: GroupId::new(target_or_content(kind, target, inbound.content)?)?,
            },
            MessageKind::IdentityQuery => Self::IdentityQuery,
            MessageKind::ListUsers => Self::ListUsers,
            MessageKind::ListGroups => Self::ListGroups,
            MessageKind::AnalyticsQuery => Self::AnalyticsQuery,
            MessageKind::Exit => Self::Exit,
            MessageKind::Connected | MessageKind::Error => {
                return Err(RequestError::UnknownType(inbound.kind));
            }
        };
        Ok(request)
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Broadcast { .. } => MessageKind::Broadcast,
            Self::GroupSend { .. } => MessageKind::GroupSend,
            Self::DirectSend { .. } => MessageKind::DirectSend,
            Self::GroupJoin { .. } => MessageKind::GroupJoin,
            Self::GroupLeave { .. } => MessageKind::GroupLeave,
            Self::IdentityQuery => MessageKind::IdentityQuery,
            Self::ListUsers => MessageKind::ListUsers,
            Self::ListGroups => MessageKind::ListGroups,
            Self::AnalyticsQuery => MessageKind::AnalyticsQuery,
            Self::Exit => MessageKind::Exit,
        }
    }
}

fn require_target(kind: MessageKind, target: Option<String>) -> Result<String, RequestError> {
    target.ok_or_else(|| RequestError::MissingTarget(kind.as_str().to_string()))
}

fn target_or_content(
    kind: MessageKind,
    target: Option<String>,
    content: String,
) -> Result<String, RequestError> {
    match target {
        Some(target) => Ok(target),
        None if !content.trim().is_empty() => Ok(content),
        None => Err(RequestError::MissingTarget(kind.as_str().to_string())),
    }
}

/// 受信者ごとに送信される配送レコード
///
/// `sender` はサーバーが生成した応答では `None` になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    pub sender: Option<Identity>,
    pub target: Option<String>,
    pub content: String,
    /// サーバーが受信した時刻
    pub timestamp: Timestamp,
}

impl OutboundMessage {
    /// クライアントから宛先へ中継するメッセージ
    pub fn routed(
        kind: MessageKind,
        sender: Identity,
        target: Option<String>,
        content: String,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind,
            sender: Some(sender),
            target,
            content,
            timestamp,
        }
    }

    /// サーバーから送信者への応答
    pub fn reply(kind: MessageKind, content: String, timestamp: Timestamp) -> Self {
        Self {
            kind,
            sender: None,
            target: None,
            content,
            timestamp,
        }
    }

    /// 送信者への失敗通知
    pub fn error(content: String, timestamp: Timestamp) -> Self {
        Self::reply(MessageKind::Error, content, timestamp)
    }
}
