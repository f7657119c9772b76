//! Entities
//!
//! クライアントレジストリとグループ管理が保持するエンティティ。

use std::{collections::BTreeSet, fmt};

use serde::Serialize;

use super::{
    connection::SharedConnection,
    value_object::{ClientId, DisplayName, GroupId, Timestamp},
};

/// クライアントの識別情報（サーバー採番の ID と表示名の組）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub id: ClientId,
    pub name: DisplayName,
}

impl Identity {
    pub fn new(id: ClientId, name: DisplayName) -> Self {
        Self { id, name }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// 接続中のクライアントのレコード
///
/// 接続時に作成され、グループの join / leave で更新され、切断時に破棄される。
#[derive(Clone)]
pub struct ClientRecord {
    pub identity: Identity,
    /// 送信口
    pub handle: SharedConnection,
    /// 現在参加しているグループ
    pub groups: BTreeSet<GroupId>,
    pub connected_at: Timestamp,
}

impl ClientRecord {
    pub fn new(identity: Identity, handle: SharedConnection, connected_at: Timestamp) -> Self {
        Self {
            identity,
            handle,
            groups: BTreeSet::new(),
            connected_at,
        }
    }

    pub fn id(&self) -> &ClientId {
        &self.identity.id
    }

    /// 配送に必要な部分（識別情報と送信口）だけを取り出す
    pub fn recipient(&self) -> Recipient {
        Recipient {
            identity: self.identity.clone(),
            handle: self.handle.clone(),
        }
    }
}

impl fmt::Debug for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRecord")
            .field("identity", &self.identity)
            .field("groups", &self.groups)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

/// 配送先
#[derive(Clone)]
pub struct Recipient {
    pub identity: Identity,
    pub handle: SharedConnection,
}

impl Recipient {
    pub fn id(&self) -> &ClientId {
        &self.identity.id
    }
}

impl fmt::Debug for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipient")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// グループ
///
/// 最初の join で暗黙的に作られ、メンバーが 0 人になっても削除されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub members: BTreeSet<ClientId>,
}

impl Group {
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            members: BTreeSet::new(),
        }
    }
}

/// join の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyMember,
}

/// leave の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    NotMember,
}

/// 集計カウンタのスナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AnalyticsSnapshot {
    /// 接続中のクライアント数
    pub active_users: usize,
    /// これまでに登録されたクライアントの延べ数
    pub total_users: u64,
    /// 既知のグループ数（メンバー 0 人のグループを含む）
    pub total_groups: usize,
    /// ルーティングされたメッセージ数
    pub total_messages: u64,
}
