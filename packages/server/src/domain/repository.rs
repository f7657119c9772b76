//! Repository trait 定義
//!
//! ルーティングの中核が必要とする共有状態へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 原子性
//!
//! 各メソッドは 1 回の呼び出しで完結する単位として原子的に実行されます。
//! 特に `remove` は、レジストリからの削除と全グループからの除名を同じクリティカルセクション内で行います。
//!
//! 返り値は全てスナップショット（所有権を持つコピー）で、呼び出し側が保持している間も
//! 共有状態のロックは保持されません。

use async_trait::async_trait;

use super::{
    AnalyticsSnapshot, ClientId, ClientRecord, Group, GroupId, Identity, JoinOutcome,
    LeaveOutcome, Recipient, RegistryError, SharedConnection, Timestamp,
};

/// Chat Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// クライアントを登録
    async fn register(
        &self,
        identity: Identity,
        handle: SharedConnection,
        connected_at: Timestamp,
    ) -> Result<ClientRecord, RegistryError>;

    /// ID でクライアントを検索
    async fn lookup(&self, id: &ClientId) -> Option<ClientRecord>;

    /// 表示名でクライアントを検索（重複時は ID が最小のもの）
    async fn lookup_by_name(&self, name: &str) -> Option<ClientRecord>;

    /// クライアントを削除し、全グループから除名（冪等）
    async fn remove(&self, id: &ClientId) -> Option<ClientRecord>;

    /// 接続中のクライアント数
    async fn count(&self) -> usize;

    /// 接続中の全クライアント
    async fn all_clients(&self) -> Vec<ClientRecord>;

    /// 接続中の全クライアントの配送先
    async fn recipients(&self) -> Vec<Recipient>;

    /// 接続中のクライアントの識別情報（ID 順）
    async fn active_identities(&self) -> Vec<Identity>;

    /// グループに参加（無ければ作成）
    async fn join(
        &self,
        group_id: GroupId,
        client_id: &ClientId,
    ) -> Result<JoinOutcome, RegistryError>;

    /// グループから抜ける
    async fn leave(&self, group_id: &GroupId, client_id: &ClientId) -> LeaveOutcome;

    /// グループのメンバーの配送先
    async fn members(&self, group_id: &GroupId) -> Result<Vec<Recipient>, RegistryError>;

    /// 既知のグループ ID の一覧
    async fn list_group_ids(&self) -> Vec<GroupId>;

    /// 全グループとそのメンバー
    async fn groups(&self) -> Vec<Group>;

    /// ルーティングしたメッセージを数える
    async fn record_message(&self);

    /// 集計カウンタのスナップショット
    async fn snapshot(&self) -> AnalyticsSnapshot;
}
