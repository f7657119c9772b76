//! InMemory Chat Repository 実装
//!
//! ドメイン層が定義する ChatRepository trait の具体的な実装。
//! `ChatState` 集約を 1 つの `Mutex` で守り、全ての操作を同じクリティカルセクションで直列化します。
//!
//! 返り値は全てクローンなので、呼び出し側が配送処理を行っている間はロックを保持しません。
//! 配送先の解決（`recipients` / `members`）は識別情報と送信口だけを複製します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    AnalyticsSnapshot, ChatRepository, ChatState, ClientId, ClientRecord, Group, GroupId,
    Identity, JoinOutcome, LeaveOutcome, Recipient, RegistryError, SharedConnection, Timestamp,
};

/// インメモリ Chat Repository 実装
pub struct InMemoryChatRepository {
    /// レジストリ・グループ・カウンタの集約
    state: Arc<Mutex<ChatState>>,
}

impl InMemoryChatRepository {
    /// 新しい InMemoryChatRepository を作成
    pub fn new(state: Arc<Mutex<ChatState>>) -> Self {
        Self { state }
    }
}

impl Default for InMemoryChatRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(ChatState::new())))
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn register(
        &self,
        identity: Identity,
        handle: SharedConnection,
        connected_at: Timestamp,
    ) -> Result<ClientRecord, RegistryError> {
        let mut state = self.state.lock().await;
        state
            .register(identity, handle, connected_at)
            .map(ClientRecord::clone)
    }

    async fn lookup(&self, id: &ClientId) -> Option<ClientRecord> {
        let state = self.state.lock().await;
        state.lookup(id).cloned()
    }

    async fn lookup_by_name(&self, name: &str) -> Option<ClientRecord> {
        let state = self.state.lock().await;
        state.lookup_by_name(name).cloned()
    }

    async fn remove(&self, id: &ClientId) -> Option<ClientRecord> {
        let mut state = self.state.lock().await;
        let removed = state.remove(id);
        debug_assert!(state.is_consistent());
        removed
    }

    async fn count(&self) -> usize {
        let state = self.state.lock().await;
        state.count()
    }

    async fn all_clients(&self) -> Vec<ClientRecord> {
        let state = self.state.lock().await;
        state.clients().cloned().collect()
    }

    async fn recipients(&self) -> Vec<Recipient> {
        let state = self.state.lock().await;
        state.clients().map(ClientRecord::recipient).collect()
    }

    async fn active_identities(&self) -> Vec<Identity> {
        let state = self.state.lock().await;
        state.active_identities()
    }

    async fn join(
        &self,
        group_id: GroupId,
        client_id: &ClientId,
    ) -> Result<JoinOutcome, RegistryError> {
        let mut state = self.state.lock().await;
        state.join(group_id, client_id)
    }

    async fn leave(&self, group_id: &GroupId, client_id: &ClientId) -> LeaveOutcome {
        let mut state = self.state.lock().await;
        state.leave(group_id, client_id)
    }

    async fn members(&self, group_id: &GroupId) -> Result<Vec<Recipient>, RegistryError> {
        let state = self.state.lock().await;
        state
            .members(group_id)
            .map(|members| members.into_iter().map(ClientRecord::recipient).collect())
    }

    async fn list_group_ids(&self) -> Vec<GroupId> {
        let state = self.state.lock().await;
        state.list_group_ids()
    }

    async fn groups(&self) -> Vec<Group> {
        let state = self.state.lock().await;
        state.groups().cloned().collect()
    }

    async fn record_message(&self) {
        let mut state = self.state.lock().await;
        state.record_message();
    }

    async fn snapshot(&self) -> AnalyticsSnapshot {
        let state = self.state.lock().await;
        state.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, MockConnectionHandle};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryChatRepository が ChatState の操作をロック越しに正しく委譲すること
    // - 返り値がスナップショットであり、ロックを保持し続けないこと
    //
    // 【どのようなシナリオをテストするか】
    // 1. 登録したクライアントの検索
    // 2. 削除と全グループからの除名が同時に反映される
    // 3. メンバー取得のスナップショットを保持したまま他の操作ができる
    // ========================================

    fn identity(id: &str, name: &str) -> Identity {
        Identity::new(
            ClientId::new(id.to_string()).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
        )
    }

    fn group(id: &str) -> GroupId {
        GroupId::new(id.to_string()).unwrap()
    }

    async fn register(repo: &InMemoryChatRepository, id: &str, name: &str) -> ClientRecord {
        repo.register(
            identity(id, name),
            Arc::new(MockConnectionHandle::new()),
            Timestamp::new(1000),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        // テスト項目: 登録したクライアントを ID と表示名で検索できる
        // given (前提条件):
        let repo = InMemoryChatRepository::default();

        // when (操作):
        let record = register(&repo, "000001", "alice").await;

        // then (期待する結果):
        assert_eq!(record.id().as_str(), "000001");
        assert!(repo.lookup(record.id()).await.is_some());
        assert_eq!(
            repo.lookup_by_name("alice").await.map(|r| r.identity),
            Some(identity("000001", "alice"))
        );
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_remove_evicts_from_groups_atomically() {
        // テスト項目: 削除するとレジストリとグループの両方から同時に消える
        // given (前提条件):
        let state = Arc::new(Mutex::new(ChatState::new()));
        let repo = InMemoryChatRepository::new(state.clone());
        let alice = register(&repo, "000001", "alice").await;
        repo.join(group("lobby"), alice.id()).await.unwrap();

        // when (操作):
        let removed = repo.remove(alice.id()).await;

        // then (期待する結果):
        assert!(removed.is_some());
        assert_eq!(repo.count().await, 0);
        assert_eq!(repo.members(&group("lobby")).await.map(|m| m.len()), Ok(0));
        assert_eq!(repo.list_group_ids().await, vec![group("lobby")]);
        assert!(state.lock().await.is_consistent());
    }

    #[tokio::test]
    async fn test_members_snapshot_does_not_hold_lock() {
        // テスト項目: メンバーのスナップショットを保持したまま他の操作が完了する
        // given (前提条件):
        let repo = InMemoryChatRepository::default();
        let alice = register(&repo, "000001", "alice").await;
        repo.join(group("lobby"), alice.id()).await.unwrap();
        let members = repo.members(&group("lobby")).await.unwrap();

        // when (操作):
        let bob = register(&repo, "000002", "bob").await;
        repo.join(group("lobby"), bob.id()).await.unwrap();

        // then (期待する結果):
        assert_eq!(members.len(), 1);
        assert_eq!(repo.members(&group("lobby")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_recipients_resolve_identity_and_handle() {
        // テスト項目: 配送先の解決は識別情報と送信口を返し、グループ所属は含まない
        // given (前提条件):
        let repo = InMemoryChatRepository::default();
        let alice = register(&repo, "000001", "alice").await;
        let bob = register(&repo, "000002", "bob").await;
        repo.join(group("lobby"), bob.id()).await.unwrap();

        // when (操作):
        let everyone = repo.recipients().await;
        let lobby = repo.members(&group("lobby")).await.unwrap();

        // then (期待する結果):
        let mut ids: Vec<_> = everyone.iter().map(|r| r.id().clone()).collect();
        ids.sort();
        assert_eq!(ids, vec![alice.id().clone(), bob.id().clone()]);
        assert_eq!(lobby.len(), 1);
        assert_eq!(lobby[0].identity, bob.identity);
        assert!(Arc::ptr_eq(&lobby[0].handle, &bob.handle));
    }

    #[tokio::test]
    async fn test_snapshot_and_groups() {
        // テスト項目: スナップショットとグループ一覧が状態を反映する
        // given (前提条件):
        let repo = InMemoryChatRepository::default();
        let alice = register(&repo, "000001", "alice").await;
        let bob = register(&repo, "000002", "bob").await;
        repo.join(group("lobby"), alice.id()).await.unwrap();
        repo.join(group("lobby"), bob.id()).await.unwrap();
        repo.record_message().await;

        // when (操作):
        let snapshot = repo.snapshot().await;
        let groups = repo.groups().await;

        // then (期待する結果):
        assert_eq!(snapshot.active_users, 2);
        assert_eq!(snapshot.total_groups, 1);
        assert_eq!(snapshot.total_messages, 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 2);
    }
}
