//! ChatState: クライアントレジストリ・グループ管理・集計カウンタをまとめた集約
//!
//! 3 つの構造は互いに整合していなければならないため、1 つの集約として 1 つのロックで守ります。
//!
//! ## 不変条件
//!
//! - どのグループのメンバーも、レジストリに登録された接続中のクライアントである
//! - クライアントの `groups` は、そのクライアントが所属するグループの集合と一致する
//!
//! 切断時は `remove` がレジストリからの削除と全グループからの除名を同時に行います。

use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use super::{
    connection::SharedConnection,
    entity::{AnalyticsSnapshot, ClientRecord, Group, Identity, JoinOutcome, LeaveOutcome},
    error::RegistryError,
    value_object::{ClientId, GroupId, Timestamp},
};

#[derive(Debug, Default)]
pub struct ChatState {
    clients: HashMap<ClientId, ClientRecord>,
    groups: BTreeMap<GroupId, Group>,
    total_users: u64,
    total_messages: u64,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================
    // Client Registry
    // ========================================

    /// クライアントを登録する
    ///
    /// ID が衝突した場合は `DuplicateIdentity`。ID はサーバーが採番するため、
    /// 呼び出し側はこれを不変条件違反として扱う。
    pub fn register(
        &mut self,
        identity: Identity,
        handle: SharedConnection,
        connected_at: Timestamp,
    ) -> Result<&ClientRecord, RegistryError> {
        match self.clients.entry(identity.id.clone()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateIdentity(
                identity.id.into_string(),
            )),
            Entry::Vacant(entry) => {
                self.total_users += 1;
                Ok(entry.insert(ClientRecord::new(identity, handle, connected_at)))
            }
        }
    }

    pub fn lookup(&self, id: &ClientId) -> Option<&ClientRecord> {
        self.clients.get(id)
    }

    /// 表示名でクライアントを探す
    ///
    /// 表示名は一意ではないため、一致するクライアントのうち ID が最小のものを返す。
    pub fn lookup_by_name(&self, name: &str) -> Option<&ClientRecord> {
        self.clients
            .values()
            .filter(|record| record.identity.name.as_str() == name)
            .min_by(|a, b| a.id().cmp(b.id()))
    }

    /// クライアントを削除し、所属していた全てのグループからも除名する（冪等）
    pub fn remove(&mut self, id: &ClientId) -> Option<ClientRecord> {
        let record = self.clients.remove(id)?;
        self.remove_client_from_all_groups(id);
        Some(record)
    }

    pub fn count(&self) -> usize {
        self.clients.len()
    }

    /// 接続中の全クライアント（順不同）
    pub fn clients(&self) -> impl Iterator<Item = &ClientRecord> {
        self.clients.values()
    }

    /// 接続中のクライアントの識別情報（ID 順）
    pub fn active_identities(&self) -> Vec<Identity> {
        let mut identities: Vec<Identity> = self
            .clients
            .values()
            .map(|record| record.identity.clone())
            .collect();
        identities.sort_by(|a, b| a.id.cmp(&b.id));
        identities
    }

    // ========================================
    // Group Membership
    // ========================================

    /// グループに参加する（グループが無ければ作成する、冪等）
    ///
    /// 接続中でないクライアントは参加できない（`UserNotFound`）。
    pub fn join(
        &mut self,
        group_id: GroupId,
        client_id: &ClientId,
    ) -> Result<JoinOutcome, RegistryError> {
        let record = self
            .clients
            .get_mut(client_id)
            .ok_or_else(|| RegistryError::UserNotFound(client_id.to_string()))?;
        record.groups.insert(group_id.clone());

        let group = self
            .groups
            .entry(group_id.clone())
            .or_insert_with(|| Group::new(group_id));
        if group.members.insert(client_id.clone()) {
            Ok(JoinOutcome::Joined)
        } else {
            Ok(JoinOutcome::AlreadyMember)
        }
    }

    /// グループから抜ける。メンバーでなければ何もしない。空になったグループも残す。
    pub fn leave(&mut self, group_id: &GroupId, client_id: &ClientId) -> LeaveOutcome {
        if let Some(record) = self.clients.get_mut(client_id) {
            record.groups.remove(group_id);
        }
        match self.groups.get_mut(group_id) {
            Some(group) => {
                if group.members.remove(client_id) {
                    LeaveOutcome::Left
                } else {
                    LeaveOutcome::NotMember
                }
            }
            None => LeaveOutcome::NotMember,
        }
    }

    /// 全てのグループからクライアントを除名し、除名したグループ数を返す
    pub fn remove_client_from_all_groups(&mut self, client_id: &ClientId) -> usize {
        let evicted = self
            .groups
            .values_mut()
            .map(|group| group.members.remove(client_id))
            .filter(|removed| *removed)
            .count();
        if let Some(record) = self.clients.get_mut(client_id) {
            record.groups.clear();
        }
        evicted
    }

    /// グループのメンバー（ID 順）
    ///
    /// 一度も join されていないグループは `GroupNotFound`、メンバー 0 人のグループは空の Vec。
    pub fn members(&self, group_id: &GroupId) -> Result<Vec<&ClientRecord>, RegistryError> {
        let group = self
            .groups
            .get(group_id)
            .ok_or_else(|| RegistryError::GroupNotFound(group_id.to_string()))?;
        Ok(group
            .members
            .iter()
            .filter_map(|id| self.clients.get(id))
            .collect())
    }

    /// 既知のグループ ID（辞書順、メンバー 0 人のグループを含む）
    pub fn list_group_ids(&self) -> Vec<GroupId> {
        self.groups.keys().cloned().collect()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    // ========================================
    // Analytics
    // ========================================

    /// ルーティングしたメッセージを 1 件数える
    pub fn record_message(&mut self) {
        self.total_messages += 1;
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            active_users: self.clients.len(),
            total_users: self.total_users,
            total_groups: self.groups.len(),
            total_messages: self.total_messages,
        }
    }

    /// レジストリとグループの不変条件が成り立っているか
    pub fn is_consistent(&self) -> bool {
        let members_are_live = self.groups.values().all(|group| {
            group.members.iter().all(|id| {
                self.clients
                    .get(id)
                    .is_some_and(|record| record.groups.contains(&group.id))
            })
        });
        let memberships_are_recorded = self.clients.values().all(|record| {
            record.groups.iter().all(|group_id| {
                self.groups
                    .get(group_id)
                    .is_some_and(|group| group.members.contains(record.id()))
            })
        });
        members_are_live && memberships_are_recorded
    }
}
