//! UseCase: メッセージのルーティング
//!
//! 受信したリクエストを分類し、宛先を解決して配送する。
//!
//! - 宛先の解決はリポジトリ（ロック内）で行い、配送はロックの外で `FanOut` が行う
//! - broadcast は送信者を含む全員、group-send は送信者を除くグループメンバー、
//!   direct-send は ID（見つからなければ表示名）で解決した 1 人に届く
//! - 宛先の解決に失敗した場合は、送信者に error メッセージを 1 件返す
//! - 種別が不明なリクエストはログに残して破棄する（応答しない）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DispatchMessageUseCase::execute() の種別ごとの配送先と応答
//! - total_messages の集計（ルーティングしたメッセージ 1 件につき 1）
//!
//! ### なぜこのテストが必要か
//! - 宛先の取り違え（送信者への送り返し、届くべき相手への未配送）はチャットとして致命的
//! - 1 人の受信者の失敗や送信キューの詰まりが、送信者や他の受信者、共有状態を止めてはならない

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatRepository, ClientId, ClientRecord, InboundRequest, JoinOutcome, LeaveOutcome,
    MessageContent, MessageKind, OutboundMessage, Recipient, RegistryError, Request,
    RequestError, Timestamp,
};

use super::fan_out::{DeliveryReport, FanOut};

/// 1 件のリクエストを処理した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 宛先へ配送した（broadcast / group-send / direct-send）
    Routed(DeliveryReport),
    /// 送信者へ応答を返した（参照系・join / leave）
    Replied,
    /// 送信者へ error メッセージを返した
    Rejected(String),
    /// 種別が不明なため破棄した
    Dropped,
    /// セッションを終了する
    Exit,
}

/// メッセージルーティングのユースケース
pub struct DispatchMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    clock: Arc<dyn Clock>,
    fan_out: FanOut,
}

impl DispatchMessageUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>, clock: Arc<dyn Clock>, fan_out: FanOut) -> Self {
        Self {
            repository,
            clock,
            fan_out,
        }
    }

    /// 受信したリクエストを処理する
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信元のクライアント
    /// * `inbound` - 受信したリクエスト
    pub async fn execute(&self, sender: &ClientRecord, inbound: InboundRequest) -> DispatchOutcome {
        let received_at = Timestamp::new(self.clock.now_millis());

        let request = match Request::classify(inbound) {
            Ok(request) => request,
            Err(RequestError::UnknownType(tag)) => {
                tracing::warn!(
                    "Dropping request with unknown type '{}' from {}",
                    tag,
                    sender.identity
                );
                return DispatchOutcome::Dropped;
            }
            Err(e) => return self.reject(sender, e.to_string(), received_at).await,
        };
        tracing::debug!("{} from {}", request.kind().as_str(), sender.identity);

        match request {
            Request::Broadcast { content } => {
                let audience = self.repository.recipients().await;
                self.route(sender, MessageKind::Broadcast, None, content, audience, received_at)
                    .await
            }
            Request::GroupSend { group, content } => {
                match self.repository.members(&group).await {
                    Ok(members) => {
                        let audience = members
                            .into_iter()
                            .filter(|member| member.id() != sender.id())
                            .collect();
                        self.route(
                            sender,
                            MessageKind::GroupSend,
                            Some(group.into_string()),
                            content,
                            audience,
                            received_at,
                        )
                        .await
                    }
                    Err(e) => self.reject(sender, e.to_string(), received_at).await,
                }
            }
            Request::DirectSend { target, content } => match self.resolve_user(&target).await {
                Some(record) => {
                    self.route(
                        sender,
                        MessageKind::DirectSend,
                        Some(target),
                        content,
                        vec![record.recipient()],
                        received_at,
                    )
                    .await
                }
                None => {
                    let reason = RegistryError::UserNotFound(target).to_string();
                    self.reject(sender, reason, received_at).await
                }
            },
            Request::GroupJoin { group } => {
                let content = match self.repository.join(group.clone(), sender.id()).await {
                    Ok(JoinOutcome::Joined) => format!("Joined group {}.", group),
                    Ok(JoinOutcome::AlreadyMember) => {
                        format!("Already a member of group {}.", group)
                    }
                    Err(e) => return self.reject(sender, e.to_string(), received_at).await,
                };
                tracing::info!("{} joined group '{}'", sender.identity, group);
                self.reply(sender, MessageKind::GroupJoin, content, received_at)
                    .await
            }
            Request::GroupLeave { group } => {
                let content = match self.repository.leave(&group, sender.id()).await {
                    LeaveOutcome::Left => format!("Left group {}.", group),
                    LeaveOutcome::NotMember => format!("Not a member of group {}.", group),
                };
                self.reply(sender, MessageKind::GroupLeave, content, received_at)
                    .await
            }
            Request::IdentityQuery => {
                let message = OutboundMessage::routed(
                    MessageKind::IdentityQuery,
                    sender.identity.clone(),
                    None,
                    format!(
                        "Your ID: {}, Username: {}",
                        sender.id(),
                        sender.identity.name
                    ),
                    received_at,
                );
                self.push_to_sender(sender, message).await;
                DispatchOutcome::Replied
            }
            Request::ListUsers => {
                let identities = self.repository.active_identities().await;
                let users: Vec<String> = identities.iter().map(ToString::to_string).collect();
                let content = format!("Active users: {}", join_or_none(&users));
                self.reply(sender, MessageKind::ListUsers, content, received_at)
                    .await
            }
            Request::ListGroups => {
                let group_ids = self.repository.list_group_ids().await;
                let groups: Vec<String> = group_ids.iter().map(ToString::to_string).collect();
                let content = format!("Available groups: {}", join_or_none(&groups));
                self.reply(sender, MessageKind::ListGroups, content, received_at)
                    .await
            }
            Request::AnalyticsQuery => {
                let snapshot = self.repository.snapshot().await;
                match serde_json::to_string_pretty(&snapshot) {
                    Ok(content) => {
                        self.reply(sender, MessageKind::AnalyticsQuery, content, received_at)
                            .await
                    }
                    Err(e) => {
                        tracing::error!("Failed to serialize analytics snapshot: {}", e);
                        self.reject(sender, "Analytics unavailable".to_string(), received_at)
                            .await
                    }
                }
            }
            Request::Exit => {
                tracing::info!("{} requested exit", sender.identity);
                DispatchOutcome::Exit
            }
        }
    }

    /// direct-send の宛先を ID、次に表示名で解決する
    async fn resolve_user(&self, target: &str) -> Option<ClientRecord> {
        if let Ok(id) = ClientId::new(target.to_string()) {
            if let Some(record) = self.repository.lookup(&id).await {
                return Some(record);
            }
        }
        self.repository.lookup_by_name(target).await
    }

    async fn route(
        &self,
        sender: &ClientRecord,
        kind: MessageKind,
        target: Option<String>,
        content: MessageContent,
        audience: Vec<Recipient>,
        received_at: Timestamp,
    ) -> DispatchOutcome {
        self.repository.record_message().await;
        let message = OutboundMessage::routed(
            kind,
            sender.identity.clone(),
            target,
            content.into_string(),
            received_at,
        );
        let report = self.fan_out.deliver(audience, message).await;
        tracing::debug!(
            "Routed {} from {}: {} delivered, {} failed",
            kind.as_str(),
            sender.identity,
            report.delivered,
            report.failed
        );
        DispatchOutcome::Routed(report)
    }

    async fn reply(
        &self,
        sender: &ClientRecord,
        kind: MessageKind,
        content: String,
        received_at: Timestamp,
    ) -> DispatchOutcome {
        self.push_to_sender(sender, OutboundMessage::reply(kind, content, received_at))
            .await;
        DispatchOutcome::Replied
    }

    async fn reject(
        &self,
        sender: &ClientRecord,
        reason: String,
        received_at: Timestamp,
    ) -> DispatchOutcome {
        tracing::debug!("Rejecting request from {}: {}", sender.identity, reason);
        self.push_to_sender(sender, OutboundMessage::error(reason.clone(), received_at))
            .await;
        DispatchOutcome::Rejected(reason)
    }

    async fn push_to_sender(&self, sender: &ClientRecord, message: OutboundMessage) {
        if let Err(e) = self.fan_out.push(&sender.handle, message).await {
            tracing::warn!("Failed to reply to {}: {}", sender.identity, e);
        }
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
