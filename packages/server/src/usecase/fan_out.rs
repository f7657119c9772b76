//! 配送処理（ファンアウト）
//!
//! 解決済みの宛先へメッセージを配送します。共有状態のロックは一切保持しません。
//!
//! - 宛先ごとの送信は並行に実行し、遅い宛先が他の宛先への配送を遅らせない
//! - 送信キューが満杯の宛先へのメッセージは捨てられ、その宛先の失敗として数える
//! - 宛先ごとの送信には上限時間があり、超えた場合は `PushError::Timeout` として扱う
//! - 失敗はログに残すだけで、他の宛先や送信者には伝播しない

use std::time::Duration;

use futures_util::future::join_all;

use crate::domain::{OutboundMessage, PushError, Recipient, SharedConnection};

/// 配送結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

/// 宛先ごとにタイムアウト付きで並行配送する
#[derive(Debug, Clone, Copy)]
pub struct FanOut {
    send_timeout: Duration,
}

impl FanOut {
    pub fn new(send_timeout: Duration) -> Self {
        Self { send_timeout }
    }

    /// 宛先全員に配送する（best-effort）
    pub async fn deliver(
        &self,
        audience: Vec<Recipient>,
        message: OutboundMessage,
    ) -> DeliveryReport {
        let kind = message.kind.as_str();
        let sends = audience.into_iter().map(|recipient| {
            let message = message.clone();
            async move {
                match self.push(&recipient.handle, message).await {
                    Ok(()) => {
                        tracing::debug!("Delivered {} to client '{}'", kind, recipient.id());
                        true
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to deliver {} to client '{}': {}",
                            kind,
                            recipient.id(),
                            e
                        );
                        false
                    }
                }
            }
        });

        let results = join_all(sends).await;
        let delivered = results.iter().filter(|ok| **ok).count();
        DeliveryReport {
            delivered,
            failed: results.len() - delivered,
        }
    }

    /// 1 つの接続へタイムアウト付きで送信する
    pub async fn push(
        &self,
        handle: &SharedConnection,
        message: OutboundMessage,
    ) -> Result<(), PushError> {
        match tokio::time::timeout(self.send_timeout, handle.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(PushError::Timeout(
                u64::try_from(self.send_timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}
