//! クライアント ID の採番

use std::sync::atomic::{AtomicU64, Ordering};

use super::value_object::ClientId;

/// 接続ごとに一意なクライアント ID を採番するファクトリ
///
/// プロセス内で単調増加するカウンタから `000001`, `000002`, ... を払い出す。
/// 一度払い出した ID は再利用しない。
#[derive(Debug)]
pub struct ClientIdFactory {
    next: AtomicU64,
}

impl ClientIdFactory {
    /// ID の最小桁数
    pub const ID_WIDTH: usize = 6;

    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// 指定した番号から採番を始めるファクトリを作成
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// 新しいクライアント ID を払い出す
    pub fn generate(&self) -> ClientId {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        ClientId::from_sequence(sequence, Self::ID_WIDTH)
    }
}

impl Default for ClientIdFactory {
    fn default() -> Self {
        Self::new()
    }
}
