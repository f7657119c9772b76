//! Repository 実装
//!
//! - `inmemory`: プロセス内のメモリに状態を保持する実装（再起動で破棄される）

pub mod inmemory;

pub use inmemory::InMemoryChatRepository;
