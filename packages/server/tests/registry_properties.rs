//! Property-based tests for the client registry and group membership

use std::{collections::HashSet, sync::Arc};

use hiroba_server::{
    domain::{ChatRepository, ChatState, ClientId, ClientIdFactory, DisplayName, GroupId, Identity, Timestamp},
    infrastructure::{message_pusher::WebSocketConnection, repository::InMemoryChatRepository},
    usecase::ConnectClientUseCase,
};
use hiroba_shared::time::FixedClock;
use proptest::prelude::*;
use tokio::sync::Mutex;

const CLIENTS: u8 = 6;
const GROUPS: u8 = 3;

#[derive(Debug, Clone)]
enum Op {
    Connect(u8),
    Join(u8, u8),
    Leave(u8, u8),
    Disconnect(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..CLIENTS).prop_map(Op::Connect),
        (0..CLIENTS, 0..GROUPS).prop_map(|(c, g)| Op::Join(c, g)),
        (0..CLIENTS, 0..GROUPS).prop_map(|(c, g)| Op::Leave(c, g)),
        (0..CLIENTS).prop_map(Op::Disconnect),
    ]
}

fn client_id(index: u8) -> ClientId {
    ClientId::new(format!("{:06}", u32::from(index) + 1)).unwrap()
}

fn group_id(index: u8) -> GroupId {
    GroupId::new(format!("group-{}", index)).unwrap()
}

fn identity(index: u8) -> Identity {
    Identity::new(
        client_id(index),
        DisplayName::new(format!("user{}", index)).unwrap(),
    )
}

fn apply(state: &mut ChatState, op: &Op) {
    match *op {
        Op::Connect(c) => {
            let (connection, _rx) = WebSocketConnection::channel(1);
            let _ = state.register(identity(c), Arc::new(connection), Timestamp::new(0));
        }
        Op::Join(c, g) => {
            let _ = state.join(group_id(g), &client_id(c));
        }
        Op::Leave(c, g) => {
            state.leave(&group_id(g), &client_id(c));
        }
        Op::Disconnect(c) => {
            state.remove(&client_id(c));
        }
    }
}

async fn apply_async(repository: &InMemoryChatRepository, op: Op) {
    match op {
        Op::Connect(c) => {
            let (connection, _rx) = WebSocketConnection::channel(1);
            let _ = repository
                .register(identity(c), Arc::new(connection), Timestamp::new(0))
                .await;
        }
        Op::Join(c, g) => {
            let _ = repository.join(group_id(g), &client_id(c)).await;
        }
        Op::Leave(c, g) => {
            repository.leave(&group_id(g), &client_id(c)).await;
        }
        Op::Disconnect(c) => {
            repository.remove(&client_id(c)).await;
        }
    }
}

/// Property: Any sequence of operations keeps the registry and groups consistent
#[test]
fn prop_sequential_operations_stay_consistent() {
    proptest!(|(ops in prop::collection::vec(op_strategy(), 1..80))| {
        let mut state = ChatState::new();

        for op in &ops {
            apply(&mut state, op);
            prop_assert!(state.is_consistent(), "inconsistent after {:?}", op);
        }
    });
}

/// Property: A disconnected client is never listed as a member of any group
#[test]
fn prop_disconnect_evicts_from_every_group() {
    proptest!(|(ops in prop::collection::vec(op_strategy(), 1..60), victim in 0..CLIENTS)| {
        let mut state = ChatState::new();
        for op in &ops {
            apply(&mut state, op);
        }
        let known_groups = state.list_group_ids();

        state.remove(&client_id(victim));

        for group in state.groups() {
            prop_assert!(!group.members.contains(&client_id(victim)));
        }
        // グループ自体は残る
        prop_assert_eq!(state.list_group_ids(), known_groups);
    });
}

/// Property: Random concurrent Join / Leave / Disconnect interleavings never leave a stale member
#[test]
fn prop_concurrent_interleavings_leave_no_stale_member() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();

    proptest!(ProptestConfig::with_cases(64), |(scripts in prop::collection::vec(
        prop::collection::vec(op_strategy(), 1..30),
        2..6,
    ))| {
        let state = Arc::new(Mutex::new(ChatState::new()));
        let repository = Arc::new(InMemoryChatRepository::new(state.clone()));

        runtime.block_on(async {
            let tasks: Vec<_> = scripts
                .into_iter()
                .map(|script| {
                    let repository = repository.clone();
                    tokio::spawn(async move {
                        for op in script {
                            apply_async(&repository, op).await;
                            tokio::task::yield_now().await;
                        }
                    })
                })
                .collect();
            for task in tasks {
                task.await.unwrap();
            }
        });

        let mut guard = state.try_lock().unwrap();
        prop_assert!(guard.is_consistent());

        // 全員が切断すると、全てのグループが空になる
        for c in 0..CLIENTS {
            guard.remove(&client_id(c));
        }
        prop_assert!(guard.groups().all(|group| group.members.is_empty()));
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_connections_get_distinct_ids() {
    // テスト項目: 同時に接続した 100 クライアントが全員異なる ID を得る
    // given (前提条件):
    let repository = Arc::new(InMemoryChatRepository::default());
    let usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        Arc::new(ClientIdFactory::new()),
        Arc::new(FixedClock::new(0)),
    ));

    // when (操作):
    let tasks: Vec<_> = (0..100)
        .map(|i| {
            let usecase = usecase.clone();
            tokio::spawn(async move {
                let (connection, _rx) = WebSocketConnection::channel(1);
                let name = DisplayName::new(format!("user{}", i % 3)).unwrap();
                usecase.execute(name, Arc::new(connection)).await.unwrap()
            })
        })
        .collect();
    let mut ids = HashSet::new();
    for task in tasks {
        ids.insert(task.await.unwrap().identity.id);
    }

    // then (期待する結果):
    assert_eq!(ids.len(), 100);
    assert_eq!(repository.count().await, 100);
}
