use super::*;

use std::{net::SocketAddr, time::Duration};

use axum::routing::get;
use tokio::net::TcpListener;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};

use donjon_domain::SessionRecord;

use crate::app::GameRules;
use crate::infrastructure::catalog::StaticCatalog;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::session_store::InMemorySessionRepo;

pub(crate) use crate::use_cases::test_support::{
    alice, bob, now, running_session, session_id, waiting_session,
};

pub(crate) type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub(crate) const RECV_TIMEOUT: Duration = Duration::from_secs(2);
pub(crate) const QUIET_PERIOD: Duration = Duration::from_millis(200);

pub(crate) fn build_test_state(session: SessionRecord) -> Arc<WsState> {
    let store = Arc::new(InMemorySessionRepo::new());
    store.insert(session);
    let app = App::new(
        store,
        Arc::new(StaticCatalog::bundled().unwrap()),
        Arc::new(FixedClock(now())),
        GameRules::default(),
    );
    Arc::new(WsState::new(
        Arc::new(app),
        Arc::new(ConnectionManager::new()),
    ))
}

pub(crate) async fn spawn_ws_server(
    state: Arc<WsState>,
) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let router = axum::Router::new().route("/ws", get(ws_handler).with_state(state));

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, handle)
}

pub(crate) async fn ws_connect(addr: SocketAddr) -> WsClient {
    let url = format!("ws://{}/ws", addr);
    let (ws, _resp) = connect_async(url).await.unwrap();
    ws
}

pub(crate) async fn ws_send_client(ws: &mut WsClient, msg: &ClientMessage) {
    let json = serde_json::to_string(msg).unwrap();
    ws.send(WsMessage::Text(json)).await.unwrap();
}

pub(crate) async fn ws_recv_server(ws: &mut WsClient) -> ServerMessage {
    loop {
        let msg = ws.next().await.unwrap().unwrap();
        match msg {
            WsMessage::Text(text) => {
                return serde_json::from_str::<ServerMessage>(&text).unwrap();
            }
            WsMessage::Binary(bin) => {
                let text = String::from_utf8(bin).unwrap();
                return serde_json::from_str::<ServerMessage>(&text).unwrap();
            }
            _ => {}
        }
    }
}

pub(crate) async fn ws_expect_message<F>(
    ws: &mut WsClient,
    timeout: Duration,
    mut predicate: F,
) -> ServerMessage
where
    F: FnMut(&ServerMessage) -> bool,
{
    tokio::time::timeout(timeout, async {
        loop {
            let msg = ws_recv_server(ws).await;
            if predicate(&msg) {
                return msg;
            }
        }
    })
    .await
    .unwrap()
}

pub(crate) async fn ws_expect_no_message_matching<F>(
    ws: &mut WsClient,
    timeout: Duration,
    mut predicate: F,
) where
    F: FnMut(&ServerMessage) -> bool,
{
    let result = tokio::time::timeout(timeout, async {
        loop {
            let msg = ws_recv_server(ws).await;
            if predicate(&msg) {
                panic!("unexpected message: {:?}", msg);
            }
        }
    })
    .await;

    // Only a timeout without a matching message passes
    assert!(result.is_err());
}

/// Connect and join as `player`, waiting for the snapshot.
pub(crate) async fn join_as(addr: SocketAddr, player: &PlayerId) -> WsClient {
    let mut ws = ws_connect(addr).await;
    ws_send_client(
        &mut ws,
        &ClientMessage::JoinRoom {
            session_id: session_id().to_uuid(),
            player_id: player.to_string(),
            display_name: None,
        },
    )
    .await;
    ws_expect_message(&mut ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::SessionState { .. })
    })
    .await;
    ws
}
