use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::command::Command;
use crate::pomodoro::{PhaseComplete, PomodoroMode, TimerSnapshot};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8765";
const EVENT_BUFFER: usize = 64;

#[derive(Debug, Serialize)]
pub struct WebSocketResponse {
    pub success: bool,
    pub message: Option<String>,
    pub state: Option<TimerSnapshot>,
}

/// Pushed to every connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    State(TimerSnapshot),
    PhaseComplete {
        mode: PomodoroMode,
        completed_work_cycles: u32,
        message: String,
    },
}

impl From<PhaseComplete> for ServerEvent {
    fn from(event: PhaseComplete) -> Self {
        ServerEvent::PhaseComplete {
            mode: event.mode,
            completed_work_cycles: event.completed_work_cycles,
            message: event.message().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct CommandReply {
    pub message: String,
    pub state: TimerSnapshot,
}

/// A command from a client, answered by whoever owns the countdown.
#[derive(Debug)]
pub struct CommandRequest {
    pub command: Command,
    pub reply: oneshot::Sender<CommandReply>,
}

pub type CommandSender = mpsc::UnboundedSender<CommandRequest>;
pub type CommandReceiver = mpsc::UnboundedReceiver<CommandRequest>;
pub type EventSender = broadcast::Sender<ServerEvent>;

pub fn create_command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::unbounded_channel()
}

pub fn create_event_channel() -> EventSender {
    broadcast::channel(EVENT_BUFFER).0
}

/// Accept connections on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    command_tx: CommandSender,
    events: EventSender,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("WebSocket server listening on: {}", listener.local_addr()?);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        println!("New WebSocket connection from: {}", peer_addr);
        let tx = command_tx.clone();
        let rx = events.subscribe();
        tokio::spawn(handle_connection(stream, peer_addr, tx, rx));
    }

    Ok(())
}

/// Forward a command to the countdown owner and build the client response.
pub async fn dispatch(command_tx: &CommandSender, text: &str) -> WebSocketResponse {
    let command = match serde_json::from_str::<Command>(text) {
        Ok(command) => command,
        Err(e) => {
            return WebSocketResponse {
                success: false,
                message: Some(format!("Parse error: {}", e)),
                state: None,
            };
        }
    };

    let (reply_tx, reply_rx) = oneshot::channel();
    let request = CommandRequest {
        command,
        reply: reply_tx,
    };
    if command_tx.send(request).is_err() {
        return WebSocketResponse {
            success: false,
            message: Some("Timer is not running".to_string()),
            state: None,
        };
    }

    match reply_rx.await {
        Ok(reply) => WebSocketResponse {
            success: true,
            message: Some(reply.message),
            state: Some(reply.state),
        },
        Err(_) => WebSocketResponse {
            success: false,
            message: Some("Timer dropped the command".to_string()),
            state: None,
        },
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    command_tx: CommandSender,
    mut events: broadcast::Receiver<ServerEvent>,
) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed with {}: {}", peer_addr, e);
            return;
        }
    };

    println!("WebSocket handshake completed with {}", peer_addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    loop {
        tokio::select! {
            msg = ws_receiver.next() => {
                let Some(msg) = msg else { break };
                match msg {
                    Ok(Message::Text(text)) => {
                        log::debug!("[WebSocket] {} sent: {}", peer_addr, text);
                        let response = dispatch(&command_tx, &text).await;
                        if let Ok(response_json) = serde_json::to_string(&response) {
                            if let Err(e) = ws_sender.send(Message::Text(response_json)).await {
                                eprintln!("Failed to send WebSocket response: {}", e);
                                break;
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        println!("WebSocket connection closed by {}", peer_addr);
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        if let Err(e) = ws_sender.send(Message::Pong(data)).await {
                            eprintln!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        eprintln!("WebSocket error from {}: {}", peer_addr, e);
                        break;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Ok(event_json) = serde_json::to_string(&event) {
                            if let Err(e) = ws_sender.send(Message::Text(event_json)).await {
                                eprintln!("Failed to push event to {}: {}", peer_addr, e);
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("{} lagged behind, skipped {} events", peer_addr, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    println!("WebSocket connection with {} terminated", peer_addr);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pomodoro::{Countdown, TimerConfig};

    #[test]
    fn test_response_serialization() {
        let response = WebSocketResponse {
            success: true,
            message: Some("Timer started".to_string()),
            state: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"message\":\"Timer started\""));
        assert!(json.contains("\"state\":null"));
    }

    #[test]
    fn test_event_serialization() {
        let event = ServerEvent::from(PhaseComplete {
            mode: PomodoroMode::ShortBreak,
            completed_work_cycles: 1,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"phase_complete\""));
        assert!(json.contains("\"mode\":\"short_break\""));
        assert!(json.contains("\"completed_work_cycles\":1"));

        let state = ServerEvent::State(Countdown::new(TimerConfig::default()).snapshot());
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"type\":\"state\""));
        assert!(json.contains("\"display\":\"25:00\""));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_bad_json() {
        let (tx, _rx) = create_command_channel();
        let response = dispatch(&tx, "not json").await;
        assert!(!response.success);
        assert!(response.message.unwrap().starts_with("Parse error"));
    }

    #[tokio::test]
    async fn test_dispatch_without_owner() {
        let (tx, rx) = create_command_channel();
        drop(rx);
        let response = dispatch(&tx, r#"{"command":"toggle"}"#).await;
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Timer is not running"));
    }

    #[tokio::test]
    async fn test_dispatch_round_trip_through_owner() {
        let (tx, mut rx) = create_command_channel();
        let owner = tokio::spawn(async move {
            let mut countdown = Countdown::new(TimerConfig::default());
            let request = rx.recv().await.unwrap();
            assert_eq!(request.command, Command::Toggle);
            countdown.toggle_running();
            let _ = request.reply.send(CommandReply {
                message: "Timer started".to_string(),
                state: countdown.snapshot(),
            });
        });

        let response = dispatch(&tx, r#"{"command":"toggle"}"#).await;
        owner.await.unwrap();
        assert!(response.success);
        assert!(response.state.unwrap().is_running);
    }
}
