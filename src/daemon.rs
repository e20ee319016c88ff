use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::time::{Duration, MissedTickBehavior, interval};

use crate::session::{Session, SessionStats, TickOutcome};
use crate::terminal::TICK_INTERVAL_MS;
use crate::ws::websocket_server::{
    self, CommandReceiver, CommandReply, EventSender, ServerEvent,
};

/// Run in daemon mode - WebSocket control server + Pomodoro timer.
pub async fn run_daemon_mode(
    session: Session,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    // Bind up front so an unusable address fails the process.
    let listener = TcpListener::bind(addr).await?;

    let (command_tx, command_rx) = websocket_server::create_command_channel();
    let events = websocket_server::create_event_channel();

    let server_events = events.clone();
    tokio::spawn(async move {
        if let Err(e) = websocket_server::serve(listener, command_tx, server_events).await {
            eprintln!("WebSocket server error: {}", e);
        }
    });

    let stats = run_timer_loop(session, command_rx, events, tokio::signal::ctrl_c()).await;
    println!("\n{}\n", stats);
    Ok(())
}

/// Sole owner of the countdown: ticks it every second and applies client
/// commands in between. Ends when `shutdown` resolves or every command
/// sender is gone.
pub async fn run_timer_loop<F>(
    mut session: Session,
    mut commands: CommandReceiver,
    events: EventSender,
    shutdown: F,
) -> SessionStats
where
    F: Future<Output = io::Result<()>>,
{
    let mut timer_interval = interval(Duration::from_millis(TICK_INTERVAL_MS));
    timer_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer_interval.tick().await;

    tokio::pin!(shutdown);
    let mut shutdown_armed = true;

    loop {
        tokio::select! {
            _ = timer_interval.tick() => {
                match session.on_tick() {
                    TickOutcome::Idle => {}
                    TickOutcome::Advanced => publish_state(&session, &events),
                    TickOutcome::PhaseComplete(event) => {
                        println!("\n🔔 {} {}", event.mode.emoji(), event.message());
                        // No subscribers is not an error.
                        let _ = events.send(ServerEvent::from(event));
                        publish_state(&session, &events);
                    }
                }
            }
            request = commands.recv() => {
                let Some(request) = request else { break };
                let message = session.apply(request.command);
                println!("{}", message);
                let reply = CommandReply {
                    message,
                    state: session.countdown().snapshot(),
                };
                if request.reply.send(reply).is_err() {
                    log::debug!("Client went away before the reply was sent");
                }
                publish_state(&session, &events);
            }
            result = &mut shutdown, if shutdown_armed => {
                match result {
                    Ok(()) => break,
                    Err(e) => {
                        log::warn!("Ctrl+C handler unavailable: {}", e);
                        shutdown_armed = false;
                    }
                }
            }
        }
    }

    session.finish()
}

fn publish_state(session: &Session, events: &EventSender) {
    let _ = events.send(ServerEvent::State(session.countdown().snapshot()));
}
