//! Monitoring session
//!
//! Three cooperating tasks on one thread: status polling, operator input and
//! the tail/render loop. The render loop only needs the log path; it re-reads
//! the file on every refresh.

use anyhow::Result;
use coolmon_core::config::MonitorConfig;
use coolmon_core::controller::{
    ControllerError, ControllerLink, ControllerReader, ControllerWriter, STATUS_COMMAND,
};
use coolmon_core::logbook::{LogWriter, HEARTBEAT_TOKEN};
use coolmon_core::view::{poll_frame, PlotEvent, PlotState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use crate::panel::render_panel;

/// A line typed by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorInput {
    /// Send to the controller
    Forward(String),
    /// End the session
    Quit,
    /// Change the render block size
    BlockSize(i64),
    /// Unrecognised local command
    Invalid(String),
    /// Nothing typed
    Empty,
}

impl OperatorInput {
    /// Interpret one line of operator input.
    ///
    /// Lines starting with `:` are handled locally; everything else goes to
    /// the controller.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return OperatorInput::Empty;
        }
        let Some(local) = line.strip_prefix(':') else {
            return OperatorInput::Forward(line.to_string());
        };

        let mut words = local.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("quit" | "q"), None, None) => OperatorInput::Quit,
            (Some("block"), Some(size), None) => match size.parse() {
                Ok(size) => OperatorInput::BlockSize(size),
                Err(_) => OperatorInput::Invalid(line.to_string()),
            },
            _ => OperatorInput::Invalid(line.to_string()),
        }
    }
}

type SharedLog = Arc<Mutex<LogWriter>>;
type SharedController = Arc<Mutex<ControllerWriter>>;

/// Run the session until the operator quits or Ctrl-C is pressed
pub async fn run(link: ControllerLink, writer: LogWriter, config: &MonitorConfig) -> Result<()> {
    let log_path = writer.path().to_path_buf();
    let (reader, controller) = link.into_split();
    let controller: SharedController = Arc::new(Mutex::new(controller));
    let logbook: SharedLog = Arc::new(Mutex::new(writer));
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let poll_interval = config.controller.poll_interval();
    let poll = tokio::spawn({
        let controller = controller.clone();
        let logbook = logbook.clone();
        async move {
            if let Err(e) = poll_status(reader, controller, logbook, poll_interval).await {
                tracing::error!("Status polling stopped: {:#}", e);
            }
        }
    });

    let input = tokio::spawn({
        let events = events_tx.clone();
        async move {
            let stdin = BufReader::new(tokio::io::stdin());
            if let Err(e) = handle_operator(stdin, controller, logbook, events).await {
                tracing::error!("Operator input stopped: {:#}", e);
            }
        }
    });

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("closing!");
            let _ = events_tx.send(PlotEvent::Closed);
        }
    });

    render_loop(
        log_path,
        PlotState::new(config.block_size),
        events_rx,
        config.render_delay(),
        config.render_interval(),
    )
    .await;

    poll.abort();
    input.abort();
    interrupt.abort();
    Ok(())
}

/// Periodically request controller status and log the response.
///
/// A response timeout ends polling; the render loop keeps going.
async fn poll_status(
    mut reader: ControllerReader,
    controller: SharedController,
    logbook: SharedLog,
    interval: Duration,
) -> Result<()> {
    loop {
        tokio::time::sleep(interval).await;

        let line = logbook.lock().await.record(HEARTBEAT_TOKEN)?;
        println!("{line}");
        controller.lock().await.send(STATUS_COMMAND).await?;

        match reader.recv().await {
            Ok(lines) => {
                let mut logbook = logbook.lock().await;
                for response in lines {
                    println!("{}", logbook.record(&response)?);
                }
            }
            Err(ControllerError::Timeout) => {
                tracing::warn!("Controller did not answer in time; status polling stopped");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Forward operator commands to the controller and log them.
///
/// A failed send is reported and the command is not logged; input keeps being
/// read so `:quit` still ends the session.
async fn handle_operator<R>(
    input: R,
    controller: SharedController,
    logbook: SharedLog,
    events: mpsc::UnboundedSender<PlotEvent>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match OperatorInput::parse(&line) {
            OperatorInput::Forward(command) => {
                if let Err(e) = controller.lock().await.send(&command).await {
                    tracing::warn!("Not sent: {}", e);
                    continue;
                }
                logbook.lock().await.record(&command)?;
            }
            OperatorInput::BlockSize(size) => {
                tracing::info!("Tail block size set to {}", size);
                let _ = events.send(PlotEvent::BlockSize(size));
            }
            OperatorInput::Quit => {
                let _ = events.send(PlotEvent::Closed);
                return Ok(());
            }
            OperatorInput::Invalid(text) => {
                tracing::warn!("Unknown local command {:?} (try :quit or :block <bytes>)", text);
            }
            OperatorInput::Empty => {}
        }
    }

    Ok(())
}

/// Redraw the panel from the log tail until the plot is closed
async fn render_loop(
    log_path: PathBuf,
    mut state: PlotState,
    mut events: mpsc::UnboundedReceiver<PlotEvent>,
    delay: Duration,
    interval: Duration,
) {
    tokio::time::sleep(delay).await;
    let title = format!("Log File: {}", log_path.display());
    let mut ticker = tokio::time::interval(interval);

    while state.is_running() {
        tokio::select! {
            Some(event) = events.recv() => state.apply(event),
            _ = ticker.tick() => match poll_frame(&log_path, state.block_size()) {
                Ok(Some(frame)) => {
                    if frame.log.skipped > 0 {
                        tracing::debug!("Skipped {} malformed log lines", frame.log.skipped);
                    }
                    if frame.has_data() {
                        println!("{}", render_panel(&frame, &title));
                    }
                }
                Ok(None) => tracing::debug!("Log {} not created yet", log_path.display()),
                Err(e) => tracing::warn!("Failed to read log tail: {}", e),
            },
        }
    }

    tracing::info!("Closing figure.");
}
