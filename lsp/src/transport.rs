//! Transports: owning the channel to one backend process.
//!
//! A [`Connector`] opens transports for a session; a [`Transport`] is one
//! open channel. The stdio implementation spawns the backend, runs a writer
//! task and a reader task over its pipes, and reports trouble through the
//! [`EventSink`] it was opened with.

use std::collections::HashMap;
use std::env;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;

use bond_types::{ENV_SECRET_DENYLIST, SessionConfig, TraceLevel};

use crate::codec::{FrameReader, FrameWriter};
use crate::protocol::{self, IncomingFrame, MessageType, Notification, Request};
use crate::types::EventSink;

const INIT_TIMEOUT: Duration = Duration::from_secs(30);

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

const WRITER_CHANNEL_CAPACITY: usize = 64;

/// Opens transports for a session.
pub trait Connector {
    type Transport: Transport;

    /// Open a transport and complete its handshake.
    ///
    /// An `Err` means the channel never came up; the session treats it like
    /// a close. Dropping the returned future must release anything it
    /// started.
    fn open(
        &mut self,
        config: &SessionConfig,
        sink: EventSink,
    ) -> impl Future<Output = Result<Self::Transport>>;
}

/// One open channel to a backend process.
pub trait Transport {
    /// Close the channel and wait until the backend is gone.
    fn close(self) -> impl Future<Output = ()>;
}

enum WriterCommand {
    Send(Value),
    Shutdown,
}

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Value>>>>;

/// Minimal glob matcher for env var denylist patterns.
/// Handles `*_SUFFIX`, `PREFIX_*`, `*_INFIX*`, and exact match.
/// Both pattern and key are compared in uppercase.
fn env_glob_matches(pattern: &str, key_upper: &str) -> bool {
    let pat = pattern.to_uppercase();
    match (pat.strip_prefix('*'), pat.strip_suffix('*')) {
        (Some(rest), Some(_)) => match rest.strip_suffix('*') {
            Some(inner) => key_upper.contains(inner),
            // A lone "*" matches everything.
            None => true,
        },
        (Some(suffix), None) => key_upper.ends_with(suffix),
        (None, Some(prefix)) => key_upper.starts_with(prefix),
        (None, None) => key_upper == pat,
    }
}

fn is_secret_env(key: &str) -> bool {
    let upper = key.to_uppercase();
    ENV_SECRET_DENYLIST
        .iter()
        .any(|pat| env_glob_matches(pat, &upper))
}

/// Build the backend command line from the session configuration.
fn build_command(config: &SessionConfig, workspace_root: &Path) -> Result<Command> {
    let options = config.options();
    let args = options.args();

    let mut cmd = if options.shell() {
        let mut line = config.executable_path().to_string();
        for arg in &args {
            line.push(' ');
            line.push_str(arg);
        }
        shell_command(&line)
    } else {
        let resolved = which::which(config.executable_path())
            .with_context(|| format!("{} not found", config.executable_path()))?;
        let mut cmd = Command::new(resolved);
        cmd.args(&args);
        cmd
    };

    for (key, value) in options.iter() {
        if !matches!(key.as_str(), "shell" | "args" | "cwd" | "env") {
            tracing::debug!(option = %key, %value, "Ignoring unknown invocation option");
        }
    }

    let cwd = options.cwd().map_or_else(|| workspace_root.to_path_buf(), PathBuf::from);
    cmd.current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    for (key, _) in env::vars_os() {
        if let Some(key) = key.to_str()
            && is_secret_env(key)
        {
            cmd.env_remove(key);
        }
    }
    for (key, value) in options.env() {
        cmd.env(key, value);
    }

    Ok(cmd)
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

/// Spawns the backend over stdio.
pub struct StdioConnector {
    workspace_root: PathBuf,
}

impl StdioConnector {
    #[must_use]
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }
}

impl Connector for StdioConnector {
    type Transport = StdioTransport;

    async fn open(&mut self, config: &SessionConfig, sink: EventSink) -> Result<StdioTransport> {
        let root_uri = protocol::path_to_file_uri(&self.workspace_root)
            .context("converting workspace root to URI")?;

        let mut child = build_command(config, &self.workspace_root)?
            .spawn()
            .with_context(|| format!("spawning {}", config.executable_path()))?;
        tracing::debug!(
            pid = child.id(),
            generation = sink.generation(),
            "Spawned {}",
            config.executable_path()
        );

        let stdout = child.stdout.take().context("no stdout from child")?;
        let stdin = child.stdin.take().context("no stdin from child")?;
        let stderr_handle = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(target: "bond_lsp::server", "{line}");
                }
            })
        });

        let mut connection = Connection::spawn(stdout, stdin, sink, config.trace());
        connection.initialize(root_uri.as_str()).await?;

        Ok(StdioTransport {
            child,
            connection,
            stderr_handle,
        })
    }
}

/// A backend process and the connection over its pipes.
pub struct StdioTransport {
    child: Child,
    connection: Connection,
    stderr_handle: Option<JoinHandle<()>>,
}

impl Transport for StdioTransport {
    async fn close(mut self) {
        if self.connection.is_closed() {
            tracing::debug!("Language server already closed its output, killing");
            let _ = self.child.kill().await;
        } else {
            self.connection.shutdown().await;

            let exited = tokio::time::timeout(SHUTDOWN_TIMEOUT, self.child.wait()).await;
            if exited.is_err() {
                tracing::debug!("Language server didn't exit in time, killing");
                let _ = self.child.kill().await;
            }
        }
        if let Some(handle) = self.stderr_handle.take() {
            handle.abort();
        }
    }
}

/// JSON-RPC plumbing over one reader/writer pair.
pub(crate) struct Connection {
    writer_tx: mpsc::Sender<WriterCommand>,
    next_id: u64,
    pending: PendingMap,
    /// Set by the reader task, under the `pending` lock, once it stops.
    reader_done: Arc<AtomicBool>,
    trace: TraceLevel,
    reader_handle: JoinHandle<()>,
    writer_handle: JoinHandle<()>,
}

impl Connection {
    pub(crate) fn spawn<R, W>(reader: R, writer: W, sink: EventSink, trace: TraceLevel) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let (writer_tx, mut writer_rx) = mpsc::channel::<WriterCommand>(WRITER_CHANNEL_CAPACITY);
        let writer_sink = sink.clone();
        let writer_handle = tokio::spawn(async move {
            let mut writer = FrameWriter::new(writer);
            while let Some(cmd) = writer_rx.recv().await {
                match cmd {
                    WriterCommand::Send(frame) => {
                        if trace.logs_messages() {
                            log_frame("send", &frame, trace);
                        }
                        if let Err(e) = writer.write_frame(&frame).await {
                            tracing::warn!("Write to language server failed: {e:#}");
                            writer_sink.error(format!("{e:#}")).await;
                            break;
                        }
                    }
                    WriterCommand::Shutdown => break,
                }
            }
        });

        let reader_done = Arc::new(AtomicBool::new(false));
        let reader_finished = Arc::clone(&reader_done);
        let reader_pending = pending.clone();
        let reader_writer_tx = writer_tx.clone();
        let reader_handle = tokio::spawn(async move {
            let mut reader = FrameReader::new(reader);
            loop {
                match reader.read_frame().await {
                    Ok(Some(frame)) => {
                        if trace.logs_messages() {
                            log_frame("recv", &frame, trace);
                        }
                        Self::dispatch_frame(&frame, &reader_pending, &reader_writer_tx).await;
                    }
                    Ok(None) => {
                        tracing::info!(
                            generation = sink.generation(),
                            "Language server closed stdout"
                        );
                        sink.closed().await;
                        break;
                    }
                    Err(e) if e.is_recoverable() => {
                        tracing::warn!("Dropping undecodable frame from language server: {e}");
                        sink.error(e.to_string()).await;
                    }
                    Err(e) => {
                        tracing::warn!("Language server stream broken: {e}");
                        sink.error(e.to_string()).await;
                        sink.closed().await;
                        break;
                    }
                }
            }
            // Fail outstanding requests now rather than at their timeout.
            let mut pending = reader_pending.lock().await;
            reader_finished.store(true, Ordering::Release);
            pending.clear();
        });

        Self {
            writer_tx,
            next_id: 1,
            pending,
            reader_done,
            trace,
            reader_handle,
            writer_handle,
        }
    }

    async fn dispatch_frame(
        frame: &Value,
        pending: &Mutex<HashMap<u64, oneshot::Sender<Value>>>,
        writer_tx: &mpsc::Sender<WriterCommand>,
    ) {
        let Some(incoming) = protocol::parse_incoming(frame) else {
            tracing::trace!("Ignoring malformed JSON-RPC frame");
            return;
        };

        match incoming {
            IncomingFrame::Response { id, body } => {
                let sender = pending.lock().await.remove(&id);
                if let Some(tx) = sender {
                    let _ = tx.send(body);
                }
            }
            IncomingFrame::ServerRequest { id, method } => {
                // The server may block until it gets an answer.
                tracing::debug!(
                    "Language server sent request: {method}, replying method not found"
                );
                let response = protocol::method_not_found(id, &method);
                let _ = writer_tx.send(WriterCommand::Send(response)).await;
            }
            IncomingFrame::Notification { method, params } => {
                Self::handle_notification(&method, params.as_ref());
            }
        }
    }

    fn handle_notification(method: &str, params: Option<&Value>) {
        match method {
            "window/logMessage" | "window/showMessage" => {
                let Some((kind, message)) = params.and_then(protocol::window_message) else {
                    return;
                };
                match kind {
                    MessageType::Error => tracing::error!(target: "bond_lsp::server", "{message}"),
                    MessageType::Warning => tracing::warn!(target: "bond_lsp::server", "{message}"),
                    MessageType::Info => tracing::info!(target: "bond_lsp::server", "{message}"),
                    MessageType::Log => tracing::debug!(target: "bond_lsp::server", "{message}"),
                }
            }
            "$/logTrace" => {
                if let Some(message) = params
                    .and_then(|p| p.get("message"))
                    .and_then(Value::as_str)
                {
                    tracing::trace!(target: "bond_lsp::server", "{message}");
                }
            }
            _ => {
                tracing::trace!("Ignoring notification: {method}");
            }
        }
    }

    /// `initialize`, then `initialized` and `$/setTrace`.
    pub(crate) async fn initialize(&mut self, root_uri: &str) -> Result<()> {
        let params = protocol::initialize_params(root_uri, self.trace);
        let response = self
            .send_request("initialize", Some(params), INIT_TIMEOUT)
            .await
            .context("initialize")?;

        if let Some(message) = protocol::response_error(&response) {
            bail!("initialize failed: {message}");
        }

        self.send_notification("initialized", Some(serde_json::json!({})))
            .await?;
        self.send_notification("$/setTrace", Some(protocol::set_trace_params(self.trace)))
            .await?;

        Ok(())
    }

    async fn send_request(
        &mut self,
        method: &'static str,
        params: Option<Value>,
        timeout: Duration,
    ) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if self.is_closed() {
                bail!("language server connection closed");
            }
            pending.insert(id, tx);
        }

        let request = Request::new(id, method, params);
        let frame = serde_json::to_value(&request).context("serializing request")?;
        if self
            .writer_tx
            .send(WriterCommand::Send(frame))
            .await
            .is_err()
        {
            self.pending.lock().await.remove(&id);
            bail!("writer channel closed");
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => {
                self.pending.lock().await.remove(&id);
                bail!("response channel dropped");
            }
            Err(_) => {
                self.pending.lock().await.remove(&id);
                bail!("request timed out");
            }
        }
    }

    async fn send_notification(&self, method: &'static str, params: Option<Value>) -> Result<()> {
        let notification = Notification::new(method, params);
        let frame = serde_json::to_value(&notification).context("serializing notification")?;
        self.writer_tx
            .send(WriterCommand::Send(frame))
            .await
            .map_err(|_| anyhow!("writer channel closed"))
    }

    /// Whether the server has stopped sending; no response can arrive.
    pub(crate) fn is_closed(&self) -> bool {
        self.reader_done.load(Ordering::Acquire)
    }

    /// Polite shutdown: `shutdown`, then `exit`, then stop writing.
    pub(crate) async fn shutdown(&mut self) {
        match self.send_request("shutdown", None, SHUTDOWN_TIMEOUT).await {
            Ok(response) if protocol::response_error(&response).is_none() => {
                let _ = self.send_notification("exit", None).await;
            }
            Ok(_) => tracing::debug!("Language server rejected shutdown"),
            Err(e) => tracing::debug!("Shutdown request failed: {e:#}"),
        }

        let _ = self.writer_tx.send(WriterCommand::Shutdown).await;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader_handle.abort();
        self.writer_handle.abort();
    }
}

fn log_frame(direction: &str, frame: &Value, trace: TraceLevel) {
    let method = frame.get("method").and_then(Value::as_str).unwrap_or("<response>");
    if trace.logs_bodies() {
        tracing::debug!(direction, method, body = %frame, "rpc");
    } else {
        tracing::debug!(direction, method, "rpc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Stamped, TransportEvent};
    use bond_types::BackendSettings;

    fn test_channels() -> (
        PendingMap,
        mpsc::Sender<WriterCommand>,
        mpsc::Receiver<WriterCommand>,
    ) {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (writer_tx, writer_rx) = mpsc::channel(32);
        (pending, writer_tx, writer_rx)
    }

    fn test_sink(generation: u64) -> (EventSink, mpsc::Receiver<Stamped>) {
        let (tx, rx) = mpsc::channel(32);
        (EventSink::new(generation, tx), rx)
    }

    #[tokio::test]
    async fn test_dispatch_response_routes_to_pending() {
        let (pending, writer_tx, _writer_rx) = test_channels();

        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(1, tx);

        let frame = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "capabilities": {} }
        });

        Connection::dispatch_frame(&frame, &pending, &writer_tx).await;

        let response = rx.await.unwrap();
        assert!(response["result"]["capabilities"].is_object());
        assert!(pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_server_request_sends_method_not_found() {
        let (pending, writer_tx, mut writer_rx) = test_channels();

        let frame = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "workspace/configuration",
            "params": {}
        });

        Connection::dispatch_frame(&frame, &pending, &writer_tx).await;

        match writer_rx.try_recv().unwrap() {
            WriterCommand::Send(response) => {
                assert_eq!(response["id"], 5);
                assert_eq!(response["error"]["code"], -32601);
            }
            WriterCommand::Shutdown => panic!("expected Send, got Shutdown"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_notification_writes_nothing() {
        let (pending, writer_tx, mut writer_rx) = test_channels();

        let frame = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "window/logMessage",
            "params": { "type": 3, "message": "hello" }
        });

        Connection::dispatch_frame(&frame, &pending, &writer_tx).await;
        assert!(writer_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_response_for_unknown_id_ignored() {
        let (pending, writer_tx, mut writer_rx) = test_channels();
        let frame = serde_json::json!({ "jsonrpc": "2.0", "id": 999, "result": {} });
        Connection::dispatch_frame(&frame, &pending, &writer_tx).await;
        assert!(writer_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (server_read, server_write) = tokio::io::split(server_io);
        let (sink, _events) = test_sink(1);

        let mut connection =
            Connection::spawn(client_read, client_write, sink, TraceLevel::Verbose);

        let server = tokio::spawn(async move {
            let mut reader = FrameReader::new(server_read);
            let mut writer = FrameWriter::new(server_write);
            let init = reader.read_frame().await.unwrap().unwrap();
            writer
                .write_frame(&serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": init["id"].clone(),
                    "result": { "capabilities": {} }
                }))
                .await
                .unwrap();
            let initialized = reader.read_frame().await.unwrap().unwrap();
            let set_trace = reader.read_frame().await.unwrap().unwrap();
            (init, initialized, set_trace)
        });

        connection.initialize("file:///work").await.unwrap();

        let (init, initialized, set_trace) = server.await.unwrap();
        assert_eq!(init["method"], "initialize");
        assert_eq!(init["params"]["rootUri"], "file:///work");
        assert_eq!(initialized["method"], "initialized");
        assert_eq!(set_trace["method"], "$/setTrace");
        assert_eq!(set_trace["params"]["value"], "verbose");
    }

    #[tokio::test]
    async fn test_initialize_error_response_fails() {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (server_read, server_write) = tokio::io::split(server_io);
        let (sink, _events) = test_sink(1);

        let mut connection = Connection::spawn(client_read, client_write, sink, TraceLevel::Off);

        let _server = tokio::spawn(async move {
            let mut reader = FrameReader::new(server_read);
            let mut writer = FrameWriter::new(server_write);
            let init = reader.read_frame().await.unwrap().unwrap();
            writer
                .write_frame(&serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": init["id"].clone(),
                    "error": { "code": -32603, "message": "no workspace" }
                }))
                .await
                .unwrap();
            // Keep the pipe open until the client gives up.
            let _ = reader.read_frame().await;
        });

        let err = connection.initialize("file:///work").await.unwrap_err();
        assert!(err.to_string().contains("no workspace"));
    }

    #[tokio::test]
    async fn test_server_eof_reports_closed() {
        let (client_io, server_io) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (sink, mut events) = test_sink(4);

        let _connection = Connection::spawn(client_read, client_write, sink, TraceLevel::Off);
        drop(server_io);

        let stamped = events.recv().await.unwrap();
        assert_eq!(stamped.generation, 4);
        assert_eq!(stamped.event, TransportEvent::Closed);
    }

    #[tokio::test]
    async fn test_undecodable_frame_reports_error_and_keeps_reading() {
        let (client_io, mut server_io) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (sink, mut events) = test_sink(1);

        let _connection = Connection::spawn(client_read, client_write, sink, TraceLevel::Off);

        tokio::io::AsyncWriteExt::write_all(&mut server_io, b"Content-Length: 3\r\n\r\n!!!")
            .await
            .unwrap();
        let first = events.recv().await.unwrap();
        assert!(matches!(first.event, TransportEvent::Error(_)));

        drop(server_io);
        let second = events.recv().await.unwrap();
        assert_eq!(second.event, TransportEvent::Closed);
    }

    #[tokio::test]
    async fn test_broken_stream_reports_error_then_closed() {
        let (client_io, mut server_io) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (sink, mut events) = test_sink(1);

        let _connection = Connection::spawn(client_read, client_write, sink, TraceLevel::Off);

        tokio::io::AsyncWriteExt::write_all(&mut server_io, b"Content-Type: x\r\n\r\n")
            .await
            .unwrap();
        let first = events.recv().await.unwrap();
        assert!(matches!(first.event, TransportEvent::Error(_)));
        let second = events.recv().await.unwrap();
        assert_eq!(second.event, TransportEvent::Closed);
    }

    #[tokio::test]
    async fn test_open_fails_for_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BackendSettings {
            executable_path: Some("bond-ls-definitely-not-installed".to_string()),
            options: serde_json::from_value(serde_json::json!({ "shell": false })).unwrap(),
            ..BackendSettings::default()
        };
        let config = settings.locate().unwrap();
        let (sink, _events) = test_sink(1);

        let mut connector = StdioConnector::new(dir.path().to_path_buf());
        let err = connector.open(&config, sink).await.err().unwrap();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_shutdown_after_eof_returns_promptly() {
        let (client_io, server_io) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (sink, mut events) = test_sink(1);

        let mut connection = Connection::spawn(client_read, client_write, sink, TraceLevel::Off);
        drop(server_io);
        assert_eq!(events.recv().await.unwrap().event, TransportEvent::Closed);

        let started = std::time::Instant::now();
        connection.shutdown().await;
        assert!(
            started.elapsed() < SHUTDOWN_TIMEOUT / 4,
            "shutdown took {:?}",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn test_request_after_eof_fails_fast() {
        let (client_io, server_io) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (sink, mut events) = test_sink(1);

        let mut connection = Connection::spawn(client_read, client_write, sink, TraceLevel::Off);
        drop(server_io);
        events.recv().await.unwrap();
        // The reader flags itself done right after reporting Closed.
        while !connection.is_closed() {
            tokio::task::yield_now().await;
        }

        let err = connection
            .send_request("shutdown", None, SHUTDOWN_TIMEOUT)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn env_glob_suffix_matches() {
        assert!(env_glob_matches("*_KEY", "API_KEY"));
        assert!(env_glob_matches("*_KEY", "MY_SECRET_KEY"));
        assert!(!env_glob_matches("*_KEY", "KEYRING"));
    }

    #[test]
    fn env_glob_prefix_matches() {
        assert!(env_glob_matches("AWS_*", "AWS_ACCESS_KEY_ID"));
        assert!(!env_glob_matches("AWS_*", "MY_AWS"));
    }

    #[test]
    fn env_glob_infix_matches() {
        assert!(env_glob_matches("*_CREDENTIAL*", "DB_CREDENTIAL_FILE"));
        assert!(env_glob_matches("*_CREDENTIAL*", "MY_CREDENTIALS"));
        assert!(!env_glob_matches("*_CREDENTIAL*", "CREDENTIAL"));
    }

    #[test]
    fn secret_env_is_detected_case_insensitively() {
        assert!(is_secret_env("github_token"));
        assert!(is_secret_env("Stripe_Secret_Key"));
        assert!(!is_secret_env("PATH"));
        assert!(!is_secret_env("BOND_HOME"));
    }
}
