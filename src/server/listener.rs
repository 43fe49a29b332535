use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::serve::resolve::DocRoot;
use crate::serve::{RequestHook, ServeState};
use crate::server::shutdown::Shutdown;

/// Pending connections queued on the listening socket.
const BACKLOG: u32 = 5;

/// Accepts connections and dispatches each to its own session task.
///
/// Sessions are fully independent; the only state they share is the
/// read-only [`ServeState`] and, when a cap is configured, the admission
/// semaphore.
pub struct Server {
    listener: TcpListener,
    state: ServeState,
    gate: Option<Arc<Semaphore>>,
    daemon_workers: bool,
    shutdown: Shutdown,
}

impl Server {
    /// Binds the configured address with address reuse and a fixed backlog,
    /// trying each resolved candidate address in turn. Failure to bind any
    /// of them is fatal to startup.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let mut last_err = None;
        let mut bound = None;

        let candidates = tokio::net::lookup_host(cfg.listen_addr.as_str())
            .await
            .with_context(|| format!("cannot resolve listen address: {}", cfg.listen_addr))?;
        for addr in candidates {
            match try_bind(addr) {
                Ok(listener) => {
                    bound = Some(listener);
                    break;
                }
                Err(e) => last_err = Some(e),
            }
        }
        let listener = match bound {
            Some(listener) => listener,
            None => {
                let err = last_err
                    .map(anyhow::Error::from)
                    .unwrap_or_else(|| anyhow::anyhow!("no usable address"));
                return Err(err.context(format!("could not bind {}", cfg.listen_addr)));
            }
        };

        let docroot = DocRoot::new(&cfg.docroot, cfg.pages.clone())?;
        let state = ServeState::new(docroot, cfg.recv_timeout());

        info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            state,
            gate: cfg.max_connections.map(|n| Arc::new(Semaphore::new(n))),
            daemon_workers: cfg.daemon_workers,
            shutdown: Shutdown::new(),
        })
    }

    /// Installs a hook invoked with each parsed request before file serving.
    pub fn register_handler(&mut self, hook: RequestHook) {
        self.state.on_request = Some(hook);
    }

    /// Handle for triggering shutdown from another task.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Blocking accept loop. Each accepted connection runs as an
    /// independent task; accepting continues immediately, never waiting on
    /// handler completion.
    ///
    /// On shutdown the listening socket is closed and, unless workers are
    /// daemons, tracked sessions are joined before returning. Daemon
    /// workers are abandoned.
    pub async fn serve_forever(self) -> anyhow::Result<()> {
        let Server {
            listener,
            state,
            gate,
            daemon_workers,
            shutdown,
        } = self;
        let state = Arc::new(state);
        let mut shutdown_rx = shutdown.subscribe();
        let mut workers = JoinSet::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (socket, peer) = accepted.context("accept failed")?;
                    info!("Accepted connection from {}", peer);

                    let state = state.clone();
                    let gate = gate.clone();
                    let session = async move {
                        // With a cap configured, sessions queue here rather
                        // than on the TCP backlog.
                        let _permit = match gate {
                            Some(gate) => Some(
                                gate.acquire_owned()
                                    .await
                                    .expect("Semaphore closed unexpectedly"),
                            ),
                            None => None,
                        };

                        let mut conn = Connection::new(socket, state);
                        if let Err(e) = conn.run().await {
                            tracing::error!("Connection error from {}: {}", peer, e);
                        }
                    };

                    if daemon_workers {
                        tokio::spawn(session);
                    } else {
                        workers.spawn(session);
                    }

                    // Completed workers leave the registry as we go.
                    while workers.try_join_next().is_some() {}
                }

                _ = shutdown_rx.recv() => {
                    info!("Shutting down, closing listener");
                    break;
                }
            }
        }

        // Stop accepting before draining.
        drop(listener);

        if !workers.is_empty() {
            info!("Draining {} active session(s)", workers.len());
        }
        while workers.join_next().await.is_some() {}

        Ok(())
    }
}

fn try_bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(BACKLOG)
}
