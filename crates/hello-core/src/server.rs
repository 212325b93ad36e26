//! Native HTTP server
//!
//! hyper HTTP/1.1 on a multi-threaded tokio runtime:
//! - One task per connection
//! - Exact-path dispatch to pre-built responses
//! - SO_REUSEPORT / TCP_NODELAY tuned listener
//! - Graceful drain of open connections on shutdown

use crate::clock::HttpClock;
use crate::response::{HttpResponse, Responder};
use crate::{Error, Result, ServerConfig};
use hello_router::Outcome;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use socket2::{Domain, Protocol, Socket, Type};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::time::Instant;

/// State shared by every connection
///
/// Read-only after construction except for the clock, which has its own
/// single writer.
#[derive(Debug)]
pub struct ServerState {
    pub responder: Responder,
    pub clock: Arc<HttpClock>,
}

impl ServerState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            responder: Responder::new(&config.server_name)?,
            clock: Arc::new(HttpClock::new()?),
        })
    }
}

/// Route and answer a single request
///
/// Method, headers and body are ignored.
#[inline]
pub fn handle_request<B>(state: &ServerState, req: &hyper::Request<B>) -> HttpResponse {
    let outcome = Outcome::classify(req.uri().path());
    state.responder.respond(outcome, state.clock.current())
}

/// Create a TCP listening socket with optimizations
pub fn create_optimized_socket(addr: &SocketAddr, config: &ServerConfig) -> std::io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // SO_REUSEPORT - enable kernel load balancing across processes
    #[cfg(unix)]
    if config.reuse_port {
        socket.set_reuse_port(true)?;
    }

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    if config.tcp_nodelay {
        socket.set_nodelay(true)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&(*addr).into())?;
    socket.listen(config.backlog)?;

    Ok(socket)
}

/// A bound, not yet serving, HTTP server
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    listener: TcpListener,
    state: Arc<ServerState>,
    open: Arc<OpenConnections>,
}

impl Server {
    /// Bind the listener described by `config`
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(config: ServerConfig) -> Result<Self> {
        let addr = config.socket_addr()?;
        let state = Arc::new(ServerState::new(&config)?);

        let socket =
            create_optimized_socket(&addr, &config).map_err(|source| Error::Bind { addr, source })?;
        let listener = TcpListener::from_std(socket.into())?;

        Ok(Self {
            config,
            listener,
            state,
            open: Arc::new(OpenConnections::default()),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve connections until `shutdown` resolves, then drain
    ///
    /// Returns `true` if every open connection finished within
    /// `shutdown_timeout`. Fails only if the date updater cannot start.
    pub async fn run_until<F>(self, shutdown: F) -> Result<bool>
    where
        F: Future<Output = ()>,
    {
        let Server {
            config,
            listener,
            state,
            open,
        } = self;

        let updater = state.clock.spawn_updater(config.clock_interval)?;
        let (closing_tx, closing_rx) = watch::channel(false);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!("accept failed: {}", e);
                            tokio::time::sleep(Duration::from_millis(10)).await;
                            continue;
                        }
                    };
                    if config.tcp_nodelay {
                        if let Err(e) = stream.set_nodelay(true) {
                            tracing::debug!(%peer, "set_nodelay failed: {}", e);
                        }
                    }
                    let guard = ConnectionGuard::new(Arc::clone(&open));
                    tokio::spawn(serve_connection(
                        stream,
                        peer,
                        Arc::clone(&state),
                        config.keep_alive,
                        closing_rx.clone(),
                        guard,
                    ));
                }
            }
        }

        // Stop accepting, ask open connections to finish their current request
        drop(listener);
        let _ = closing_tx.send(true);

        let drained = wait_for_drain(&open, config.shutdown_timeout).await;
        if drained {
            tracing::info!("all connections closed");
        } else {
            tracing::warn!(
                open = open.count(),
                "shutdown timeout reached with connections still open"
            );
        }
        updater.stop();
        Ok(drained)
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<ServerState>,
    keep_alive: bool,
    mut closing: watch::Receiver<bool>,
    _guard: ConnectionGuard,
) {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req| {
        let res = handle_request(&state, &req);
        async move { Ok::<_, Infallible>(res) }
    });

    let conn = http1::Builder::new()
        .timer(TokioTimer::new())
        .keep_alive(keep_alive)
        .serve_connection(io, service);
    tokio::pin!(conn);

    let result = tokio::select! {
        res = conn.as_mut() => res,
        _ = closing.changed() => {
            conn.as_mut().graceful_shutdown();
            conn.as_mut().await
        }
    };

    if let Err(e) = result {
        // Clients closing mid-request are routine under load
        if !e.is_incomplete_message() {
            tracing::debug!(%peer, "connection error: {}", e);
        }
    }
}

async fn wait_for_drain(open: &OpenConnections, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while open.count() > 0 {
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    true
}

/// Number of connections still being served
#[derive(Debug, Default)]
struct OpenConnections(AtomicUsize);

impl OpenConnections {
    #[inline]
    fn count(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }
}

/// Counts one connection for as long as it lives
#[derive(Debug)]
struct ConnectionGuard {
    open: Arc<OpenConnections>,
}

impl ConnectionGuard {
    fn new(open: Arc<OpenConnections>) -> Self {
        open.0.fetch_add(1, Ordering::AcqRel);
        Self { open }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.open.0.fetch_sub(1, Ordering::AcqRel);
    }
}
