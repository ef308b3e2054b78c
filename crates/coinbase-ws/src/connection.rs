//! WebSocket connection management
//!
//! One connection drives one product's book: it subscribes to the level2
//! channel, applies every snapshot and delta to the shared [`OrderBook`],
//! and publishes events. The book sits behind a coarse `RwLock`: the
//! message loop is the single writer, and readers (display tasks, the
//! accessors below) can never observe a half-applied batch.

use crate::endpoint::Endpoint;
use crate::events::{ConnectionEvent, DisconnectReason, Event, MarketEvent};
use crate::reconnect::ReconnectConfig;

use coinbase_book::{ApplyResult, BookView, DepthView, OrderBook};
use coinbase_types::{FeedError, FeedMessage, FeedResult, Level, ProductId, SubscribeRequest};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// WebSocket connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,
    /// Connection in progress
    Connecting,
    /// Connected and subscribed
    Connected,
    /// Reconnecting after disconnect
    Reconnecting,
    /// Shutting down
    ShuttingDown,
}

/// Configuration for the feed connection
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Product to track
    pub product: ProductId,
    /// WebSocket endpoint
    pub endpoint: Endpoint,
    /// Reconnection settings
    pub reconnect: ReconnectConfig,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl FeedConfig {
    /// Create a config for a product with default settings
    pub fn new(product: ProductId) -> Self {
        Self {
            product,
            endpoint: Endpoint::Production,
            reconnect: ReconnectConfig::default(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set reconnection config
    pub fn with_reconnect(mut self, config: ReconnectConfig) -> Self {
        self.reconnect = config;
        self
    }

    /// Disable automatic reconnection
    pub fn without_reconnect(mut self) -> Self {
        self.reconnect = ReconnectConfig::disabled();
        self
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// WebSocket connection to the Coinbase Exchange feed
pub struct FeedConnection {
    /// Configuration
    config: FeedConfig,
    /// Connection state
    state: Arc<RwLock<ConnectionState>>,
    /// The book, written only by the message loop
    book: Arc<RwLock<OrderBook>>,
    /// Reconnection attempt counter
    reconnect_attempt: AtomicU32,
    /// Shutdown flag
    shutdown: AtomicBool,
    /// Event sender
    event_tx: mpsc::UnboundedSender<Event>,
    /// Event receiver (for the consumer)
    event_rx: Arc<RwLock<Option<mpsc::UnboundedReceiver<Event>>>>,
}

impl FeedConnection {
    /// Create a new connection with the given configuration
    pub fn new(config: FeedConfig) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let book = OrderBook::new(config.product.clone());

        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            book: Arc::new(RwLock::new(book)),
            reconnect_attempt: AtomicU32::new(0),
            shutdown: AtomicBool::new(false),
            event_tx,
            event_rx: Arc::new(RwLock::new(Some(event_rx))),
        }
    }

    /// Get the current connection state
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Get the tracked product
    pub fn product(&self) -> &ProductId {
        &self.config.product
    }

    /// Take the event receiver (can only be called once)
    pub fn take_event_receiver(&self) -> Option<mpsc::UnboundedReceiver<Event>> {
        self.event_rx.write().take()
    }

    /// Best-N levels per side from the current book
    pub fn top_levels(&self, depth: usize) -> DepthView {
        self.book.read().top_levels(depth)
    }

    /// Full book state
    pub fn book_view(&self) -> BookView {
        self.book.read().view()
    }

    /// Check if the book has received its snapshot
    pub fn is_book_live(&self) -> bool {
        self.book.read().is_live()
    }

    /// Best bid of the current book
    pub fn best_bid(&self) -> Option<Level> {
        self.book.read().best_bid()
    }

    /// Best ask of the current book
    pub fn best_ask(&self) -> Option<Level> {
        self.book.read().best_ask()
    }

    /// Spread of the current book
    pub fn spread(&self) -> Option<Decimal> {
        self.book.read().spread()
    }

    /// Connect and run the session loop until shutdown or a fatal error
    ///
    /// Transport failures are retried per the reconnect config. A feed-level
    /// error message is stream-fatal and returned immediately so the host
    /// can decide whether to restart the session (spec: StreamError).
    pub async fn connect_and_run(&self) -> FeedResult<()> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            {
                let mut state = self.state.write();
                if *state != ConnectionState::Reconnecting {
                    *state = ConnectionState::Connecting;
                }
            }

            match self.run_session().await {
                Ok(()) => break, // clean shutdown
                Err(e) => {
                    if !e.is_retryable() {
                        *self.state.write() = ConnectionState::Disconnected;
                        return Err(e);
                    }

                    let attempt = self.reconnect_attempt.fetch_add(1, Ordering::Relaxed) + 1;
                    if !self.config.reconnect.should_retry(attempt) {
                        error!("Reconnection attempts exhausted after {} tries", attempt);
                        self.emit(ConnectionEvent::ReconnectFailed {
                            error: e.to_string(),
                        });
                        *self.state.write() = ConnectionState::Disconnected;
                        return Err(e);
                    }

                    let delay = self.config.reconnect.backoff_delay(attempt);
                    warn!(
                        "Connection failed, reconnecting in {:?} (attempt {}): {}",
                        delay, attempt, e
                    );
                    self.emit(ConnectionEvent::Reconnecting { attempt, delay });
                    *self.state.write() = ConnectionState::Reconnecting;

                    tokio::time::sleep(delay).await;
                }
            }
        }

        *self.state.write() = ConnectionState::Disconnected;
        Ok(())
    }

    /// Run one connect-subscribe-read session
    async fn run_session(&self) -> FeedResult<()> {
        let url = self.config.endpoint.url();
        info!("Connecting to {}", url);

        let connect_result = timeout(self.config.connect_timeout, connect_async(url)).await;
        let (ws_stream, _response) = match connect_result {
            Ok(Ok(ok)) => ok,
            Ok(Err(e)) => {
                return Err(FeedError::ConnectionFailed {
                    url: url.to_string(),
                    source: std::io::Error::other(e.to_string()),
                });
            }
            Err(_) => {
                return Err(FeedError::ConnectionTimeout {
                    url: url.to_string(),
                    timeout: self.config.connect_timeout,
                });
            }
        };

        let (mut write, mut read) = ws_stream.split();

        // Any prior book state is stale now; the feed opens every session
        // with a fresh snapshot, and deltas are ignored until it arrives.
        self.book.write().reset();

        let request = SubscribeRequest::level2(&self.config.product);
        let json = serde_json::to_string(&request).map_err(|e| FeedError::InvalidJson {
            message: e.to_string(),
            raw: None,
        })?;
        debug!("Sending subscription: {}", json);
        write
            .send(Message::Text(json))
            .await
            .map_err(|e| FeedError::WebSocket(e.to_string()))?;
        info!("L2 subscription request sent for {}", self.config.product);

        *self.state.write() = ConnectionState::Connected;
        self.reconnect_attempt.store(0, Ordering::Relaxed);
        self.emit(ConnectionEvent::Connected {
            endpoint: url.to_string(),
        });

        while let Some(msg_result) = read.next().await {
            if self.shutdown.load(Ordering::Relaxed) {
                info!("Shutdown requested, closing connection");
                let _ = write.send(Message::Close(None)).await;
                self.emit(ConnectionEvent::Disconnected {
                    reason: DisconnectReason::Shutdown,
                });
                return Ok(());
            }

            match msg_result {
                Ok(Message::Text(text)) => {
                    self.handle_message(&text)?;
                }
                Ok(Message::Ping(data)) => {
                    let _ = write.send(Message::Pong(data)).await;
                }
                Ok(Message::Close(_)) => {
                    info!("Server closed connection");
                    self.emit(ConnectionEvent::Disconnected {
                        reason: DisconnectReason::ServerClosed,
                    });
                    return Err(FeedError::WebSocket("Server closed connection".into()));
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    self.emit(ConnectionEvent::Disconnected {
                        reason: DisconnectReason::NetworkError(e.to_string()),
                    });
                    return Err(FeedError::WebSocket(e.to_string()));
                }
                _ => {}
            }
        }

        Err(FeedError::WebSocket("Message stream ended".into()))
    }

    /// Handle one incoming text frame
    ///
    /// Only a feed-level error message produces an `Err`; everything else,
    /// including unparseable frames, is diagnosed and skipped.
    fn handle_message(&self, text: &str) -> FeedResult<()> {
        let msg = match FeedMessage::parse(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Failed to parse message: {} - {}", e, text);
                return Ok(());
            }
        };

        match msg {
            FeedMessage::Snapshot(data) => {
                if data.product_id != self.config.product {
                    debug!(product = %data.product_id, "snapshot for unexpected product");
                    return Ok(());
                }
                info!(product = %data.product_id, "bootstrapping book from snapshot");

                let view = {
                    let mut book = self.book.write();
                    book.apply_snapshot(&data);
                    book.view()
                };
                self.emit(MarketEvent::BookSnapshot {
                    product_id: data.product_id,
                    view,
                });
            }
            FeedMessage::L2Update(data) => {
                if data.product_id != self.config.product {
                    debug!(product = %data.product_id, "update for unexpected product");
                    return Ok(());
                }

                let (result, view) = {
                    let mut book = self.book.write();
                    (book.apply_update(&data), book.view())
                };
                match result {
                    ApplyResult::Ignored => {
                        debug!("delta received before snapshot, ignored");
                    }
                    _ => {
                        self.emit(MarketEvent::BookUpdate {
                            product_id: data.product_id,
                            view,
                        });
                    }
                }
            }
            FeedMessage::Error { message } => {
                error!("Feed error message received: {}", message);
                return Err(FeedError::StreamError { message });
            }
            FeedMessage::Subscriptions => {
                info!("Subscription confirmed");
            }
            FeedMessage::Heartbeat => {
                self.emit(MarketEvent::Heartbeat);
            }
            FeedMessage::Ticker => {
                debug!("Ticker update received");
            }
            FeedMessage::Unknown(_) => {
                debug!("Unknown message: {}", text);
            }
        }

        Ok(())
    }

    /// Emit an event
    fn emit(&self, event: impl Into<Event>) {
        let _ = self.event_tx.send(event.into());
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        *self.state.write() = ConnectionState::ShuttingDown;
    }
}
