use std::time::Duration;

use crate::message::{OutboundMessage, PayloadError};

/// How the encrypted channel to the broker is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// MQTT directly over TLS.
    Tls,
    /// MQTT over a websocket upgraded TLS connection, served at `path`.
    WebSocketTls { path: String },
}

/// Fixed broker address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
    pub transport: Transport,
}

impl BrokerEndpoint {
    /// URI in the form understood by the ESP-IDF MQTT client.
    pub fn uri(&self) -> String {
        match &self.transport {
            Transport::Tls => format!("mqtts://{}:{}", self.host, self.port),
            Transport::WebSocketTls { path } => {
                let path = path.trim_start_matches('/');
                format!("wss://{}:{}/{}", self.host, self.port, path)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    V3_1,
    V3_1_1,
}

impl ProtocolVersion {
    /// Protocol level byte sent in CONNECT.
    pub fn level(&self) -> u8 {
        match self {
            ProtocolVersion::V3_1 => 3,
            ProtocolVersion::V3_1_1 => 4,
        }
    }
}

/// Parameters of the MQTT CONNECT request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub protocol: ProtocolVersion,
    pub keep_alive: Duration,
    pub clean_session: bool,
    /// Network timeout for a single protocol exchange.
    pub command_timeout: Duration,
    /// Upper bound for transport setup plus CONNACK.
    pub connect_timeout: Duration,
}

/// Fixed send/receive buffer sizes of the session, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSizes {
    pub send: usize,
    pub receive: usize,
}

impl BufferSizes {
    pub const fn symmetric(size: usize) -> Self {
        Self {
            send: size,
            receive: size,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("channel open failed: {0}")]
    ChannelOpen(String),

    #[error("MQTT connect failed: {0}")]
    Handshake(String),

    #[error("MQTT publish failed: {0}")]
    Publish(String),

    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),
}

impl SessionError {
    /// Failure of a client that opens the transport and sends CONNECT in one
    /// step. Reported at the handshake stage; the text says the transport may
    /// be at fault.
    pub fn transport_or_connect(detail: impl std::fmt::Display) -> Self {
        SessionError::Handshake(format!("transport/CONNECT failed: {}", detail))
    }
}

/// Secure channel plus MQTT client, driven once per cycle.
///
/// `disconnect` and `close_channel` must be safe to call on a session that was
/// never opened or only partially opened.
pub trait BrokerSession {
    /// Resolves the broker and prepares the secure transport.
    ///
    /// # Errors
    ///
    /// `ChannelOpen` when the host cannot be resolved or reached.
    fn open_channel(
        &mut self,
        endpoint: &BrokerEndpoint,
        buffers: BufferSizes,
    ) -> Result<(), SessionError>;

    /// Sends CONNECT and waits for the broker's acknowledgement.
    ///
    /// # Errors
    ///
    /// `Handshake` on rejection, timeout, or a channel that was never opened.
    fn handshake(&mut self, options: &ConnectOptions) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// `Publish` when not connected or the client refuses the message.
    fn publish(&mut self, message: &OutboundMessage<'_>) -> Result<(), SessionError>;

    fn disconnect(&mut self);

    fn close_channel(&mut self);
}
