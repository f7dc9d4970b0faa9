//! Event-stream transport over TCP.
//!
//! The consultation server exposes its event stream on a plain TCP port.
//! Every frame in both directions is a JSON document preceded by a
//! `Content-Length` header:
//!
//! ```text
//! Content-Length: 27\r\n
//! \r\n
//! {"session_id":"a1b2c3d4e5"}
//! ```
//!
//! The first outbound frame subscribes to a session's events; everything
//! after that is the normal payload traffic.

pub mod framing;
mod tcp;

pub use tcp::{TcpEventConnection, TcpEventTransport};
