//! Transport seam between a chat session and the network.

use std::future::Future;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Opens bidirectional byte streams to the chat server.
///
/// The session only needs `AsyncRead + AsyncWrite`, so tests can hand it
/// in-memory duplex pipes instead of sockets.
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    fn connect(&self, host: &str, port: u16)
    -> impl Future<Output = std::io::Result<Self::Stream>> + Send;
}

/// Plain TCP connector used by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> std::io::Result<TcpStream> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_connector_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            line
        });

        let mut stream = TcpConnector.connect("127.0.0.1", port).await.unwrap();
        stream.write_all(b"NICK mybot\r\n").await.unwrap();

        assert_eq!(server.await.unwrap(), "NICK mybot\r\n");
    }

    #[tokio::test]
    async fn test_tcp_connector_refused() {
        // Bind then drop to get a port nobody is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(TcpConnector.connect("127.0.0.1", port).await.is_err());
    }
}
