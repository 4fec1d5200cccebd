//! One controller session: frame the byte stream and dispatch in order

use crate::command::{DispatchError, Dispatcher};
use crate::transport::TransportStream;
use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, trace, warn};
use zwave_protocol::serial::{self, ApplicationCommand, DataFrame, FrameError, SerialFrame, SerialFrameDecoder};
use zwave_protocol::DecodeContext;

/// Reads Serial API frames from one stream and feeds them to the dispatcher
///
/// Frames are dispatched one at a time in arrival order, so updates from one
/// session reach the capability model in the order the transport delivered them.
pub struct Session<S> {
    id: u64,
    stream: S,
    decoder: SerialFrameDecoder,
    read_buf: Vec<u8>,
}

impl<S: TransportStream> Session<S> {
    pub fn new(id: u64, stream: S, read_buffer_size: usize) -> Self {
        Self {
            id,
            stream,
            decoder: SerialFrameDecoder::new(),
            read_buf: vec![0u8; read_buffer_size],
        }
    }

    /// Run until the stream closes or fails, then shut the transport down
    pub async fn run(mut self, dispatcher: &Dispatcher) -> Result<()> {
        let result = self.pump(dispatcher).await;
        if let Err(e) = TransportStream::shutdown(&mut self.stream).await {
            debug!("Session {}: shutdown failed: {:#}", self.id, e);
        }
        result
    }

    async fn pump(&mut self, dispatcher: &Dispatcher) -> Result<()> {
        loop {
            let n = self.stream.read(&mut self.read_buf).await?;
            if n == 0 {
                info!("Session {}: transport closed", self.id);
                return Ok(());
            }
            self.decoder.extend(&self.read_buf[..n]);

            // Process all complete frames
            loop {
                match self.decoder.decode_next() {
                    Ok(None) => break,
                    Ok(Some(SerialFrame::Data(frame))) => {
                        self.stream.write_all(&[serial::ACK]).await?;
                        self.handle_frame(&frame, dispatcher).await;
                    }
                    Ok(Some(control)) => {
                        trace!("Session {}: controller sent {:?}", self.id, control);
                    }
                    // The controller retransmits on NAK instead of waiting out its ACK timeout
                    Err(e @ (FrameError::Checksum { .. } | FrameError::InvalidLength(_))) => {
                        warn!("Session {}: {}", self.id, e);
                        self.stream.write_all(&[serial::NAK]).await?;
                    }
                    Err(e) => {
                        warn!("Session {}: {}", self.id, e);
                    }
                }
            }
        }
    }

    async fn handle_frame(&self, frame: &DataFrame, dispatcher: &Dispatcher) {
        let command = match ApplicationCommand::parse(frame) {
            Ok(command) => command,
            Err(FrameError::NotApplicationCommand {
                frame_type,
                function_id,
            }) => {
                debug!(
                    "Session {}: ignoring frame type={:#04x} func={:#04x}",
                    self.id, frame_type, function_id
                );
                return;
            }
            Err(e) => {
                warn!("Session {}: bad application command: {}", self.id, e);
                return;
            }
        };

        let identity = command.identity();
        let ctx = DecodeContext::new(command.source_node(), self.id);
        match dispatcher
            .dispatch(
                identity.command_class(),
                identity.command(),
                command.payload(),
                &ctx,
            )
            .await
        {
            Ok(()) | Err(DispatchError::UnknownCommand { .. }) => {}
            Err(e) => debug!("Session {}: frame dropped: {}", self.id, e),
        }
    }
}
