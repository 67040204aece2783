//! Host link over the buffered UART
//!
//! The interrupt-driven ring buffers let the knitting loop poll for bytes
//! without ever waiting on the wire.

use embassy_rp::uart::{BufferedUartRx, BufferedUartTx, Error as UartError};
use embedded_io::{Read, ReadReady, Write};
use purl_hal::{HostRx, HostTx, LinkError};

/// Host link on UART0
pub struct HostUart {
    rx: BufferedUartRx,
    tx: BufferedUartTx,
}

impl HostUart {
    pub fn new(rx: BufferedUartRx, tx: BufferedUartTx) -> Self {
        Self { rx, tx }
    }
}

fn map_error(e: UartError) -> LinkError {
    match e {
        UartError::Overrun => LinkError::Overrun,
        _ => LinkError::Framing,
    }
}

impl HostRx for HostUart {
    fn try_read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        if !ReadReady::read_ready(&mut self.rx).map_err(map_error)? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        // Data is buffered, so this returns without blocking
        match Read::read(&mut self.rx, &mut byte).map_err(map_error)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

impl HostTx for HostUart {
    fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError> {
        Write::write_all(&mut self.tx, data).map_err(|_| LinkError::TxFull)
    }
}
