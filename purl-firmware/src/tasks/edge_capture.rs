//! Clock edge capture task
//!
//! Runs on the interrupt executor so it preempts the knitting loop. The
//! only work per edge is setting the latch.

use defmt::*;
use purl_hal_rp2040::RpInput;

use crate::channels::EDGE_LATCH;

#[embassy_executor::task]
pub async fn edge_capture_task(mut clock: RpInput) {
    info!("Edge capture task started");

    loop {
        clock.wait_for_active_edge().await;
        EDGE_LATCH.capture();
    }
}
