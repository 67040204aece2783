//! Periodic status report over defmt

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::STATUS;

#[embassy_executor::task]
pub async fn status_task(interval_ms: u32) {
    info!("Status task started ({} ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));

    loop {
        ticker.next().await;

        let Some(status) = STATUS.try_take() else {
            warn!("Status: knitting loop has not reported");
            continue;
        };
        let diag = status.diagnostics;

        info!(
            "Status: {:?} solenoid={} fault={} needle {}/{} active={}",
            status.range,
            status.solenoid,
            status.faulted,
            status.row.cursor,
            status.row.row_len,
            status.row.active
        );
        info!(
            "  edges={} needles={} underruns={} rows in/out={}/{} parse_errors={} skipped={} trips={} link rx/tx errors={}/{}",
            diag.edges_consumed,
            diag.needles_driven,
            diag.underruns,
            diag.rows_received,
            diag.rows_completed,
            diag.parse_errors,
            diag.skipped_bytes,
            diag.safety_trips,
            diag.host_read_errors,
            diag.host_write_errors
        );
    }
}
