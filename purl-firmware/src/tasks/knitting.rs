//! Knitting loop task
//!
//! Runs [`Knitter::poll`] continuously in thread mode with a short fixed
//! delay between iterations, and logs what each iteration reports.

use defmt::*;
use embassy_time::{Duration, Instant, Timer};

use purl_core::{
    Board, EdgeOutcome, Knitter, KnitterConfig, PollReport, RangeTransition, SafetyStatus,
};
use purl_hal_rp2040::{HostUart, RpInput, RpOutput};
use purl_protocol::HOST_MAX_ROW_LEN;

use crate::channels::{StatusSnapshot, EDGE_LATCH, ROW, STATUS};

/// Range, direction, solenoid, fault LED, host link
pub type KnitterBoard = Board<RpInput, RpInput, RpOutput, RpOutput, HostUart>;

#[embassy_executor::task]
pub async fn knitting_task(mut board: KnitterBoard, config: KnitterConfig) {
    let mut knitter = Knitter::new(&config, &EDGE_LATCH, &ROW, &mut board);
    info!(
        "Knitting loop started: {:?}, watchdog {} ms",
        knitter.range_state(),
        config.safety_threshold_ms
    );

    let period = Duration::from_micros(config.loop_period_us as u64);

    loop {
        let report = knitter.poll(&mut board, Instant::now().as_millis());
        log_report(&report, &knitter);

        STATUS.signal(StatusSnapshot {
            range: report.range,
            solenoid: knitter.output().level(),
            faulted: knitter.is_faulted(),
            row: knitter.row_status(),
            diagnostics: knitter.diagnostics(),
        });

        Timer::after(period).await;
    }
}

fn log_report(report: &PollReport, knitter: &Knitter<'_>) {
    match report.transition {
        Some(RangeTransition::Entered) => info!(
            "Carriage entered range moving {:?}, row of {} needles",
            report.direction,
            knitter.row_status().row_len
        ),
        Some(RangeTransition::Exited) => info!(
            "Carriage left range after {} needles, row complete",
            knitter.row_status().cursor
        ),
        None => {}
    }

    match report.edge {
        Some(EdgeOutcome::Needle { index, level }) => trace!("Needle {}: {}", index, level),
        Some(EdgeOutcome::Underrun { index }) => warn!("Pattern underrun at needle {}", index),
        Some(EdgeOutcome::Inactive) => trace!("Clock edge outside active row"),
        None => {}
    }

    if report.rows_received > 0 {
        let len = knitter.row_status().row_len;
        debug!("Row replaced: {} needles", len);
        if len > HOST_MAX_ROW_LEN {
            warn!("Row of {} needles exceeds host limit {}", len, HOST_MAX_ROW_LEN);
        }
    }

    if let Some(e) = report.frame_error {
        warn!("Host frame error: {:?}, buffer cleared", e);
    }

    if let Some(e) = report.link_error {
        warn!("Host link error: {:?}", e);
    }

    if let SafetyStatus::Tripped { held_ms } = report.safety {
        error!(
            "Solenoid held on for {} ms, forced off; fault latched",
            held_ms
        );
    }
}
