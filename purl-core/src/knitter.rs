//! The knitting loop context
//!
//! [`Knitter`] owns the loop state: range tracking, the solenoid output,
//! the watchdog and the host frame parser. It borrows the [`EdgeLatch`],
//! which the clock interrupt writes to, and the [`SharedRow`] guarded by
//! the same critical sections. One call to [`Knitter::poll`] is one loop iteration:
//!
//! 1. Poll the range line and apply a transition
//! 2. Consume at most one captured clock edge
//! 3. Service the host link, only while out of range
//! 4. Check the solenoid watchdog

use purl_hal::{HostLink, InputPin, LinkError, OutputPin};
use purl_protocol::{Command, DeviceMessage, FrameError, FrameParser};

use crate::config::KnitterConfig;
use crate::diagnostics::{bump, Diagnostics};
use crate::edge::EdgeLatch;
use crate::safety::{OutputState, SafetyStatus, SolenoidWatchdog};
use crate::sequencer::{EdgeOutcome, Row, RowStatus, SharedRow};
use crate::state::{CarriageDirection, RangeState, RangeTracker, RangeTransition};

/// Hardware the loop touches
///
/// The clock line is absent: it is only seen through the [`EdgeLatch`].
pub struct Board<RANGE, DIR, SOL, LED, LINK> {
    pub range: RANGE,
    pub direction: DIR,
    pub solenoid: SOL,
    pub fault_led: LED,
    pub link: LINK,
}

/// What happened during one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Range state after this iteration
    pub range: RangeState,
    /// Range transition observed, if any
    pub transition: Option<RangeTransition>,
    /// Sequencer decision for a consumed edge, if any
    pub edge: Option<EdgeOutcome>,
    /// Rows replaced from the host
    pub rows_received: u8,
    /// Last frame error; the parser has already cleared its buffer
    pub frame_error: Option<FrameError>,
    /// Last host link error
    pub link_error: Option<LinkError>,
    /// Watchdog result
    pub safety: SafetyStatus,
    /// Carriage direction line, sampled this iteration
    pub direction: CarriageDirection,
}

impl PollReport {
    fn new(range: RangeState, direction: CarriageDirection) -> Self {
        Self {
            range,
            transition: None,
            edge: None,
            rows_received: 0,
            frame_error: None,
            link_error: None,
            safety: SafetyStatus::Ok,
            direction,
        }
    }

    /// True if nothing noteworthy happened
    pub fn is_quiet(&self) -> bool {
        self.transition.is_none()
            && self.edge.is_none()
            && self.rows_received == 0
            && self.frame_error.is_none()
            && self.link_error.is_none()
            && self.safety == SafetyStatus::Ok
    }
}

/// Needle selection context
pub struct Knitter<'a> {
    latch: &'a EdgeLatch,
    rows: &'a SharedRow,
    range: RangeTracker,
    output: OutputState,
    watchdog: SolenoidWatchdog,
    parser: FrameParser,
    diagnostics: Diagnostics,
}

impl<'a> Knitter<'a> {
    /// Bring up the loop state
    ///
    /// Forces the solenoid and fault LED off and seeds range tracking with
    /// the current level of the range line.
    pub fn new<RANGE, DIR, SOL, LED, LINK>(
        config: &KnitterConfig,
        latch: &'a EdgeLatch,
        rows: &'a SharedRow,
        board: &mut Board<RANGE, DIR, SOL, LED, LINK>,
    ) -> Self
    where
        RANGE: InputPin,
        SOL: OutputPin,
        LED: OutputPin,
    {
        board.solenoid.set_low();
        board.fault_led.set_low();

        Self {
            latch,
            rows,
            range: RangeTracker::new(board.range.is_high()),
            output: OutputState::new(),
            watchdog: SolenoidWatchdog::new(config.safety_threshold_ms),
            parser: FrameParser::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Run one loop iteration at time `now_ms`
    pub fn poll<RANGE, DIR, SOL, LED, LINK>(
        &mut self,
        board: &mut Board<RANGE, DIR, SOL, LED, LINK>,
        now_ms: u64,
    ) -> PollReport
    where
        RANGE: InputPin,
        DIR: InputPin,
        SOL: OutputPin,
        LED: OutputPin,
        LINK: HostLink,
    {
        let level = board.range.is_high();
        let direction = CarriageDirection::from_level(board.direction.is_high());
        let mut report = PollReport::new(RangeState::from_level(level), direction);

        report.transition = self.range.poll_range(level);
        match report.transition {
            Some(RangeTransition::Entered) => self.rows.begin_row(),
            Some(RangeTransition::Exited) => {
                self.rows.end_row();
                bump(&mut self.diagnostics.rows_completed);
                self.notify_row_complete(&mut board.link, &mut report);
            }
            None => {}
        }

        report.edge = self.service_edge(&mut board.solenoid, now_ms);

        if !report.range.is_in_range() {
            self.service_host(&mut board.link, &mut report);
        }

        report.safety = self.watchdog.check_safety(&mut self.output, now_ms);
        if let SafetyStatus::Tripped { .. } = report.safety {
            board.solenoid.set_low();
            board.fault_led.set_high();
        }

        report
    }

    /// Clear a latched watchdog fault and turn the indicator off
    pub fn clear_fault<LED: OutputPin>(&mut self, fault_led: &mut LED) {
        self.watchdog.clear_fault();
        fault_led.set_low();
    }

    pub fn is_faulted(&self) -> bool {
        self.watchdog.is_faulted()
    }

    pub fn range_state(&self) -> RangeState {
        self.range.state()
    }

    pub fn output(&self) -> OutputState {
        self.output
    }

    pub fn row_status(&self) -> RowStatus {
        self.rows.status()
    }

    /// Copy of the current row
    pub fn row(&self) -> Row {
        self.rows.row()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            skipped_bytes: self.parser.skipped_bytes(),
            safety_trips: self.watchdog.trips(),
            ..self.diagnostics
        }
    }

    /// Act on a captured clock edge, if one is pending
    fn service_edge<SOL: OutputPin>(
        &mut self,
        solenoid: &mut SOL,
        now_ms: u64,
    ) -> Option<EdgeOutcome> {
        let snapshot = self.rows.take_edge(self.latch)?;
        let outcome = EdgeOutcome::from_snapshot(&snapshot);
        bump(&mut self.diagnostics.edges_consumed);

        // Outside a row the pin is only touched to switch it off
        if outcome != EdgeOutcome::Inactive || self.output.level() {
            self.drive(solenoid, outcome.level(), now_ms);
        }
        if outcome.advances() {
            self.rows.advance();
            bump(&mut self.diagnostics.needles_driven);
        }
        if let EdgeOutcome::Underrun { .. } = outcome {
            bump(&mut self.diagnostics.underruns);
        }
        Some(outcome)
    }

    fn drive<SOL: OutputPin>(&mut self, solenoid: &mut SOL, level: bool, now_ms: u64) {
        self.output.set_level(level, now_ms);
        solenoid.set_state(level);
    }

    /// Drain the host link into the parser and apply complete commands
    fn service_host<LINK: HostLink>(&mut self, link: &mut LINK, report: &mut PollReport) {
        loop {
            match link.try_read_byte() {
                Ok(Some(byte)) => {
                    // A full buffer always holds a complete frame
                    if self.parser.is_full() {
                        self.dispatch_commands(report);
                    }
                    if let Err(e) = self.parser.push(byte) {
                        self.record_frame_error(e, report);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    bump(&mut self.diagnostics.host_read_errors);
                    report.link_error = Some(e);
                    break;
                }
            }
        }
        self.dispatch_commands(report);
    }

    fn dispatch_commands(&mut self, report: &mut PollReport) {
        loop {
            match self.parser.next_command() {
                Ok(Some(command)) => self.apply(command, report),
                Ok(None) => break,
                Err(e) => {
                    self.record_frame_error(e, report);
                    break;
                }
            }
        }
    }

    fn apply(&mut self, command: Command, report: &mut PollReport) {
        match command {
            Command::SetRow(bits) => {
                self.rows.replace_row(Row::from_bits(bits));
                bump(&mut self.diagnostics.rows_received);
                report.rows_received = report.rows_received.saturating_add(1);
            }
        }
    }

    fn record_frame_error(&mut self, error: FrameError, report: &mut PollReport) {
        bump(&mut self.diagnostics.parse_errors);
        report.frame_error = Some(error);
    }

    fn notify_row_complete<LINK: HostLink>(&mut self, link: &mut LINK, report: &mut PollReport) {
        let mut frame = [0u8; 1];
        let result = DeviceMessage::RowComplete
            .encode(&mut frame)
            .map_err(|_| LinkError::TxFull)
            .and_then(|len| link.write_all(&frame[..len]));

        if let Err(e) = result {
            bump(&mut self.diagnostics.host_write_errors);
            report.link_error = Some(e);
        }
    }
}
