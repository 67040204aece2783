//! Purl - Knitting Machine Solenoid Firmware
//!
//! Main firmware binary for RP2040-based carriage interfaces. Watches the
//! carriage range and clock lines and drives the needle-selection solenoid
//! one row at a time, as sent by the host over UART0.
//!
//! Named after the purl stitch - the other half of every knitted fabric.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::AnyPin;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::Peri;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use purl_core::config::HOST_UART_PINS;
use purl_core::{Board, KnitterConfig, PinSpec};
use purl_hal_rp2040::{GpioAllocator, HostUart, HostUartPeripherals, PinBank, RpInput, RpOutput};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Runs the edge capture task above thread-mode priority
static EDGE_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EDGE_EXECUTOR.on_interrupt()
}

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Purl firmware starting...");

    let p = embassy_rp::init(Default::default());
    let (mut bank, host) = PinBank::new(p);

    let config = config::load_config();
    let pins = config.pins;
    info!(
        "Pins: range={} clock={} solenoid={} direction={} fault_led={}",
        pins.range.pin, pins.clock.pin, pins.solenoid.pin, pins.direction.pin, pins.fault_led.pin
    );

    // Host UART pins are claimed first so no function can reuse them
    let mut alloc = GpioAllocator::new();
    let claimed = alloc
        .allocate_all(&HOST_UART_PINS.map(PinSpec::new))
        .and_then(|()| alloc.allocate_all(&pins.all()));
    if let Err((pin, e)) = claimed {
        defmt::panic!("gpio{} allocation failed: {:?}", pin, e);
    }
    debug!("{} GPIO pins claimed", alloc.allocated_count());

    // Solenoid first: it must be driven low before anything else runs
    let solenoid = RpOutput::new(take(&mut bank, pins.solenoid), pins.solenoid);
    let fault_led = RpOutput::new(take(&mut bank, pins.fault_led), pins.fault_led);
    let range = RpInput::new(take(&mut bank, pins.range), pins.range);
    let direction = RpInput::new(take(&mut bank, pins.direction), pins.direction);
    let clock = RpInput::new(take(&mut bank, pins.clock), pins.clock);
    info!("GPIO initialized, solenoid off");

    let link = init_host_link(host, &config);
    info!("Host link on UART0 at {} baud", config.baudrate);

    // Edge capture preempts the knitting loop
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let edge_spawner = EDGE_EXECUTOR.start(interrupt::SWI_IRQ_1);
    edge_spawner.spawn(tasks::edge_capture_task(clock)).unwrap();

    let board = Board {
        range,
        direction,
        solenoid,
        fault_led,
        link,
    };
    spawner.spawn(tasks::knitting_task(board, config)).unwrap();
    spawner
        .spawn(tasks::status_task(config.status_interval_ms))
        .unwrap();

    info!("All tasks spawned, firmware running");
}

/// Take a configured pin from the bank
fn take(bank: &mut PinBank, spec: PinSpec) -> Peri<'static, AnyPin> {
    match bank.take(spec.pin) {
        Ok(pin) => pin,
        Err(e) => defmt::panic!("gpio{} unavailable: {:?}", spec.pin, e),
    }
}

/// Bring up UART0 with interrupt-driven ring buffers
fn init_host_link(host: HostUartPeripherals, config: &KnitterConfig) -> HostUart {
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baudrate;

    let uart = Uart::new_blocking(host.uart, host.tx, host.rx, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    HostUart::new(rx, tx)
}
