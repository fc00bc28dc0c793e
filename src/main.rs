//! moto firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │   console (stdin)   attribute_bridge   NvsAdapter   LogSink  │
//! │                                                              │
//! │  ─────────────── ControlState (atomics) ───────────────────  │
//! │                                                              │
//! │   render thread (core 0, above console priority)             │
//! │   RenderEngine ──▶ PwmChannels<Ledc> ──▶ LEDC               │
//! │        └──▶ Watchdog feed per iteration                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io::ErrorKind;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info, warn};

use moto::adapters::console::{self, ConsoleRequest};
use moto::adapters::log_sink::LogEventSink;
use moto::adapters::nvs::NvsAdapter;
use moto::app::control::ControlState;
use moto::app::engine::RenderEngine;
use moto::app::persist::DeferredPersistence;
use moto::app::ports::StorageError;
use moto::config::EngineConfig;
use moto::drivers::hw_init::Ledc;
use moto::drivers::pwm_channels::PwmChannels;
use moto::drivers::task_pin::{Core, spawn_on_core};
use moto::drivers::watchdog::Watchdog;
use moto::pins;

// The C5 is single-core.
const RENDER_CORE: Core = Core::Pro;
const RENDER_PRIORITY: u8 = 5;
const RENDER_STACK_KB: usize = 8;
const CONSOLE_POLL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("moto v{}", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::default();
    config.validate()?;

    // ── 2. PWM channels (fatal if none come up) ───────────────
    let mut pwm = PwmChannels::new(Ledc, &config);
    let channels = pwm
        .init(&pins::LED_GPIOS, pins::LED_COUNT)
        .map_err(moto::Error::from)
        .context("PWM init")?;
    info!("{} of {} light channels up", channels, pins::LED_COUNT);

    // ── 3. Control state, restored from NVS ───────────────────
    let control = Arc::new(ControlState::from_config(&config));
    let mut store = match NvsAdapter::new() {
        Ok(nvs) => Some(nvs),
        Err(e) => {
            warn!("NVS init failed ({}), running without persistence", e);
            None
        }
    };
    let mut persist =
        DeferredPersistence::new(Duration::from_millis(u64::from(config.persist_delay_ms)));
    if let Some(nvs) = &store {
        match control.restore(nvs) {
            Ok(stored) => {
                info!("Control state restored: {:?}", stored);
                persist.mark_saved(stored);
            }
            Err(StorageError::NotFound) => info!("No stored control state, using defaults"),
            Err(e) => warn!("Stored control state unusable ({}), using defaults", e),
        }
    }

    // ── 4. Render thread ──────────────────────────────────────
    let stop = Arc::new(AtomicBool::new(false));
    let render = {
        let control = Arc::clone(&control);
        let stop = Arc::clone(&stop);
        let config = config.clone();
        spawn_on_core(RENDER_CORE, RENDER_PRIORITY, RENDER_STACK_KB, "render\0", move || {
            let watchdog = Watchdog::new(config.watchdog_timeout_ms);
            let mut engine = RenderEngine::new(&config);
            let mut sink = LogEventSink::new();
            engine.run(&control, &mut pwm, &mut sink, &stop, || watchdog.feed());
        })
        .context("spawn render thread")?
    };

    // ── 5. Serial console on the main task ────────────────────
    info!("{}", console::HELP);
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        if let Some(nvs) = store.as_mut() {
            if let Err(e) = persist.poll(&control, nvs, Instant::now()) {
                warn!("console: persist failed ({})", e);
            }
        }

        line.clear();
        match stdin.read_line(&mut line) {
            // UART reports EOF while nothing is typed.
            Ok(0) => std::thread::sleep(CONSOLE_POLL),
            Ok(_) => handle_line(&line, &control, &mut persist),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                std::thread::sleep(CONSOLE_POLL);
            }
            Err(e) => {
                error!("console: read failed ({}), console disabled", e);
                break;
            }
        }
    }

    render
        .join()
        .map_err(|_| anyhow::anyhow!("render thread panicked"))?;
    Ok(())
}

fn handle_line(line: &str, control: &ControlState, persist: &mut DeferredPersistence) {
    if line.trim().is_empty() {
        return;
    }
    match console::parse_line(line) {
        Ok(ConsoleRequest::Command(command)) => {
            control.apply(command);
            persist.note(&command, Instant::now());
            println!("ok: {}", console::format_status(&control.snapshot()));
        }
        Ok(ConsoleRequest::Status) => {
            println!("{}", console::format_status(&control.snapshot()));
        }
        Ok(ConsoleRequest::Help) => println!("{}", console::HELP),
        Err(e) => println!("error: {}", e),
    }
}
