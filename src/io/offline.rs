//! Device-less backend
//!
//! A worker thread plays the part of the audio device: it renders
//! fixed-size buffers through the mixer and hands each one to a sink. With
//! [`Pacing::Realtime`] it sleeps one buffer's duration between callbacks,
//! with [`Pacing::Freewheel`] it renders as fast as the mixer allows
//! (useful for bounces and tests).

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use super::{AudioBackend, BackendStream};
use crate::{
    config::EngineConfig,
    engine::mixer::Mixer,
    error::{EngineError, EngineResult},
    CHANNELS,
};

/// Polling interval of a stopped worker
const IDLE_POLL: Duration = Duration::from_millis(1);

type Sink = Arc<dyn Fn(&[f32]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// One buffer per buffer duration, like a device clock
    Realtime,
    /// Back to back, no sleeping
    Freewheel,
}

#[derive(Clone)]
pub struct OfflineBackend {
    pacing: Pacing,
    sink: Option<Sink>,
    buffer_limit: Option<u64>,
}

impl OfflineBackend {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            sink: None,
            buffer_limit: None,
        }
    }

    /// Receive every rendered interleaved buffer.
    pub fn with_sink(mut self, sink: impl Fn(&[f32]) + Send + Sync + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Stop rendering after `buffers` callbacks; the stream then idles.
    pub fn with_buffer_limit(mut self, buffers: u64) -> Self {
        self.buffer_limit = Some(buffers);
        self
    }
}

impl AudioBackend for OfflineBackend {
    type Stream = OfflineStream;

    fn open(&mut self, config: &EngineConfig, mixer: Mixer) -> EngineResult<OfflineStream> {
        let control = Arc::new(Control {
            running: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            buffers: AtomicU64::new(0),
            render: Mutex::new(()),
        });

        let frames = config.frames_per_buffer.max(1) as usize;
        let period = match self.pacing {
            Pacing::Realtime => Some(Duration::from_secs_f64(
                frames as f64 / config.sample_rate.max(1) as f64,
            )),
            Pacing::Freewheel => None,
        };
        let worker = Worker {
            control: control.clone(),
            mixer,
            sink: self.sink.clone(),
            buffer: vec![0.0; frames * CHANNELS],
            period,
            buffer_limit: self.buffer_limit,
        };

        let handle = thread::Builder::new()
            .name("trackmix-offline".into())
            .spawn(move || worker.run())
            .map_err(|e| EngineError::StreamBuildError(e.to_string()))?;

        log::info!(
            "Offline stream opened: {}Hz, {} frames, {:?}",
            config.sample_rate,
            frames,
            self.pacing
        );

        Ok(OfflineStream {
            control,
            worker: Some(handle),
        })
    }
}

struct Control {
    running: AtomicBool,
    shutdown: AtomicBool,
    buffers: AtomicU64,
    /// Held across each check-and-render, so `stop` can wait out a buffer
    /// in flight
    render: Mutex<()>,
}

struct Worker {
    control: Arc<Control>,
    mixer: Mixer,
    sink: Option<Sink>,
    buffer: Vec<f32>,
    period: Option<Duration>,
    buffer_limit: Option<u64>,
}

impl Worker {
    fn run(mut self) {
        while !self.control.shutdown.load(Ordering::Acquire) {
            if !self.render_next() {
                thread::sleep(IDLE_POLL);
                continue;
            }

            match self.period {
                Some(period) => thread::sleep(period),
                None => thread::yield_now(),
            }
        }
    }

    /// Render one buffer if the stream is running. Returns false when idle.
    fn render_next(&mut self) -> bool {
        let _render = self
            .control
            .render
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let rendered = self.control.buffers.load(Ordering::Relaxed);
        let exhausted = self.buffer_limit.is_some_and(|limit| rendered >= limit);
        if !self.control.running.load(Ordering::Acquire) || exhausted {
            return false;
        }

        self.mixer.process(&mut self.buffer);
        if let Some(sink) = &self.sink {
            sink(&self.buffer);
        }
        self.control.buffers.fetch_add(1, Ordering::Relaxed);
        true
    }
}

/// Handle to the worker thread. Dropping it joins the worker.
pub struct OfflineStream {
    control: Arc<Control>,
    worker: Option<JoinHandle<()>>,
}

impl OfflineStream {
    /// Buffers rendered so far
    pub fn buffers_rendered(&self) -> u64 {
        self.control.buffers.load(Ordering::Relaxed)
    }
}

impl BackendStream for OfflineStream {
    fn start(&self) -> EngineResult<()> {
        self.control.running.store(true, Ordering::Release);
        Ok(())
    }

    /// Returns once any buffer in flight has landed; nothing renders after.
    fn stop(&self) -> EngineResult<()> {
        self.control.running.store(false, Ordering::Release);
        drop(
            self.control
                .render
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        Ok(())
    }
}

impl Drop for OfflineStream {
    fn drop(&mut self) {
        self.control.shutdown.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("offline audio worker panicked");
            }
        }
    }
}
