use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use tokio::{task::JoinHandle, time::interval};

pub static METER: Meter = Meter::new();

#[derive(Default)]
pub struct Meter {
    camera_frames: AtomicU64,
    infered: AtomicU64,
    failed: AtomicU64,
}

impl Meter {
    pub const fn new() -> Meter {
        Meter {
            camera_frames: AtomicU64::new(0),
            infered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn tick_frame(&self) {
        self.camera_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tick_infered(&self) {
        self.infered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tick_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_reset_frames(&self) -> u64 {
        self.camera_frames.swap(0, Ordering::Relaxed)
    }

    pub fn get_reset_infered(&self) -> u64 {
        self.infered.swap(0, Ordering::Relaxed)
    }

    pub fn get_reset_failed(&self) -> u64 {
        self.failed.swap(0, Ordering::Relaxed)
    }
}

pub fn spawn_meter_logger() -> JoinHandle<()> {
    tokio::spawn(async {
        let mut log_interval = interval(Duration::from_secs(2));
        log_interval.tick().await;

        loop {
            let start = Instant::now();
            log_interval.tick().await;

            let frames = METER.get_reset_frames();
            let infered = METER.get_reset_infered();
            let failed = METER.get_reset_failed();
            let elapsed = start.elapsed().as_secs_f32();

            if frames > 0 {
                log::info!("Camera frames per second: {:.2}", frames as f32 / elapsed)
            }
            if infered > 0 {
                log::info!("Inferences per second: {:.2}", infered as f32 / elapsed)
            }
            if failed > 0 {
                log::warn!("{failed} inferences failed in the last {elapsed:.1}s")
            }
        }
    })
}
