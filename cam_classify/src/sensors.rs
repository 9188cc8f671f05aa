//! Sensors module.
//!
use classifier::{
    camera::{Camera, CameraConstraints},
    ClassifyError, Result,
};
use image::{imageops::FilterType, RgbImage};
use rscam::{IntervalInfo, ResolutionInfo};

/// Frame format the camera is streamed in. Frames are decoded as JPEG.
const SUPPORTED_FORMAT: &str = "MJPG";

/// Stream settings negotiated with the device.
#[derive(Clone, Copy, Debug)]
struct StreamConfig {
    resolution: (u32, u32),
    interval: (u32, u32),
}

/// V4L2 webcam on a Linux machine.
#[derive(Default)]
pub struct V4lCamera {
    cam: Option<rscam::Camera>,
    stream: Option<StreamConfig>,
    canvas: (u32, u32),
    flip: bool,
    frame: Option<RgbImage>,
}

impl V4lCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Camera for V4lCamera {
    fn setup(&mut self, constraints: &CameraConstraints) -> Result<()> {
        if constraints.format != SUPPORTED_FORMAT {
            return Err(ClassifyError::camera(format!(
                "unsupported pixel format {}, use {}",
                constraints.format, SUPPORTED_FORMAT
            )));
        }
        let format = constraints.format.as_bytes();

        let cam = rscam::Camera::new(&constraints.device).map_err(ClassifyError::camera)?;
        log_supported_formats(&cam, &constraints.format);

        let resolution_info = cam.resolutions(format).map_err(ClassifyError::camera)?;
        log::debug!("Found resolutions: {:?}", &resolution_info);
        let resolution = choose_resolution(&resolution_info, (constraints.width, constraints.height))
            .ok_or_else(|| ClassifyError::camera("No resolution found"))?;

        let interval_info = cam
            .intervals(format, resolution)
            .map_err(ClassifyError::camera)?;
        log::debug!("Found frame intervals: {:?}", &interval_info);
        let interval = choose_interval(&interval_info, constraints.interval)
            .ok_or_else(|| ClassifyError::camera("No frame rate found"))?;

        log::info!(
            "Using camera {} at {}x{}, {}/{}s per frame",
            &constraints.device,
            resolution.0,
            resolution.1,
            interval.0,
            interval.1
        );

        self.cam = Some(cam);
        self.stream = Some(StreamConfig {
            resolution,
            interval,
        });
        self.canvas = (constraints.width, constraints.height);
        self.flip = constraints.flip;

        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let (cam, stream) = match (self.cam.as_mut(), self.stream) {
            (Some(cam), Some(stream)) => (cam, stream),
            _ => return Err(ClassifyError::camera("camera is not set up")),
        };

        cam.start(&rscam::Config {
            interval: stream.interval,
            resolution: stream.resolution,
            format: SUPPORTED_FORMAT.as_bytes(),
            ..Default::default()
        })
        .map_err(ClassifyError::camera)
    }

    fn update(&mut self) -> Result<()> {
        let cam = self
            .cam
            .as_ref()
            .ok_or_else(|| ClassifyError::camera("camera is not set up"))?;

        let frame = cam.capture().map_err(ClassifyError::camera)?;
        let image: RgbImage =
            turbojpeg::decompress_image(&frame[..]).map_err(ClassifyError::camera)?;

        self.frame = Some(fit_canvas(image, self.canvas, self.flip));
        Ok(())
    }

    fn update_blocks(&self) -> bool {
        true
    }

    fn frame(&self) -> Option<RgbImage> {
        self.frame.clone()
    }
}

/// Scale a captured frame to the canvas size and mirror it if requested.
fn fit_canvas(image: RgbImage, canvas: (u32, u32), flip: bool) -> RgbImage {
    let image = if image.dimensions() == canvas || canvas.0 == 0 || canvas.1 == 0 {
        image
    } else {
        image::imageops::resize(&image, canvas.0, canvas.1, FilterType::Triangle)
    };

    match flip {
        true => image::imageops::flip_horizontal(&image),
        false => image,
    }
}

/// The requested resolution if the device offers it, otherwise the largest one.
fn choose_resolution(info: &ResolutionInfo, requested: (u32, u32)) -> Option<(u32, u32)> {
    match info {
        ResolutionInfo::Discretes(resolutions) => {
            if resolutions.contains(&requested) {
                return Some(requested);
            }
            resolutions
                .iter()
                // Get the highest resolution in terms of number of pixels
                .max_by_key(|res| res.0 * res.1)
                .copied()
        }
        ResolutionInfo::Stepwise { min, max, step } => {
            let fits = |value: u32, min: u32, max: u32, step: u32| {
                (min..=max).contains(&value) && (step == 0 || (value - min) % step == 0)
            };
            if fits(requested.0, min.0, max.0, step.0) && fits(requested.1, min.1, max.1, step.1)
            {
                Some(requested)
            } else {
                Some(*max)
            }
        }
    }
}

/// The requested frame interval if offered, otherwise the shortest one.
fn choose_interval(info: &IntervalInfo, requested: (u32, u32)) -> Option<(u32, u32)> {
    let seconds = |(num, den): (u32, u32)| num as f64 / den.max(1) as f64;

    match info {
        IntervalInfo::Discretes(intervals) => {
            if intervals.contains(&requested) {
                return Some(requested);
            }
            intervals
                .iter()
                .copied()
                .min_by(|a, b| seconds(*a).total_cmp(&seconds(*b)))
        }
        IntervalInfo::Stepwise { min, max, .. } => {
            if (seconds(*min)..=seconds(*max)).contains(&seconds(requested)) {
                Some(requested)
            } else {
                Some(*min)
            }
        }
    }
}

fn log_supported_formats(cam: &rscam::Camera, format: &str) {
    let formats: Vec<_> = cam.formats().filter_map(|fmt| fmt.ok()).collect();
    log::debug!(
        "Supported formats: {:?}, using format {:?}",
        formats,
        format
    );
}
