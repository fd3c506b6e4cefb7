//! Blocking and pool-dispatched operations
//!
//! Every operation comes in two forms with identical output:
//!
//! - [`resize_sync`] / [`convert_sync`] run on the calling thread and
//!   return the new image.
//! - [`Dispatcher::resize`] / [`Dispatcher::convert`] validate their
//!   arguments on the calling thread, then run the whole request on one
//!   worker of a fixed-size pool and hand the new image to a completion
//!   callback on that worker.
//!
//! Invalid arguments are reported before anything is queued; a queued
//! request always completes. Requests cannot be cancelled.
//!
//! A panic inside a request (for example in a completion callback) is
//! caught by the pool and logged; the worker keeps serving, and a
//! [`TaskHandle`] waiting on that request reports [`Error::TaskFailed`].

use crate::error::{Error, Result};
use pixmill_color::{ConvertOptions, convert_image};
use pixmill_core::{ImageView, NativeImage, PixelFormat};
use pixmill_transform::{ResizeOptions, TransformError, resize_image};
use std::any::Any;
use std::sync::mpsc;

/// Resize on the calling thread.
///
/// See [`pixmill_transform::resize`].
pub fn resize_sync<'a>(
    image: impl Into<ImageView<'a>>,
    width: u32,
    height: u32,
    options: &ResizeOptions,
) -> Result<NativeImage> {
    Ok(pixmill_transform::resize(image, width, height, options)?)
}

/// Convert on the calling thread.
///
/// See [`pixmill_color::convert`].
pub fn convert_sync<'a>(
    image: impl Into<ImageView<'a>>,
    target_format: PixelFormat,
    options: &ConvertOptions,
) -> Result<NativeImage> {
    Ok(pixmill_color::convert(image, target_format, options)?)
}

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherOptions {
    /// Number of worker threads; 0 uses one per logical CPU
    pub threads: usize,
    /// Prefix for worker thread names
    pub thread_name: String,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            threads: 0,
            thread_name: "pixmill-worker".to_string(),
        }
    }
}

impl DispatcherOptions {
    /// Set the number of worker threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the worker thread name prefix
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Runs resize and convert requests on a fixed-size worker pool
pub struct Dispatcher {
    pool: rayon::ThreadPool,
}

impl Dispatcher {
    /// Start the worker pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pool`] if the threads cannot be spawned.
    pub fn new(options: &DispatcherOptions) -> Result<Self> {
        let prefix = options.thread_name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .panic_handler(log_task_panic)
            .build()?;
        log::debug!(
            "dispatcher started with {} worker threads",
            pool.current_num_threads()
        );
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queue a resize of `image` to `width x height`.
    ///
    /// The source image moves into the request. `done` runs on a worker
    /// thread with the resized image.
    ///
    /// # Errors
    ///
    /// Returns the same argument errors as [`resize_sync`]; `done` is never
    /// called in that case.
    pub fn resize<F>(
        &self,
        image: NativeImage,
        width: u32,
        height: u32,
        options: &ResizeOptions,
        done: F,
    ) -> Result<()>
    where
        F: FnOnce(NativeImage) + Send + 'static,
    {
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidDimensions { width, height }.into());
        }
        let filter = options.scaled_filter()?;
        let mut dst = NativeImage::new(width, height, image.format())?;

        self.pool.spawn(move || {
            resize_image(&filter, &image.view(), &mut dst.view_mut());
            log::debug!(
                "resize task done: {}x{} -> {}x{}",
                image.width(),
                image.height(),
                width,
                height
            );
            done(dst);
        });
        Ok(())
    }

    /// Queue a conversion of `image` to `target_format`.
    ///
    /// The source image moves into the request. `done` runs on a worker
    /// thread with the converted image.
    ///
    /// # Errors
    ///
    /// Returns the same argument errors as [`convert_sync`]; `done` is never
    /// called in that case.
    pub fn convert<F>(
        &self,
        image: NativeImage,
        target_format: PixelFormat,
        options: &ConvertOptions,
        done: F,
    ) -> Result<()>
    where
        F: FnOnce(NativeImage) + Send + 'static,
    {
        let settings = options.settings()?;
        let mut dst = NativeImage::new(image.width(), image.height(), target_format)?;

        self.pool.spawn(move || {
            convert_image(&settings, &image.view(), &mut dst.view_mut());
            log::debug!("convert task done: {} -> {}", image.format(), target_format);
            done(dst);
        });
        Ok(())
    }

    /// Queue a resize and return a handle to wait on.
    pub fn resize_handle(
        &self,
        image: NativeImage,
        width: u32,
        height: u32,
        options: &ResizeOptions,
    ) -> Result<TaskHandle> {
        let (tx, rx) = mpsc::channel();
        self.resize(image, width, height, options, move |out| {
            // The handle may already be dropped.
            let _ = tx.send(out);
        })?;
        Ok(TaskHandle { rx })
    }

    /// Queue a conversion and return a handle to wait on.
    pub fn convert_handle(
        &self,
        image: NativeImage,
        target_format: PixelFormat,
        options: &ConvertOptions,
    ) -> Result<TaskHandle> {
        let (tx, rx) = mpsc::channel();
        self.convert(image, target_format, options, move |out| {
            let _ = tx.send(out);
        })?;
        Ok(TaskHandle { rx })
    }
}

fn log_task_panic(payload: Box<dyn Any + Send>) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    };
    log::error!("task panicked: {msg}");
}

/// Pending result of a queued request
#[derive(Debug)]
pub struct TaskHandle {
    rx: mpsc::Receiver<NativeImage>,
}

impl TaskHandle {
    /// Block until the request completes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskFailed`] if the request panicked before
    /// delivering its result.
    pub fn wait(self) -> Result<NativeImage> {
        self.rx.recv().map_err(|_| Error::TaskFailed)
    }

    /// Return the result if the request has completed.
    pub fn try_wait(&self) -> Option<NativeImage> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmill_transform::FilterKind;

    fn sample(format: PixelFormat) -> NativeImage {
        let mut image = NativeImage::new(9, 7, format).unwrap();
        for y in 0..7 {
            for (i, b) in image.row_mut(y).iter_mut().enumerate() {
                *b = (i * 7 + y as usize * 13) as u8;
            }
        }
        image
    }

    #[test]
    fn test_dispatcher_threads() {
        let dispatcher = Dispatcher::new(&DispatcherOptions::default().with_threads(2)).unwrap();
        assert_eq!(dispatcher.threads(), 2);
    }

    #[test]
    fn test_resize_handle_matches_sync() {
        let dispatcher = Dispatcher::new(&DispatcherOptions::default().with_threads(2)).unwrap();
        let image = sample(PixelFormat::Rgb);
        let options = ResizeOptions::new().with_filter(FilterKind::Mitchell);
        let expected = resize_sync(&image, 4, 11, &options).unwrap();
        let handle = dispatcher.resize_handle(image, 4, 11, &options).unwrap();
        assert_eq!(handle.wait().unwrap(), expected);
    }

    #[test]
    fn test_convert_callback() {
        let dispatcher = Dispatcher::new(&DispatcherOptions::default().with_threads(1)).unwrap();
        let image = sample(PixelFormat::Rgba);
        let expected = convert_sync(&image, PixelFormat::Grey16, &ConvertOptions::default()).unwrap();

        let (tx, rx) = mpsc::channel();
        dispatcher
            .convert(
                image,
                PixelFormat::Grey16,
                &ConvertOptions::default(),
                move |out| tx.send(out).unwrap(),
            )
            .unwrap();
        assert_eq!(rx.recv().unwrap(), expected);
    }

    #[test]
    fn test_panicking_task_reports_failure() {
        let dispatcher = Dispatcher::new(&DispatcherOptions::default().with_threads(1)).unwrap();
        let image = sample(PixelFormat::Rgb);

        let (tx, rx) = mpsc::channel::<NativeImage>();
        dispatcher
            .resize(image.clone(), 2, 2, &ResizeOptions::default(), move |_| {
                let _sender = tx;
                panic!("callback failure");
            })
            .unwrap();
        let handle = TaskHandle { rx };
        assert!(matches!(handle.wait(), Err(Error::TaskFailed)));

        // The single worker survived and serves the next request
        let expected = resize_sync(&image, 3, 3, &ResizeOptions::default()).unwrap();
        let out = dispatcher
            .resize_handle(image, 3, 3, &ResizeOptions::default())
            .unwrap()
            .wait()
            .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_invalid_arguments_rejected_before_queueing() {
        let dispatcher = Dispatcher::new(&DispatcherOptions::default().with_threads(1)).unwrap();
        let image = sample(PixelFormat::Grey);
        let result = dispatcher.resize(image.clone(), 0, 4, &ResizeOptions::default(), |_| {
            panic!("callback must not run")
        });
        assert!(matches!(
            result,
            Err(Error::Transform(TransformError::InvalidDimensions { .. }))
        ));

        let bad_scale = ResizeOptions::new().with_filter_scale(-1.0);
        assert!(dispatcher.resize_handle(image.clone(), 2, 2, &bad_scale).is_err());

        let bad_weights = ConvertOptions::new().with_weights(0.0, 0.0, 0.0);
        assert!(matches!(
            dispatcher.convert_handle(image, PixelFormat::Rgb, &bad_weights),
            Err(Error::Color(_))
        ));
    }
}
