//! Low Tide - an audio-reactive procedural tide
//!
//! River and ocean beds drive a flow field of particles and five sediment
//! ribbons; every so often the tide whispers a field note.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use lowtide::audio::{
    prepare_bed, Analyzer, AudioOutput, FftAnalyzer, Mixer, OutputDevice, SharedMixer,
};
use lowtide::canvas::Raster;
use lowtide::cli::Args;
use lowtide::overlay::LogVoice;
use lowtide::params::{Config, RecordingConfig};
use lowtide::rendering::Presenter;
use lowtide::session::Bed;
use lowtide::signal::Clock;
use lowtide::{logging, FrameInput, Scene};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    raster: Raster,

    // Simulation and collaborators
    scene: Scene,
    mixer: SharedMixer,
    analyzer: FftAnalyzer,
    voice: LogVoice,
    _output: Option<AudioOutput>,

    // Input and time tracking
    pointer: Option<Vec2>,
    start_time: Instant,
    frame: u64,
    title: String,
}

impl App {
    fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }

    fn bounds(&self) -> Vec2 {
        let (width, height) = self.raster.image().dimensions();
        Vec2::new(width as f32, height as f32)
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let render = &self.scene.config().render;
        let window_attributes = Window::default_attributes()
            .with_title(render.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                render.window_width,
                render.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let presenter = match pollster::block_on(Presenter::new(Arc::clone(&window))) {
            Ok(presenter) => presenter,
            Err(e) => {
                error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.raster.resize(size.width, size.height);

        info!("Low Tide is running. Click to begin, ESC to quit");

        self.window = Some(window);
        self.presenter = Some(presenter);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
                self.raster.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.pointer = None,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let now = self.elapsed_ms();
                self.scene.interact(now, &mut self.mixer, &mut self.voice);
            }
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }
}

impl App {
    /// Advance and present a single frame
    fn render_frame(&mut self) {
        let now = self.elapsed_ms();
        let bounds = self.bounds();

        let samples = self.mixer.lock().drain_tap();
        self.analyzer.push_samples(&samples);
        let level = self.analyzer.level();
        let spectrum = self.analyzer.analyze();

        let input = FrameInput {
            spectrum,
            level,
            pointer: self.pointer,
            clock: Clock::new(self.frame, now),
            bounds,
        };
        self.scene.tick(input, &mut self.mixer, &mut self.voice);
        self.scene.draw(&mut self.raster);
        self.frame += 1;

        let title = self
            .scene
            .overlay()
            .newest_line()
            .map(str::to_string)
            .unwrap_or_else(|| self.scene.config().render.title.clone());
        if let Some(window) = &self.window {
            if title != self.title {
                window.set_title(&title);
                self.title = title;
            }
        }

        let Some(presenter) = &mut self.presenter else {
            return;
        };
        match presenter.present(self.raster.image()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = self.raster.image().dimensions();
                presenter.resize(width, height);
            }
            Err(e) => error!("Render error: {:?}", e),
        }
    }
}

/// Bed loops at `sample_rate`, from WAV files when given
fn prepare_mixer(args: &Args, config: &Config, sample_rate: u32) -> Result<Mixer> {
    let secs = config.analysis.synth_loop_secs;
    let river = prepare_bed(Bed::River, args.river.as_deref(), sample_rate, secs)
        .context("Failed to prepare river bed")?;
    let ocean = prepare_bed(Bed::Ocean, args.ocean.as_deref(), sample_rate, secs)
        .context("Failed to prepare ocean bed")?;
    Ok(Mixer::new(river, ocean, sample_rate))
}

/// Windowed, real-time mode
fn run_window(args: &Args, config: Config, notes: &[String]) -> Result<()> {
    let device = OutputDevice::open_default();
    let sample_rate = match &device {
        Ok(device) => device.sample_rate(),
        Err(e) => {
            warn!("{}; running without sound", e);
            config.analysis.sample_rate_hz as u32
        }
    };
    let mixer = SharedMixer::new(prepare_mixer(args, &config, sample_rate)?);
    let output = match device {
        Ok(device) => match device.start(mixer.clone()) {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("{}; running without sound", e);
                None
            }
        },
        Err(_) => None,
    };

    let bounds = Vec2::new(
        config.render.window_width as f32,
        config.render.window_height as f32,
    );
    let raster = Raster::new(config.render.window_width, config.render.window_height);
    let analyzer = FftAnalyzer::new(config.analysis.clone());
    let scene =
        Scene::new(config, notes, args.seed, bounds).context("Invalid configuration")?;

    let mut app = App {
        window: None,
        presenter: None,
        raster,
        scene,
        mixer,
        analyzer,
        voice: LogVoice::new(),
        _output: output,
        pointer: None,
        start_time: Instant::now(),
        frame: 0,
        title: String::new(),
    };

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;
    Ok(())
}

/// Headless offline render: PNG frames plus the mixed audio
fn run_recording(
    args: &Args,
    config: Config,
    notes: &[String],
    recording: RecordingConfig,
) -> Result<()> {
    let sample_rate = config.analysis.sample_rate_hz as u32;
    let mut mixer = prepare_mixer(args, &config, sample_rate)?;
    let mut analyzer = FftAnalyzer::new(config.analysis.clone());
    let mut voice = LogVoice::new();

    let (width, height) = (config.render.window_width, config.render.window_height);
    let bounds = Vec2::new(width as f32, height as f32);
    let mut raster = Raster::new(width, height);
    let mut scene =
        Scene::new(config, notes, args.seed, bounds).context("Invalid configuration")?;

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(recording.audio_path(), spec)
        .context("Failed to create WAV writer")?;

    let total = recording.total_frames();
    let frame_ms = recording.frame_ms();
    info!(
        "Recording {} frames at {}x{} to {}",
        total, width, height, recording.output_dir
    );

    scene.interact(0.0, &mut mixer, &mut voice);

    let mut block: Vec<f32> = Vec::new();
    let mut rendered: usize = 0;
    for frame in 0..total {
        let now = frame as f64 * frame_ms;

        // Audio up to the end of this frame
        let target =
            ((frame + 1) as f64 * frame_ms / 1000.0 * sample_rate as f64).round() as usize;
        block.resize(target - rendered, 0.0);
        mixer.render(&mut block);
        rendered = target;
        for &sample in &block {
            writer.write_sample(sample)?;
        }
        analyzer.push_samples(&mixer.drain_tap());

        let level = analyzer.level();
        let input = FrameInput {
            spectrum: analyzer.analyze(),
            level,
            pointer: None,
            clock: Clock::new(frame as u64, now),
            bounds,
        };
        scene.tick(input, &mut mixer, &mut voice);
        scene.draw(&mut raster);
        raster
            .save(&recording.frame_path(frame))
            .with_context(|| format!("Failed to save frame {}", frame))?;

        if frame % recording.fps as usize == 0 {
            info!("Recorded {}/{} frames", frame, total);
        }
    }

    writer.finalize().context("Failed to finalize WAV")?;
    info!(
        "Recording complete: {} frames, audio at {}",
        total,
        recording.audio_path()
    );
    Ok(())
}

fn main() -> Result<()> {
    logging::init(LevelFilter::INFO);

    let args = Args::parse();
    let config = args.load_config().context("Failed to load configuration")?;
    let notes = args.load_notes();

    match args.create_recording_config()? {
        Some(recording) => run_recording(&args, config, &notes, recording),
        None => run_window(&args, config, &notes),
    }
}
