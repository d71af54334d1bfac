//! Shaper - application builder and audio/UI wiring

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use shaper_dsp::curve::Curve;
use shaper_dsp::dsp::shaper;
use shaper_dsp::rt::{curve_channel, SharedCurve};

use super::ui::UiApp;

/// Output level headroom so heavy curves don't slam the converters.
const OUTPUT_GAIN: f32 = 0.4;

/// Main application builder
pub struct Shaper {
    frequency: f32,
    drive: f32,
}

impl Shaper {
    pub fn new() -> Self {
        Self {
            frequency: 110.0,
            drive: 1.0,
        }
    }

    /// Test tone frequency in Hz.
    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Input gain into the curve. Values above 1 push the tone into the
    /// extrapolation region.
    pub fn drive(mut self, drive: f32) -> Self {
        self.drive = drive;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let (editor, shared) = curve_channel(Curve::new());

        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let mut engine = ToneEngine::new(shared, self.frequency / sample_rate, self.drive);

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                engine.render(data, channels);
            },
            |err| eprintln!("Audio error: {}", err),
            None,
        )?;
        stream.play()?;

        // Hand the terminal to the editor UI; audio keeps running underneath.
        let mut terminal = ratatui::init();
        let mut ui = UiApp::new(editor);
        let result = ui.run(&mut terminal);
        ratatui::restore();

        println!("Curve state: {}", ui.editor().curve().serialize());

        result
    }
}

impl Default for Shaper {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio-thread state: a naive sine source shaped through the shared curve.
struct ToneEngine {
    shared: SharedCurve,
    phase: f32,
    phase_inc: f32,
    drive: f32,
}

impl ToneEngine {
    fn new(shared: SharedCurve, phase_inc: f32, drive: f32) -> Self {
        Self {
            shared,
            phase: 0.0,
            phase_inc,
            drive,
        }
    }

    fn render(&mut self, data: &mut [f32], channels: usize) {
        // Pick up curve edits once per callback, then render wait-free.
        self.shared.refresh();

        for frame in data.chunks_mut(channels) {
            let tone = (self.phase * std::f32::consts::TAU).sin();

            self.phase += self.phase_inc;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }

            let shaped = shaper::shape_driven(self.shared.curve(), tone, self.drive) * OUTPUT_GAIN;
            for out in frame.iter_mut() {
                *out = shaped;
            }
        }
    }
}
