//! Portrait session wrapper exposed to JavaScript.

use anyhow::Context;
use phase_core::config::PortraitConfig;
use phase_core::playback::PlaybackState;
use phase_core::portrait::PhasePortrait;
use phase_core::Point2;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmPhasePortrait {
    portrait: PhasePortrait,
}

impl WasmPhasePortrait {
    fn build(config: &PortraitConfig, width: f64, height: f64) -> anyhow::Result<Self> {
        let portrait = PhasePortrait::from_config(config, width, height)
            .with_context(|| format!("Failed to build a {width}x{height} phase portrait"))?;
        log::debug!(
            "portrait ready: {} field samples, dt={}",
            portrait.field().samples().len(),
            portrait.playback().dt()
        );
        Ok(Self { portrait })
    }
}

fn flatten(points: impl IntoIterator<Item = Point2>) -> Vec<f64> {
    points.into_iter().flat_map(|p| [p.x, p.y]).collect()
}

fn serialize<T: serde::Serialize>(value: &T, what: &str) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Failed to serialize {what}: {e}")))
}

#[wasm_bindgen]
impl WasmPhasePortrait {
    /// `config` is a plain object in `PortraitConfig` shape; missing fields
    /// take their defaults, `undefined` or `null` means all defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, width: f64, height: f64) -> Result<WasmPhasePortrait, JsValue> {
        console_error_panic_hook::set_once();

        let config: PortraitConfig = if config.is_undefined() || config.is_null() {
            PortraitConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid portrait config: {e}")))?
        };

        Self::build(&config, width, height).map_err(|e| JsValue::from_str(&format!("{e:#}")))
    }

    pub fn with_defaults(width: f64, height: f64) -> Result<WasmPhasePortrait, JsValue> {
        console_error_panic_hook::set_once();
        Self::build(&PortraitConfig::default(), width, height)
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))
    }

    /// Press at a canvas pixel (origin top-left). Returns whether it armed.
    pub fn pointer_pressed(&mut self, x: f64, y: f64) -> bool {
        self.portrait.pointer_pressed(x, y)
    }

    /// Starts playback from the armed point. Returns false when nothing is armed.
    pub fn confirm(&mut self) -> Result<bool, JsValue> {
        self.portrait
            .confirm()
            .map_err(|e| JsValue::from_str(&format!("Simulation failed: {e}")))
    }

    pub fn advance_frame(&mut self) -> u32 {
        self.portrait.advance_frame() as u32
    }

    pub fn state(&self) -> String {
        match self.portrait.state() {
            PlaybackState::Idle => "idle",
            PlaybackState::Armed => "armed",
            PlaybackState::Revealing => "revealing",
            PlaybackState::Done => "done",
        }
        .to_string()
    }

    /// Surface-space arrows as `[tail.x, tail.y, head.x, head.y, ...]`.
    pub fn field_arrows(&self) -> Vec<f64> {
        self.portrait
            .field()
            .samples()
            .iter()
            .flat_map(|s| [s.tail.x, s.tail.y, s.head.x, s.head.y])
            .collect()
    }

    /// Arrow colors as `[r, g, b, ...]`, aligned with `field_arrows`.
    pub fn field_colors(&self) -> Vec<u8> {
        self.portrait
            .field()
            .samples()
            .iter()
            .flat_map(|s| [s.color.r, s.color.g, s.color.b])
            .collect()
    }

    pub fn field_samples(&self) -> Result<JsValue, JsValue> {
        serialize(&self.portrait.field().samples(), "field samples")
    }

    /// Revealed trajectory in surface space as `[x0, y0, x1, y1, ...]`.
    pub fn revealed_path(&self) -> Vec<f64> {
        flatten(self.portrait.revealed_path())
    }

    /// Surface position of the armed point, empty when nothing is armed.
    pub fn pending_marker(&self) -> Vec<f64> {
        flatten(self.portrait.pending_marker())
    }

    /// Bob offset from the pivot (y down), empty for non-pendulum models.
    pub fn bob_position(&self) -> Vec<f64> {
        flatten(self.portrait.bob_position())
    }

    pub fn grid_lines(&self) -> Result<JsValue, JsValue> {
        serialize(&self.portrait.grid_lines(), "grid lines")
    }

    pub fn tick_labels(&self) -> Result<JsValue, JsValue> {
        serialize(&self.portrait.tick_labels(), "tick labels")
    }

    pub fn to_surface(&self, x: f64, y: f64) -> Vec<f64> {
        flatten([self.portrait.space().to_surface(Point2::new(x, y))])
    }

    pub fn to_math(&self, x: f64, y: f64) -> Vec<f64> {
        flatten([self.portrait.space().to_math(Point2::new(x, y))])
    }
}
