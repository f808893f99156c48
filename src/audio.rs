//! Audio playback using the Web Audio API
//!
//! Tracks are fetched and decoded once at startup. The simulation never calls
//! in here directly; the frame loop drains its `AudioCommand`s and hands them
//! to `AudioPlayer::apply`.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, AudioScheduledSourceNode, GainNode};

use crate::assets::{AssetError, fetch_bytes};
use crate::sim::{AudioCommand, Track};

/// A playing track: its source and the gain node it runs through
struct Voice {
    source: AudioBufferSourceNode,
    gain: GainNode,
}

impl Voice {
    fn scheduled(&self) -> &AudioScheduledSourceNode {
        self.source.as_ref()
    }
}

/// Audio manager for the game
pub struct AudioPlayer {
    ctx: Option<AudioContext>,
    buffers: HashMap<Track, AudioBuffer>,
    voices: HashMap<Track, Voice>,
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            buffers: HashMap::new(),
            voices: HashMap::new(),
        }
    }

    /// Fetch and decode every track. Without an audio context there is
    /// nothing to decode into, so nothing is fetched.
    pub async fn load_tracks(&mut self) -> Result<(), AssetError> {
        let Some(ctx) = self.ctx.clone() else {
            return Ok(());
        };
        for track in Track::ALL {
            let path = track.file();
            let audio_error = |e: wasm_bindgen::JsValue| AssetError::Audio {
                path: path.to_string(),
                message: format!("{e:?}"),
            };

            let bytes = fetch_bytes(path).await?;
            let data = js_sys::Uint8Array::from(bytes.as_slice()).buffer();
            let decoded = JsFuture::from(ctx.decode_audio_data(&data).map_err(audio_error)?)
                .await
                .map_err(audio_error)?;
            let buffer: AudioBuffer = decoded.dyn_into().map_err(audio_error)?;
            self.buffers.insert(track, buffer);
        }
        log::info!("Loaded {} audio tracks", self.buffers.len());
        Ok(())
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx
            && ctx.state() == web_sys::AudioContextState::Suspended
        {
            let _ = ctx.resume();
        }
    }

    /// Execute one command from the simulation
    pub fn apply(&mut self, command: &AudioCommand) {
        match *command {
            AudioCommand::Play {
                track,
                looped,
                volume,
            } => self.play(track, looped, volume),
            AudioCommand::SetVolume { track, volume } => {
                if let Some(voice) = self.voices.get(&track) {
                    voice.gain.gain().set_value(volume);
                }
            }
            AudioCommand::FadeOut { track, ms } => self.fade_out(track, ms),
            AudioCommand::Stop { track } => self.stop(track),
            AudioCommand::StopAll => {
                let tracks: Vec<Track> = self.voices.keys().copied().collect();
                for track in tracks {
                    self.stop(track);
                }
            }
        }
    }

    fn play(&mut self, track: Track, looped: bool, volume: f32) {
        self.stop(track);
        let Some(ctx) = &self.ctx else { return };
        let Some(buffer) = self.buffers.get(&track) else {
            log::warn!("Track {track:?} not loaded");
            return;
        };
        self.resume();

        let Ok(source) = ctx.create_buffer_source() else { return };
        let Ok(gain) = ctx.create_gain() else { return };
        source.set_buffer(Some(buffer));
        source.set_loop(looped);
        gain.gain().set_value(volume);

        let _ = source.connect_with_audio_node(&gain);
        let _ = gain.connect_with_audio_node(&ctx.destination());

        let voice = Voice { source, gain };
        let _ = voice.scheduled().start();
        self.voices.insert(track, voice);
    }

    fn fade_out(&mut self, track: Track, ms: u32) {
        let Some(ctx) = &self.ctx else { return };
        let Some(voice) = self.voices.get(&track) else { return };

        let now = ctx.current_time();
        let end = now + f64::from(ms) / 1000.0;
        let param = voice.gain.gain();
        let _ = param.set_value_at_time(param.value(), now);
        let _ = param.linear_ramp_to_value_at_time(0.0, end);
        let _ = voice.scheduled().stop_with_when(end);
    }

    fn stop(&mut self, track: Track) {
        if let Some(voice) = self.voices.remove(&track) {
            let _ = voice.scheduled().stop();
            let _ = voice.gain.disconnect();
        }
    }
}
