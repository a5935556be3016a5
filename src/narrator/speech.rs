//! Gemini text-to-speech narration.
//!
//! The TTS endpoint answers with base64 16-bit little-endian PCM, mono, at
//! 24 kHz. Each message becomes a WAV file under the configured directory and
//! is optionally handed to an external player command.

use super::{NarrationError, Narrator};
use crate::config::NarrationConfig;
use crate::llm_client::{LlmError, send_json};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

const GEMINI_TTS_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Sample rate of Gemini TTS output.
pub const TTS_SAMPLE_RATE: u32 = 24_000;

const MAX_GAIN: f32 = 4.0;

/// Narrator backed by Gemini speech synthesis.
pub struct SpeechNarrator {
    http: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
    output_dir: PathBuf,
    player_command: Vec<String>,
    gain: f32,
    utterances: AtomicU64,
}

impl SpeechNarrator {
    /// Creates a narrator from narration settings.
    #[instrument(skip(api_key, config), fields(model = %config.model(), voice = %config.voice()))]
    pub fn new(api_key: String, config: &NarrationConfig) -> Self {
        info!("Creating speech narrator");
        let gain = *config.gain();
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: config.model().clone(),
            voice: config.voice().clone(),
            output_dir: config.output_dir().clone(),
            player_command: config.player_command().clone(),
            gain: if gain.is_finite() { gain.clamp(0.0, MAX_GAIN) } else { 1.0 },
            utterances: AtomicU64::new(0),
        }
    }

    /// Requests audio for `text` and returns the raw PCM bytes.
    #[instrument(skip(self, text), fields(text_length = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, NarrationError> {
        let request_body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.voice }
                    }
                }
            }
        });

        let request = self
            .http
            .post(format!("{}/{}:generateContent", GEMINI_TTS_URL, self.model))
            .header("x-goog-api-key", self.api_key.clone())
            .json(&request_body);
        let response = send_json(request, "Gemini TTS").await?;

        let data = inline_audio(&response)
            .ok_or_else(|| NarrationError::new("No audio data in TTS response"))?;
        let pcm = STANDARD
            .decode(data)
            .map_err(|e| NarrationError::new(format!("Invalid base64 audio: {}", e)))?;
        debug!(bytes = pcm.len(), "Decoded TTS audio");
        Ok(pcm)
    }

    /// Runs the configured player on `path`.
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn play(&self, path: &Path) -> Result<(), NarrationError> {
        let Some((program, args)) = self.player_command.split_first() else {
            debug!("No player command configured");
            return Ok(());
        };

        let status = tokio::process::Command::new(program)
            .args(args)
            .arg(path)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|e| NarrationError::new(format!("Failed to run {}: {}", program, e)))?;

        if !status.success() {
            return Err(NarrationError::new(format!(
                "Player {} exited with {}",
                program, status
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SpeechNarrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechNarrator")
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("output_dir", &self.output_dir)
            .field("player_command", &self.player_command)
            .field("gain", &self.gain)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Narrator for SpeechNarrator {
    #[instrument(skip(self), fields(output_dir = %self.output_dir.display()))]
    async fn start(&self) -> Result<(), NarrationError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| NarrationError::new(format!("Failed to create output dir: {}", e)))?;
        info!("Speech narrator ready");
        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn speak(&self, text: &str) -> Result<(), NarrationError> {
        let pcm = self.synthesize(text).await?;
        let samples = pcm_to_samples(&pcm, self.gain);

        let index = self.utterances.fetch_add(1, Ordering::Relaxed) + 1;
        let path = self.output_dir.join(format!("oracle-{:04}.wav", index));
        let wav_path = path.clone();
        tokio::task::spawn_blocking(move || write_wav(&wav_path, &samples))
            .await
            .map_err(|e| NarrationError::new(format!("WAV writer task failed: {}", e)))??;
        info!(path = %path.display(), "Narration written");

        self.play(&path).await
    }

    #[instrument(skip(self))]
    async fn dispose(&self) {
        let spoken = self.utterances.load(Ordering::Relaxed);
        info!(spoken, "Speech narrator disposed");
    }
}

/// Finds the first inline audio payload in a Gemini response.
fn inline_audio(response: &Value) -> Option<&str> {
    response["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .find_map(|part| part["inlineData"]["data"].as_str())
}

/// Decodes 16-bit little-endian PCM and applies `gain`, saturating at the sample limits.
///
/// A trailing odd byte is dropped.
pub fn pcm_to_samples(pcm: &[u8], gain: f32) -> Vec<i16> {
    pcm.chunks_exact(2)
        .map(|pair| {
            let sample = f32::from(i16::from_le_bytes([pair[0], pair[1]])) * gain;
            sample.clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
        })
        .collect()
}

fn write_wav(path: &Path, samples: &[i16]) -> Result<(), NarrationError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TTS_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| NarrationError::new(format!("Failed to create WAV: {}", e)))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| NarrationError::new(format!("Failed to write sample: {}", e)))?;
    }
    writer
        .finalize()
        .map_err(|e| NarrationError::new(format!("Failed to finalize WAV: {}", e)))
}

impl From<LlmError> for NarrationError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        warn!(error = %err, "TTS request failed");
        Self::new(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_decodes_little_endian() {
        let pcm = [0x01, 0x00, 0xff, 0xff, 0x00, 0x80];
        assert_eq!(pcm_to_samples(&pcm, 1.0), vec![1, -1, i16::MIN]);
    }

    #[test]
    fn gain_saturates() {
        let pcm = 20_000i16.to_le_bytes();
        assert_eq!(pcm_to_samples(&pcm, 2.0), vec![i16::MAX]);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        assert_eq!(pcm_to_samples(&[0x02, 0x00, 0x07], 1.0).len(), 1);
    }

    #[test]
    fn inline_audio_found_in_later_part() {
        let response = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "ignored" },
                { "inlineData": { "mimeType": "audio/L16", "data": "AAA=" } }
            ] } }]
        });
        assert_eq!(inline_audio(&response), Some("AAA="));
    }

    #[test]
    fn wav_round_trips_through_hound() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.wav");
        write_wav(&path, &[0, 100, -100]).expect("write");
        let reader = hound::WavReader::open(&path).expect("open");
        assert_eq!(reader.spec().sample_rate, TTS_SAMPLE_RATE);
        assert_eq!(reader.len(), 3);
    }
}
