use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{ProviderFailure, ProviderTranscript, TranscriptionProvider};
use crate::domain::{AudioSource, TranscriptSegment, TranscriptionRequest};

use super::audio_decoder::decode_to_pcm;

const CHUNK_SECONDS: f64 = 30.0;
const MAX_DECODE_TOKENS: usize = 224;

#[derive(Debug, thiserror::Error)]
#[error("local model unavailable: {0}")]
pub struct ModelLoadError(String);

/// Credential-free fallback backend running Whisper on CPU through Candle.
/// Weights are fetched from the Hugging Face hub once, at construction.
pub struct CandleWhisperProvider {
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
}

impl CandleWhisperProvider {
    pub fn new(model_id: &str) -> Result<Self, ModelLoadError> {
        let device = Device::Cpu;

        tracing::info!(
            device = ?device,
            model = model_id,
            "Loading local Whisper fallback model"
        );

        let api = Api::new().map_err(|e| ModelLoadError(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| ModelLoadError(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| ModelLoadError(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| ModelLoadError(format!("model.safetensors: {}", e)))?;

        let mel_repo = api.repo(Repo::new(
            "FL33TW00D-HF/whisper-base".to_string(),
            RepoType::Model,
        ));
        let mel_bytes_path = mel_repo
            .get("melfilters.bytes")
            .map_err(|e| ModelLoadError(format!("melfilters.bytes: {}", e)))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| ModelLoadError(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| ModelLoadError(format!("parse config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| ModelLoadError(format!("tokenizer: {}", e)))?;

        let mel_bytes = std::fs::read(&mel_bytes_path)
            .map_err(|e| ModelLoadError(format!("mel filters: {}", e)))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], m::DTYPE, &device)
                .map_err(|e| ModelLoadError(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| ModelLoadError(format!("model: {}", e)))?;

        tracing::info!("Local Whisper fallback model loaded");

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device,
            mel_filters,
        })
    }

    fn language_token(&self, language: &str) -> Option<u32> {
        let token = format!("<|{}|>", language);
        let id = self.tokenizer.token_to_id(&token);
        if id.is_none() {
            tracing::debug!(language, "Language token not in tokenizer vocabulary");
        }
        id
    }
}

#[async_trait]
impl TranscriptionProvider for CandleWhisperProvider {
    async fn attempt_transcribe(
        &self,
        data: &[u8],
        _source: &AudioSource,
        request: &TranscriptionRequest,
    ) -> Result<ProviderTranscript, ProviderFailure> {
        let decoded = decode_to_pcm(data)?;
        let duration_secs = decoded.duration_secs;

        let chunk_samples = m::N_SAMPLES;
        let mut mel_tensors = Vec::new();

        for (i, chunk) in decoded.samples.chunks(chunk_samples).enumerate() {
            let samples = if chunk.len() < chunk_samples {
                let mut padded = chunk.to_vec();
                padded.resize(chunk_samples, 0.0);
                padded
            } else {
                chunk.to_vec()
            };

            let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
            let n_mel = self.config.num_mel_bins;
            let n_frames = mel_data.len() / n_mel;

            let mel_tensor = Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
                .map_err(|e| ProviderFailure::Internal(format!("mel tensor: {}", e)))?;

            mel_tensors.push((i, mel_tensor));
        }

        let language_token = self.language_token(request.language());

        let mut segments: Vec<TranscriptSegment> = Vec::new();
        let mut model = self.model.lock().await;

        for (i, mel_tensor) in mel_tensors {
            tracing::debug!(chunk = i, "Transcribing audio chunk");
            let text = decode_chunk(
                &mut model,
                &self.tokenizer,
                &self.device,
                &mel_tensor,
                language_token,
            )?;
            if text.is_empty() {
                continue;
            }

            let start = i as f64 * CHUNK_SECONDS;
            let end = ((i + 1) as f64 * CHUNK_SECONDS).min(duration_secs);
            segments.push(TranscriptSegment { start, end, text });
        }

        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        tracing::info!(
            segments = segments.len(),
            chars = text.len(),
            duration_secs,
            "Local transcription completed"
        );

        Ok(ProviderTranscript {
            text,
            segments,
            language: Some(request.language().to_string()),
            duration_secs: Some(duration_secs),
        })
    }
}

fn decode_chunk(
    model: &mut m::model::Whisper,
    tokenizer: &Tokenizer,
    device: &Device,
    mel: &Tensor,
    language_token: Option<u32>,
) -> Result<String, ProviderFailure> {
    let sot_token = token_id(tokenizer, m::SOT_TOKEN)?;
    let transcribe_token = token_id(tokenizer, m::TRANSCRIBE_TOKEN)?;
    let no_timestamps_token = token_id(tokenizer, m::NO_TIMESTAMPS_TOKEN)?;
    let eot_token = token_id(tokenizer, m::EOT_TOKEN)?;

    let audio_features = model
        .encoder
        .forward(mel, true)
        .map_err(|e| ProviderFailure::Internal(format!("encoder: {}", e)))?;

    let mut tokens = vec![sot_token];
    if let Some(lang) = language_token {
        tokens.push(lang);
    }
    tokens.push(transcribe_token);
    tokens.push(no_timestamps_token);
    let prefix_len = tokens.len();

    let mut decoded_text = String::new();

    for _ in 0..MAX_DECODE_TOKENS {
        let token_tensor = Tensor::new(tokens.as_slice(), device)
            .map_err(|e| ProviderFailure::Internal(e.to_string()))?
            .unsqueeze(0)
            .map_err(|e| ProviderFailure::Internal(e.to_string()))?;

        let decoder_output = model
            .decoder
            .forward(&token_tensor, &audio_features, tokens.len() == prefix_len)
            .map_err(|e| ProviderFailure::Internal(format!("decoder: {}", e)))?;

        let logits = model
            .decoder
            .final_linear(
                &decoder_output
                    .squeeze(0)
                    .map_err(|e| ProviderFailure::Internal(e.to_string()))?,
            )
            .map_err(|e| ProviderFailure::Internal(format!("linear: {}", e)))?;

        let seq_len = logits
            .dim(0)
            .map_err(|e| ProviderFailure::Internal(e.to_string()))?;
        let last_logits = logits
            .get(seq_len - 1)
            .map_err(|e| ProviderFailure::Internal(e.to_string()))?;

        let next_token = last_logits
            .argmax(0)
            .map_err(|e| ProviderFailure::Internal(e.to_string()))?
            .to_scalar::<u32>()
            .map_err(|e| ProviderFailure::Internal(e.to_string()))?;

        if next_token == eot_token {
            break;
        }

        tokens.push(next_token);

        if let Some(piece) = tokenizer.id_to_token(next_token) {
            let piece = piece.replace("Ġ", " ").replace("▁", " ");
            decoded_text.push_str(&piece);
        }
    }

    model.reset_kv_cache();

    Ok(decoded_text.trim().to_string())
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, ProviderFailure> {
    tokenizer
        .token_to_id(token)
        .ok_or_else(|| ProviderFailure::Internal(format!("token not found: {}", token)))
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, ModelLoadError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(ModelLoadError(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    let filters: Vec<f32> = bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(filters)
}
