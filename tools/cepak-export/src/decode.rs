//! Asynchronous per-file decoding.
//!
//! Every input is read and decoded as its own task with an explicit result.
//! With `jobs == 1` files are handled strictly one after another; larger
//! values allow that many decodes in flight. Results always come back in
//! input order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::audio;
use crate::error::DecodeError;
use crate::source::{InputFile, SourceKind};
use crate::texture::{self, DecodedImage, Quantization};

/// How files are decoded.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub quantization: Quantization,
    /// Maximum decodes in flight. 1 = sequential.
    pub jobs: usize,
    pub timeout: Option<Duration>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            quantization: Quantization::default(),
            jobs: 1,
            timeout: None,
        }
    }
}

/// Values extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Image(DecodedImage),
    Audio(Vec<u8>),
}

impl Decoded {
    pub fn values(&self) -> &[u8] {
        match self {
            Decoded::Image(image) => &image.values,
            Decoded::Audio(bytes) => bytes,
        }
    }
}

/// Result for one input, tagged with the file it came from.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub name: String,
    pub kind: SourceKind,
    pub result: Result<Decoded, DecodeError>,
}

/// Read and decode a single input.
pub async fn decode_file(
    input: InputFile,
    options: &DecodeOptions,
) -> Result<Decoded, DecodeError> {
    let name = input.name();
    let quantization = options.quantization;

    let work = async move {
        let source = input.load().await?;
        match source.kind() {
            SourceKind::Image => {
                let name = source.name().to_string();
                let bytes = source.into_bytes();
                let decoded = tokio::task::spawn_blocking(move || {
                    texture::decode_intensities(&bytes, quantization)
                })
                .await
                .map_err(|e| DecodeError::Task {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
                decoded
                    .map(Decoded::Image)
                    .map_err(|source| DecodeError::Image { name, source })
            }
            // C has no empty initializer lists, so a 0-byte sound has nothing to emit
            SourceKind::Audio if source.bytes().is_empty() => Err(DecodeError::Empty {
                name: source.name().to_string(),
            }),
            SourceKind::Audio => Ok(Decoded::Audio(audio::decode_samples(source.into_bytes()))),
            SourceKind::Unknown => Err(DecodeError::Unsupported {
                name: source.name().to_string(),
            }),
        }
    };

    with_timeout(name, options.timeout, work).await
}

async fn with_timeout<F>(
    name: String,
    limit: Option<Duration>,
    work: F,
) -> Result<Decoded, DecodeError>
where
    F: Future<Output = Result<Decoded, DecodeError>>,
{
    match limit {
        Some(after) => tokio::time::timeout(after, work)
            .await
            .map_err(|_| DecodeError::Timeout { name, after })?,
        None => work.await,
    }
}

/// Decode every input, returning one outcome per input in input order.
pub async fn decode_all(inputs: Vec<InputFile>, options: &DecodeOptions) -> Vec<DecodeOutcome> {
    if options.jobs <= 1 {
        decode_sequential(inputs, options).await
    } else {
        decode_bounded(inputs, options).await
    }
}

async fn decode_sequential(inputs: Vec<InputFile>, options: &DecodeOptions) -> Vec<DecodeOutcome> {
    let mut outcomes = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.name();
        let kind = input.kind();
        let result = decode_file(input, options).await;
        log_outcome(&name, &result);
        outcomes.push(DecodeOutcome { name, kind, result });
    }
    outcomes
}

async fn decode_bounded(inputs: Vec<InputFile>, options: &DecodeOptions) -> Vec<DecodeOutcome> {
    let semaphore = Arc::new(Semaphore::new(options.jobs));
    let labels: Vec<(String, SourceKind)> = inputs.iter().map(|i| (i.name(), i.kind())).collect();
    let mut results: Vec<Option<Result<Decoded, DecodeError>>> =
        std::iter::repeat_with(|| None).take(inputs.len()).collect();

    let mut tasks = JoinSet::new();
    for (index, input) in inputs.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let options = options.clone();
        tasks.spawn(async move {
            let name = input.name();
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => decode_file(input, &options).await,
                Err(e) => Err(DecodeError::Task {
                    name,
                    message: e.to_string(),
                }),
            };
            (index, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => tracing::warn!("Decode task aborted: {}", e),
        }
    }

    labels
        .into_iter()
        .zip(results)
        .map(|((name, kind), result)| {
            let result = result.unwrap_or_else(|| {
                Err(DecodeError::Task {
                    name: name.clone(),
                    message: "task did not complete".to_string(),
                })
            });
            log_outcome(&name, &result);
            DecodeOutcome { name, kind, result }
        })
        .collect()
}

fn log_outcome(name: &str, result: &Result<Decoded, DecodeError>) {
    match result {
        Ok(Decoded::Image(image)) => tracing::debug!(
            "Decoded image {} ({}x{}, {} values)",
            name,
            image.width,
            image.height,
            image.values.len()
        ),
        Ok(Decoded::Audio(bytes)) => {
            tracing::debug!("Decoded audio {} ({} bytes)", name, bytes.len())
        }
        Err(e) => tracing::debug!("Decode failed for {}: {}", name, e),
    }
}
