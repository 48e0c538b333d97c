//! One conversion request, end to end.
//!
//! inputs -> decode -> catalog -> project generation -> archive. Each request
//! owns its inputs and catalog; nothing is shared between requests.

use cepak_shared::CE_BUNDLE_FORMAT;
use serde::Serialize;

use crate::archive::Archiver;
use crate::catalog::{
    AssetCatalog, AssetRole, CatalogBuilder, CatalogOrigin, Dimensions, EncodeOptions,
};
use crate::decode::{self, DecodeOptions, DecodeOutcome};
use crate::error::{BundleError, DecodeError, Diagnostic};
use crate::project::{BundleLayout, ProjectBundle, SkeletonOptions};
use crate::source::InputFile;

/// What to convert.
#[derive(Debug, Clone)]
pub enum ConversionRequest {
    /// No inputs were supplied; use the demo assets.
    Demo,
    /// Convert these files, in this order.
    FromInputs(Vec<InputFile>),
}

impl ConversionRequest {
    /// `Demo` exactly when `inputs` is empty.
    pub fn new(inputs: Vec<InputFile>) -> Self {
        if inputs.is_empty() {
            ConversionRequest::Demo
        } else {
            ConversionRequest::FromInputs(inputs)
        }
    }
}

/// Every knob of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub project_name: String,
    pub decode: DecodeOptions,
    pub encode: EncodeOptions,
    pub skeleton: SkeletonOptions,
    pub layout: BundleLayout,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            project_name: CE_BUNDLE_FORMAT.default_project.to_string(),
            decode: DecodeOptions::default(),
            encode: EncodeOptions::default(),
            skeleton: SkeletonOptions::default(),
            layout: BundleLayout::default(),
        }
    }
}

/// A finished request.
#[derive(Debug)]
pub struct Conversion {
    pub catalog: AssetCatalog,
    pub bundle: ProjectBundle,
    /// Packaged bundle bytes.
    pub archive: Vec<u8>,
    /// Name the bundle is offered under, e.g. `ti84_full_game.8pk`.
    pub file_name: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decode the request's inputs and catalog them.
///
/// Fails only when there were recognized inputs and every one of them failed.
pub async fn build_catalog(
    request: ConversionRequest,
    options: &ConvertOptions,
) -> Result<(AssetCatalog, Vec<Diagnostic>), BundleError> {
    let inputs = match request {
        ConversionRequest::Demo => {
            tracing::info!("No input files, using demo assets");
            return Ok((AssetCatalog::demo(), Vec::new()));
        }
        ConversionRequest::FromInputs(inputs) => inputs,
    };

    let mut builder = CatalogBuilder::new(&options.encode);
    let mut recognized = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.kind().is_recognized() {
            recognized.push(input);
        } else {
            builder.skip_unrecognized(&input.name());
        }
    }

    let attempted = recognized.len();
    let outcomes: Vec<DecodeOutcome> = decode::decode_all(recognized, &options.decode).await;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    for outcome in outcomes {
        builder.push(outcome);
    }

    if attempted > 0 && failed == attempted {
        return Err(BundleError::AllInputsFailed { failed });
    }

    Ok(builder.finish())
}

/// Run a whole request and package the result.
pub async fn convert<A: Archiver + ?Sized>(
    request: ConversionRequest,
    options: &ConvertOptions,
    archiver: &A,
) -> Result<Conversion, BundleError> {
    let (catalog, diagnostics) = build_catalog(request, options).await?;

    let bundle = ProjectBundle::generate(&catalog, &options.skeleton, &options.layout);
    let archive = archiver.package(&bundle.entries())?;
    let file_name = CE_BUNDLE_FORMAT.download_name(&options.project_name);

    tracing::info!(
        "Bundled {} sprite(s), {} sound(s) into {} ({} bytes)",
        catalog.sprites().len(),
        catalog.sounds().len(),
        file_name,
        archive.len()
    );

    Ok(Conversion {
        catalog,
        bundle,
        archive,
        file_name,
        diagnostics,
    })
}

/// Encode a single file to its C source, as it would appear in a bundle.
pub async fn encode_file(
    input: InputFile,
    options: &ConvertOptions,
) -> Result<String, DecodeError> {
    let name = input.name();
    let kind = input.kind();
    if !kind.is_recognized() {
        return Err(DecodeError::Unsupported { name });
    }

    let decoded = decode::decode_file(input, &options.decode).await?;
    let outcome = DecodeOutcome {
        name: name.clone(),
        kind,
        result: Ok(decoded),
    };
    let (catalog, mut diagnostics) = AssetCatalog::from_outcomes(vec![outcome], &options.encode);
    match catalog.assets().next() {
        Some(asset) => Ok(asset.text.clone()),
        None => Err(DecodeError::Task {
            name,
            message: diagnostics
                .pop()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "nothing encoded".to_string()),
        }),
    }
}

/// Serializable summary of a conversion.
#[derive(Debug, Serialize)]
pub struct ConversionReport {
    pub bundle: String,
    pub origin: CatalogOrigin,
    pub assets: Vec<AssetSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct AssetSummary {
    pub symbol: String,
    pub role: AssetRole,
    pub file: String,
    pub source: Option<String>,
    pub values: usize,
    pub size: Option<Dimensions>,
}

impl Conversion {
    pub fn report(&self, layout: &BundleLayout) -> ConversionReport {
        ConversionReport {
            bundle: self.file_name.clone(),
            origin: self.catalog.origin(),
            assets: self
                .catalog
                .assets()
                .map(|asset| AssetSummary {
                    symbol: asset.symbol.clone(),
                    role: asset.role,
                    file: layout.asset_path(asset),
                    source: asset.origin_file.clone(),
                    values: asset.values.len(),
                    size: asset.size,
                })
                .collect(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}
