//! # inksign Renderer
//!
//! Pixel work for the signing flow: the raster surface the signature is drawn
//! on, rasterization of the whole contract, and PDF composition.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ PixmapSurface│──▶│ SVG layout   │──▶│ resvg raster │──▶ PDF (A4)
//! │ (signature)  │   │ (document)   │   │ (2x upscale) │
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use export::{
    fit_to_page, ContractRenderer, DocumentExporter, ExportConfig, PagePlacement, RasterImage,
    RenderedContract,
};
pub use surface::{PixmapSurface, SignatureImage};
