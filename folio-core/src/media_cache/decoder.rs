//! Turning fetched bytes into displayable media.

use std::fmt;

use folio_model::MediaUri;
use image::{DynamicImage, GenericImageView};

use crate::error::MediaError;

/// A fetched and decoded image.
#[derive(Clone)]
pub struct DecodedMedia {
    /// Resource the bytes came from.
    pub uri: MediaUri,
    /// Width in px.
    pub width: u32,
    /// Height in px.
    pub height: u32,
    /// Size of the encoded payload.
    pub encoded_len: usize,
    /// Decoded pixels.
    pub image: DynamicImage,
}

impl fmt::Debug for DecodedMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedMedia")
            .field("uri", &self.uri)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("encoded_len", &self.encoded_len)
            .finish()
    }
}

/// Decodes fetched bytes. Runs on the event loop, so keep it to a single
/// decode with no I/O.
pub trait MediaDecoder: Send + Sync {
    /// Decode `bytes` fetched from `uri`.
    fn decode(
        &self,
        uri: &MediaUri,
        bytes: &[u8],
    ) -> Result<DecodedMedia, MediaError>;
}

/// Decoder backed by the `image` crate; format is sniffed from the bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl MediaDecoder for ImageDecoder {
    fn decode(
        &self,
        uri: &MediaUri,
        bytes: &[u8],
    ) -> Result<DecodedMedia, MediaError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| MediaError::Decode {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;
        let (width, height) = image.dimensions();

        Ok(DecodedMedia {
            uri: uri.clone(),
            width,
            height,
            encoded_len: bytes.len(),
            image,
        })
    }
}
