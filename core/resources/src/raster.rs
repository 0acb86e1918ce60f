use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use wde_logger::{debug, warn};
use wde_terrain::ElevationGrid;

use crate::LoadError;

/// First image of a (Geo)TIFF raster, samples converted to `f32`.
#[derive(Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    bands: usize,
    /// Interleaved samples, no-data values replaced by NaN.
    samples: Vec<f32>,
    nodata: Option<f64>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bands", &self.bands)
            .field("nodata", &self.nodata)
            .finish()
    }
}

fn mask(value: f64, nodata: Option<f64>) -> f32 {
    match nodata {
        Some(n) if value == n || (value as f32) == (n as f32) => f32::NAN,
        Some(n) if n.is_nan() && value.is_nan() => f32::NAN,
        _ => value as f32,
    }
}

macro_rules! convert {
    ($data:expr, $nodata:expr) => {
        $data.into_iter().map(|v| mask(v as f64, $nodata)).collect::<Vec<f32>>()
    };
}

impl RasterImage {
    /// Decode the first image directory of a TIFF file.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Content of the TIFF file.
    ///
    /// # Errors
    ///
    /// * `LoadError::Decode` - The content is not a readable TIFF image.
    #[tracing::instrument(skip(bytes), fields(size = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut decoder = Decoder::new(Cursor::new(bytes))?.with_limits(Limits::unlimited());
        let (width, height) = decoder.dimensions()?;

        // GDAL stores the no-data value as an ASCII string
        let nodata = decoder.get_tag_ascii_string(Tag::GdalNodata).ok()
            .and_then(|value| value.trim().trim_end_matches('\0').parse::<f64>().ok());

        let samples = match decoder.read_image()? {
            DecodingResult::U8(data) => convert!(data, nodata),
            DecodingResult::U16(data) => convert!(data, nodata),
            DecodingResult::U32(data) => convert!(data, nodata),
            DecodingResult::U64(data) => convert!(data, nodata),
            DecodingResult::I8(data) => convert!(data, nodata),
            DecodingResult::I16(data) => convert!(data, nodata),
            DecodingResult::I32(data) => convert!(data, nodata),
            DecodingResult::I64(data) => convert!(data, nodata),
            DecodingResult::F32(data) => convert!(data, nodata),
            DecodingResult::F64(data) => convert!(data, nodata),
            #[allow(unreachable_patterns)]
            _ => return Err(LoadError::Decode("Unsupported sample format.".to_string())),
        };

        let pixels = width as usize * height as usize;
        if pixels == 0 || samples.len() < pixels {
            return Err(LoadError::Decode(format!(
                "{} samples for a {}x{} image.", samples.len(), width, height
            )));
        }
        let bands = samples.len() / pixels;
        debug!(width, height, bands, nodata, "Decoded raster image.");

        Ok(RasterImage { width, height, bands, samples, nodata })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples per pixel.
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Declared no-data value, if any.
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// Read the first band as an elevation grid of `height` rows and `width` columns.
    pub fn read_samples(&self) -> Result<ElevationGrid, LoadError> {
        if self.bands > 1 {
            warn!(bands = self.bands, "Raster has several bands, only the first one is used.");
        }

        let pixels = self.width as usize * self.height as usize;
        let first_band = self.samples.iter()
            .step_by(self.bands.max(1))
            .take(pixels)
            .copied()
            .collect();

        Ok(ElevationGrid::new(self.height as usize, self.width as usize, first_band)?)
    }
}


#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tiff::encoder::{colortype, TiffEncoder};

    /// Encode a single band float TIFF.
    pub(crate) fn float_tiff(width: u32, height: u32, data: &[f32], nodata: Option<&str>) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut bytes).unwrap();
            let mut image = encoder.new_image::<colortype::Gray32Float>(width, height).unwrap();
            if let Some(nodata) = nodata {
                image.encoder().write_tag(Tag::GdalNodata, nodata).unwrap();
            }
            image.write_data(data).unwrap();
        }
        bytes.into_inner()
    }

    #[test]
    fn decodes_single_band_float() {
        let data = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0];
        let image = RasterImage::decode(&float_tiff(3, 2, &data, None)).unwrap();
        assert_eq!((image.width(), image.height(), image.bands()), (3, 2, 1));
        assert_eq!(image.nodata(), None);

        let grid = image.read_samples().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert_eq!(grid.samples(), &data);
        assert_eq!(grid.get(1, 0), Some(30.0));
    }

    #[test]
    fn keeps_first_band_only() {
        let data: Vec<u8> = vec![
            1, 100, 200, 2, 101, 201,
            3, 102, 202, 4, 103, 203,
        ];
        let mut bytes = Cursor::new(Vec::new());
        TiffEncoder::new(&mut bytes).unwrap()
            .write_image::<colortype::RGB8>(2, 2, &data).unwrap();

        let image = RasterImage::decode(bytes.get_ref()).unwrap();
        assert_eq!(image.bands(), 3);
        assert_eq!(image.read_samples().unwrap().samples(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn converts_integer_samples() {
        let data: Vec<u16> = vec![0, 500, 1000, 65535];
        let mut bytes = Cursor::new(Vec::new());
        TiffEncoder::new(&mut bytes).unwrap()
            .write_image::<colortype::Gray16>(2, 2, &data).unwrap();

        let grid = RasterImage::decode(bytes.get_ref()).unwrap().read_samples().unwrap();
        assert_eq!(grid.samples(), &[0.0, 500.0, 1000.0, 65535.0]);
    }

    #[test]
    fn nodata_becomes_nan() {
        let data = [-9999.0, 12.5, 8.0, -9999.0];
        let image = RasterImage::decode(&float_tiff(2, 2, &data, Some("-9999"))).unwrap();
        assert_eq!(image.nodata(), Some(-9999.0));

        let grid = image.read_samples().unwrap();
        assert!(grid.get(0, 0).unwrap().is_nan());
        assert!(grid.get(1, 1).unwrap().is_nan());
        assert_eq!(grid.get(0, 1), Some(12.5));
        assert_eq!(grid.range().min, 8.0);
    }

    #[test]
    fn nodata_sentinel_does_not_stretch_range() {
        let data = [-32768.0, 100.0, 140.0, 120.0];
        let image = RasterImage::decode(&float_tiff(2, 2, &data, Some("-32768"))).unwrap();
        assert_eq!(image.nodata(), Some(-32768.0));

        let range = image.read_samples().unwrap().range();
        assert_eq!((range.min, range.max), (100.0, 140.0));
    }

    #[test]
    fn garbage_is_decode_error() {
        let res = RasterImage::decode(b"definitely not a tiff file");
        assert!(matches!(res, Err(LoadError::Decode(_))));

        let res = RasterImage::decode(&[]);
        assert!(matches!(res, Err(LoadError::Decode(_))));
    }
}
