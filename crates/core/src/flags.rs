//! Per-pixel classification flags
//!
//! Every pixel carries exactly one base class (land, ocean or invalid) and an
//! independent cloud bit. Inside the engine flags are always the tagged
//! [`PixelFlag`]; the integer encoding exists only for handing flags to and
//! from a host framework.

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Base class of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelClass {
    Land,
    Ocean,
    /// Inputs were missing or not finite
    #[default]
    Invalid,
}

/// Classification of one pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelFlag {
    pub class: PixelClass,
    pub cloud: bool,
}

impl PixelFlag {
    /// Bit set for land pixels in the host encoding
    pub const LAND_BIT: u8 = 1;
    /// Bit set for ocean pixels in the host encoding
    pub const OCEAN_BIT: u8 = 2;
    /// Bit set for invalid pixels in the host encoding
    pub const INVALID_BIT: u8 = 4;
    /// Bit set for cloudy pixels in the host encoding
    pub const CLOUD_BIT: u8 = 8;

    pub const INVALID: PixelFlag = PixelFlag {
        class: PixelClass::Invalid,
        cloud: false,
    };

    pub fn new(class: PixelClass, cloud: bool) -> Self {
        Self { class, cloud }
    }

    pub fn land() -> Self {
        Self::new(PixelClass::Land, false)
    }

    pub fn ocean() -> Self {
        Self::new(PixelClass::Ocean, false)
    }

    /// Encode as `LAND=1, OCEAN=2, INVALID=4` plus `CLOUD=8`
    pub fn to_bits(self) -> u8 {
        let base = match self.class {
            PixelClass::Land => Self::LAND_BIT,
            PixelClass::Ocean => Self::OCEAN_BIT,
            PixelClass::Invalid => Self::INVALID_BIT,
        };
        if self.cloud { base | Self::CLOUD_BIT } else { base }
    }

    /// Decode the host encoding.
    ///
    /// Exactly one base bit must be set; anything else is rejected.
    pub fn from_bits(bits: u8) -> Result<Self> {
        let cloud = bits & Self::CLOUD_BIT != 0;
        let class = match bits & !Self::CLOUD_BIT {
            Self::LAND_BIT => PixelClass::Land,
            Self::OCEAN_BIT => PixelClass::Ocean,
            Self::INVALID_BIT => PixelClass::Invalid,
            _ => {
                return Err(Error::invalid_parameter(
                    "flag",
                    bits,
                    "exactly one of LAND, OCEAN, INVALID must be set",
                ));
            }
        };
        Ok(Self { class, cloud })
    }

    /// Whether a sample carrying this flag may be used under `rule`
    pub fn is_valid(self, rule: ValidPixels) -> bool {
        match rule {
            ValidPixels::OceanClear => self.class == PixelClass::Ocean && !self.cloud,
            ValidPixels::Clear => self.class != PixelClass::Invalid && !self.cloud,
            ValidPixels::Any => self.class != PixelClass::Invalid,
        }
    }
}

/// Which flags mark a sample as usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidPixels {
    /// Cloud-free ocean only (sea surface temperature fronts)
    #[default]
    OceanClear,
    /// Cloud-free land or ocean
    Clear,
    /// Anything that is not invalid, clouds included
    Any,
}

/// Pixel counts per class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationSummary {
    pub land: usize,
    pub ocean: usize,
    pub invalid: usize,
    pub cloudy: usize,
}

/// A rows×cols grid of [`PixelFlag`]s, companion of a sample [`Raster`]
#[derive(Debug, Clone, PartialEq)]
pub struct FlagRaster {
    data: Array2<PixelFlag>,
}

impl FlagRaster {
    /// Every pixel set to `flag`
    pub fn all(rows: usize, cols: usize, flag: PixelFlag) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), flag),
        }
    }

    pub fn from_array(data: Array2<PixelFlag>) -> Self {
        Self { data }
    }

    /// Decode a host-encoded flag band
    pub fn from_bits(bits: &Raster<u8>) -> Result<Self> {
        let mut flags = Vec::with_capacity(bits.len());
        for &b in bits.data().iter() {
            flags.push(PixelFlag::from_bits(b)?);
        }
        let data = Array2::from_shape_vec(bits.shape(), flags)
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Self { data })
    }

    /// Encode for a host flag band
    pub fn to_bits(&self) -> Raster<u8> {
        Raster::from_array(self.data.mapv(PixelFlag::to_bits))
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array2<PixelFlag> {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Result<PixelFlag> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    pub fn set(&mut self, row: usize, col: usize, flag: PixelFlag) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.data.get_mut((row, col)) {
            Some(f) => {
                *f = flag;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds { row, col, rows, cols }),
        }
    }

    /// Whether the flag at (row, col) is usable under `rule`; out of bounds is invalid
    pub fn is_valid(&self, row: usize, col: usize, rule: ValidPixels) -> bool {
        self.data
            .get((row, col))
            .is_some_and(|f| f.is_valid(rule))
    }

    /// Number of pixels usable under `rule`
    pub fn valid_count(&self, rule: ValidPixels) -> usize {
        self.data.iter().filter(|f| f.is_valid(rule)).count()
    }

    /// Fail with [`Error::SizeMismatch`] unless `raster` has this shape
    pub fn check_matches<T: RasterElement>(&self, raster: &Raster<T>) -> Result<()> {
        crate::raster::check_shape(self.shape(), raster.shape())
    }

    /// Copy of `raster` with every sample not usable under `rule` set to `NaN`
    pub fn mask_invalid(&self, raster: &Raster<f64>, rule: ValidPixels) -> Result<Raster<f64>> {
        self.check_matches(raster)?;
        let mut out = raster.clone();
        out.data_mut()
            .zip_mut_with(&self.data, |v, f| {
                if !f.is_valid(rule) {
                    *v = f64::NAN;
                }
            });
        out.set_nodata(Some(f64::NAN));
        Ok(out)
    }

    pub fn summary(&self) -> ClassificationSummary {
        let mut s = ClassificationSummary::default();
        for f in self.data.iter() {
            match f.class {
                PixelClass::Land => s.land += 1,
                PixelClass::Ocean => s.ocean += 1,
                PixelClass::Invalid => s.invalid += 1,
            }
            if f.cloud {
                s.cloudy += 1;
            }
        }
        s
    }
}
