//! Mapper configuration, loaded from YAML.
//!
//! ```yaml
//! sensor_mount:
//!   translation: [0.0, 0.0, 0.6]
//!   rotation: [0.5, -0.5, 0.5, -0.5]   # w, x, y, z
//! voxel_size: 0.01
//! ```
//!
//! Every key is optional; missing keys take the defaults above (no
//! downsampling unless `voxel_size` is given).

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use nalgebra::Vector3;
use serde::Deserialize;

use crate::geometry::frames::DEFAULT_MOUNT_HEIGHT;
use crate::geometry::{SE3, SensorMount};

/// Sensor mount as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// Sensor position in the body frame (meters).
    pub translation: [f64; 3],
    /// Sensor orientation in the body frame, quaternion `[w, x, y, z]`.
    pub rotation: [f64; 4],
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0, DEFAULT_MOUNT_HEIGHT],
            rotation: [0.5, -0.5, 0.5, -0.5],
        }
    }
}

impl MountConfig {
    pub fn to_sensor_mount(&self) -> SensorMount {
        let [qw, qx, qy, qz] = self.rotation;
        let [x, y, z] = self.translation;
        SensorMount::new(SE3::from_quaternion(qw, qx, qy, qz, Vector3::new(x, y, z)))
    }
}

/// Top-level mapper configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub sensor_mount: MountConfig,
    /// Cell size for downsampling map snapshots handed to consumers.
    /// The mapper itself never downsamples.
    pub voxel_size: Option<f64>,
}

impl MapperConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let config: MapperConfig = serde_yaml::from_reader(file)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let [qw, qx, qy, qz] = self.sensor_mount.rotation;
        let norm = (qw * qw + qx * qx + qy * qy + qz * qz).sqrt();
        if !norm.is_finite() || norm < 1e-6 {
            bail!("sensor_mount.rotation must be a non-zero quaternion, got norm {}", norm);
        }
        if let Some(size) = self.voxel_size {
            if size.is_nan() || size <= 0.0 {
                bail!("voxel_size must be positive, got {}", size);
            }
        }
        Ok(())
    }
}
