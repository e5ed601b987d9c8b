use crate::models::rectangle::Rect;
use crate::{Result, SnapTileError};
use serde::{Deserialize, Serialize};

/// Monitor reported by the windowing platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    /// Full monitor geometry
    pub geometry: Rect,
    /// Usable area excluding panels and docks
    pub work_area: Rect,
    #[serde(default)]
    pub is_primary: bool,
}

impl MonitorInfo {
    pub fn new(index: usize, geometry: Rect, work_area: Rect) -> Result<Self> {
        let monitor = Self {
            index,
            name: format!("Monitor {}", index),
            geometry,
            work_area,
            is_primary: index == 0,
        };
        monitor.validate()?;
        Ok(monitor)
    }

    pub fn primary(geometry: Rect, work_area: Rect) -> Result<Self> {
        Self::new(0, geometry, work_area)
    }

    /// Work areas must be non-empty and lie inside the monitor
    pub fn validate(&self) -> Result<()> {
        if self.geometry.is_empty() || self.work_area.is_empty() {
            return Err(SnapTileError::ValidationError(
                "Monitor dimensions must be positive".to_string(),
            )
            .into());
        }

        if !self.geometry.contains_rect(&self.work_area) {
            return Err(SnapTileError::ValidationError(format!(
                "Work area {} of monitor {} exceeds its geometry {}",
                self.work_area, self.index, self.geometry
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_monitor() {
        assert!(MonitorInfo::primary(Rect::new(0, 0, 0, 1080), Rect::new(0, 0, 0, 1080)).is_err());
    }

    #[test]
    fn rejects_work_area_outside_geometry() {
        let result = MonitorInfo::new(1, Rect::new(1920, 0, 1920, 1080), Rect::new(0, 0, 1920, 1040));
        assert!(result.is_err());

        let monitor =
            MonitorInfo::new(1, Rect::new(1920, 0, 1920, 1080), Rect::new(1920, 32, 1920, 1048))
                .unwrap();
        assert!(!monitor.is_primary);
    }
}
