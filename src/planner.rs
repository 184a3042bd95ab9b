use crate::config::RangeSettings;
use crate::coord::GeoPoint;
use crate::error::RangeError;
use crate::range::{OneWayJump, RangeResult, detect_one_way, range_query};
use tracing::info;

/// Everything a map layer needs to draw one drone range.
#[derive(Debug, Clone)]
pub struct RangeReport {
    /// The flood-filled cells.
    pub range: RangeResult,
    /// Indices into the supplied markers whose cell is in range.
    pub highlighted: Vec<usize>,
    /// Indices into the supplied markers flagged as one-way, with details.
    pub one_way: Vec<(usize, OneWayJump)>,
    /// Radius of the key range circle, when enabled.
    pub key_range_meters: Option<f64>,
}

/// Runs range queries according to a [`RangeSettings`].
///
/// # Example
/// ```
/// use drone_range::{GeoPoint, RangePlanner, RangeSettings};
///
/// # fn main() -> Result<(), drone_range::RangeError> {
/// let planner = RangePlanner::new(RangeSettings::default());
/// let center = GeoPoint::new(47.6205, -122.3493)?;
/// let markers = [center, GeoPoint::new(47.481489, -122.196868)?];
///
/// let report = planner.plan(&center, &markers)?;
/// assert_eq!(report.highlighted, vec![0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RangePlanner {
    settings: RangeSettings,
}

impl RangePlanner {
    pub fn new(settings: RangeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RangeSettings {
        &self.settings
    }

    /// Range cells around `center` for the configured calculation method.
    pub fn range(&self, center: &GeoPoint) -> Result<RangeResult, RangeError> {
        let method = self.settings.calculation_method;
        range_query(center, method.radius_meters, method.grid_level)
    }

    /// Computes the range around `center`, highlights the markers inside it
    /// and, if enabled, flags one-way jumps among the highlighted markers.
    pub fn plan(&self, center: &GeoPoint, markers: &[GeoPoint]) -> Result<RangeReport, RangeError> {
        let range = self.range(center)?;

        let mut highlighted = Vec::new();
        for (idx, marker) in markers.iter().enumerate() {
            if range.contains_point(marker)? {
                highlighted.push(idx);
            }
        }

        let mut one_way = Vec::new();
        if self.settings.show_one_way {
            for &idx in &highlighted {
                for jump in detect_one_way(&range, std::slice::from_ref(&markers[idx]))? {
                    if self.settings.one_way_policy.admits(&jump) {
                        one_way.push((idx, jump));
                    }
                }
            }
        }

        info!(
            method = %self.settings.calculation_method,
            cells = range.len(),
            markers = markers.len(),
            highlighted = highlighted.len(),
            one_way = one_way.len(),
            "drone range planned"
        );

        Ok(RangeReport {
            range,
            highlighted,
            one_way,
            key_range_meters: self.settings.key_range_meters(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculationMethod;
    use crate::geom::destination_point;
    use crate::range::OneWayPolicy;

    fn seattle() -> GeoPoint {
        GeoPoint::new(47.6205, -122.3493).unwrap()
    }

    fn ring(center: &GeoPoint, distance: f64) -> Vec<GeoPoint> {
        (0..360)
            .step_by(5)
            .map(|b| destination_point(center, b as f64, distance).unwrap())
            .collect()
    }

    #[test]
    fn test_plan_uses_configured_method() -> Result<(), RangeError> {
        let coarse = RangePlanner::default().range(&seattle())?;
        let fine = RangePlanner::new(
            RangeSettings::default().calculation_method(CalculationMethod::L17_570M),
        )
        .range(&seattle())?;

        assert_eq!(coarse.level(), 16);
        assert_eq!(fine.level(), 17);
        assert_eq!(fine.radius_meters(), 570.0);
        Ok(())
    }

    #[test]
    fn test_highlights_only_markers_in_range() -> Result<(), RangeError> {
        let center = seattle();
        let mut markers = ring(&center, 200.0);
        markers.push(destination_point(&center, 10.0, 3_000.0)?);

        let report = RangePlanner::default().plan(&center, &markers)?;
        let last = markers.len() - 1;

        assert_eq!(report.highlighted.len(), last);
        assert!(!report.highlighted.contains(&last));
        assert!(report.one_way.is_empty());
        Ok(())
    }

    #[test]
    fn test_outbound_policy_reports_all_candidates() -> Result<(), RangeError> {
        let center = seattle();
        let markers = ring(&center, 501.0);
        let planner = RangePlanner::new(
            RangeSettings::default().one_way_policy(OneWayPolicy::Outbound),
        );

        let report = planner.plan(&center, &markers)?;
        assert!(!report.one_way.is_empty());
        assert_eq!(report.one_way.len(), report.highlighted.len());
        for (idx, jump) in &report.one_way {
            assert_eq!(markers[*idx], jump.point);
        }
        Ok(())
    }

    #[test]
    fn test_no_return_policy_is_subset() -> Result<(), RangeError> {
        let center = seattle();
        let markers = ring(&center, 501.0);

        let outbound = RangePlanner::new(
            RangeSettings::default().one_way_policy(OneWayPolicy::Outbound),
        )
        .plan(&center, &markers)?;
        let no_return = RangePlanner::default().plan(&center, &markers)?;

        assert!(no_return.one_way.len() <= outbound.one_way.len());
        for (idx, jump) in &no_return.one_way {
            assert!(!jump.return_in_range);
            assert!(outbound.one_way.iter().any(|(i, _)| i == idx));
        }
        Ok(())
    }

    #[test]
    fn test_one_way_disabled() -> Result<(), RangeError> {
        let center = seattle();
        let markers = ring(&center, 501.0);
        let planner = RangePlanner::new(
            RangeSettings::default()
                .show_one_way(false)
                .one_way_policy(OneWayPolicy::Outbound),
        );

        let report = planner.plan(&center, &markers)?;
        assert!(!report.highlighted.is_empty());
        assert!(report.one_way.is_empty());
        Ok(())
    }

    #[test]
    fn test_key_range_reported_when_enabled() -> Result<(), RangeError> {
        let planner = RangePlanner::new(RangeSettings::default().show_key_range(true));
        let report = planner.plan(&seattle(), &[])?;
        assert_eq!(report.key_range_meters, Some(1250.0));
        Ok(())
    }
}
