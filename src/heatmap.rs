use rand::Rng;
use rand_distr::StandardNormal;

use crate::data::model::FaultSystem;

/// One synthetic sample, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Tuning constants for [`synthesize`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapParams {
    /// Points every fault gets regardless of risk or slip.
    pub base_points: usize,
    /// Extra points per unit of `risk_weight * annual_slip_rate`.
    pub slip_scale: f64,
    /// Gaussian standard deviation before the risk term, degrees.
    pub base_spread_deg: f64,
    /// Added standard deviation per unit of risk weight, degrees.
    pub spread_per_weight_deg: f64,
    /// East-west elongation of the longitude spread.
    pub lon_stretch: f64,
    /// Upper bound on the slip-driven points of a single fault.
    pub max_scaled_points: usize,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        Self {
            base_points: 10,
            slip_scale: 15.0,
            base_spread_deg: 0.15,
            spread_per_weight_deg: 0.05,
            lon_stretch: 1.5,
            max_scaled_points: 10_000,
        }
    }
}

impl HeatmapParams {
    /// `floor(weight * slip * slip_scale) + base_points`, the scaled term
    /// capped at `max_scaled_points`.
    pub fn point_count(&self, risk_weight: u32, annual_slip_rate: f64) -> usize {
        let scaled = (f64::from(risk_weight) * annual_slip_rate * self.slip_scale).floor();
        // Slip rates are validated non-negative at load, `max` only guards NaN.
        let scaled = (scaled.max(0.0) as usize).min(self.max_scaled_points);
        scaled.saturating_add(self.base_points)
    }

    /// Latitude standard deviation for a risk weight, degrees.
    pub fn spread(&self, risk_weight: u32) -> f64 {
        self.base_spread_deg + f64::from(risk_weight) * self.spread_per_weight_deg
    }
}

/// Draw the point cloud for `faults`, all faults concatenated in order.
///
/// Sampling is not seeded by the app; pass a seeded RNG for reproducible
/// output.
pub fn synthesize<R: Rng>(
    faults: &[&FaultSystem],
    params: &HeatmapParams,
    rng: &mut R,
) -> Vec<HeatPoint> {
    let total: usize = faults
        .iter()
        .map(|f| params.point_count(f.seismic_risk.weight(), f.annual_slip_rate))
        .fold(0, usize::saturating_add);
    let mut points = Vec::with_capacity(total);

    for fault in faults {
        let weight = fault.seismic_risk.weight();
        let count = params.point_count(weight, fault.annual_slip_rate);
        let spread = params.spread(weight);
        for _ in 0..count {
            let dlat: f64 = rng.sample(StandardNormal);
            let dlon: f64 = rng.sample(StandardNormal);
            points.push(HeatPoint {
                lat: fault.latitude + dlat * spread,
                lon: fault.longitude + dlon * spread * params.lon_stretch,
            });
        }
    }

    log::debug!(
        "Synthesized {} heat points from {} faults",
        points.len(),
        faults.len()
    );
    points
}
