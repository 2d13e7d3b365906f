//! The SGP4 near-earth model.

use crate::coords::Eci;
use crate::error::Result;
use crate::julian::Julian;
use crate::model;
use crate::propagator::{Common, MeanElements};

/// Drag integration terms
///
/// For perigees below 220 km the equations are truncated to linear variation
/// in √a and quadratic variation in mean anomaly; the C₃, δω and δM terms are
/// dropped.
#[derive(Debug, Clone)]
enum Drag {
    Truncated,
    Full {
        c5: f64,
        omgcof: f64,
        xmcof: f64,
        delmo: f64,
        sinmo: f64,
        d2: f64,
        d3: f64,
        d4: f64,
        t3cof: f64,
        t4cof: f64,
        t5cof: f64,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct NearEarth {
    common: Common,
    drag: Drag,
}

impl NearEarth {
    pub(crate) fn new(els: MeanElements) -> NearEarth {
        let common = Common::new(els);
        let els = &common.els;
        let drag = if els.semi_major * (1.0 - els.eccentricity) / model::AE
            < 220.0 / model::XKMPER + model::AE
        {
            Drag::Truncated
        } else {
            // C₅ = 2 coef₁ a₀" β₀² (1 + ¹¹/₄ η (η + e₀) + e₀ η³)
            let c5 = 2.0
                * common.coef1
                * els.semi_major
                * common.betao2
                * (1.0 + 2.75 * (common.etasq + common.eeta) + common.eeta * common.etasq);

            let omgcof = els.bstar * common.c3 * els.argument_of_perigee.cos();

            // the δM term diverges for near-circular orbits and is dropped there
            let xmcof = if els.eccentricity > 1.0e-4 {
                -(2.0 / 3.0) * common.coef * els.bstar * model::AE / common.eeta
            } else {
                0.0
            };

            let c1sq = common.c1 * common.c1;

            // D₂ = 4 a₀" ξ C₁²
            let d2 = 4.0 * els.semi_major * common.tsi * c1sq;

            let temp = d2 * common.tsi * common.c1 / 3.0;

            // D₃ = (17 a₀" + s₄) D₂ ξ C₁ / 3
            let d3 = (17.0 * els.semi_major + common.s4) * temp;

            // D₄ = ¹/₂ (D₂ ξ C₁ / 3) a₀" ξ (221 a₀" + 31 s₄) C₁
            let d4 = 0.5
                * temp
                * els.semi_major
                * common.tsi
                * (221.0 * els.semi_major + 31.0 * common.s4)
                * common.c1;

            Drag::Full {
                c5,
                omgcof,
                xmcof,
                delmo: (1.0 + common.eta * els.mean_anomaly.cos()).powi(3),
                sinmo: els.mean_anomaly.sin(),
                d2,
                d3,
                d4,
                t3cof: d2 + 2.0 * c1sq,
                t4cof: 0.25 * (3.0 * d3 + common.c1 * (12.0 * d2 + 10.0 * c1sq)),
                t5cof: 0.2
                    * (3.0 * d4
                        + 12.0 * common.c1 * d3
                        + 6.0 * d2 * d2
                        + 15.0 * c1sq * (2.0 * d2 + c1sq)),
            }
        };
        NearEarth { common, drag }
    }

    /// ECI position and velocity at `tsince` minutes past the TLE epoch
    pub(crate) fn position_at(
        &self,
        tsince: f64,
        epoch: &Julian,
        satellite: &str,
    ) -> Result<Eci> {
        let els = &self.common.els;

        // update for secular gravity and atmospheric drag
        let xmdf = els.mean_anomaly + self.common.xmdot * tsince;
        let omgadf = els.argument_of_perigee + self.common.omgdot * tsince;
        let xnoddf = els.right_ascension + self.common.xnodot * tsince;
        let tsq = tsince * tsince;
        let xnode = xnoddf + self.common.xnodcf * tsq;
        let mut tempa = 1.0 - self.common.c1 * tsince;
        let mut tempe = els.bstar * self.common.c4 * tsince;
        let mut templ = self.common.t2cof * tsq;

        let (xmp, omega) = match &self.drag {
            Drag::Truncated => (xmdf, omgadf),
            Drag::Full {
                c5,
                omgcof,
                xmcof,
                delmo,
                sinmo,
                d2,
                d3,
                d4,
                t3cof,
                t4cof,
                t5cof,
            } => {
                let delomg = omgcof * tsince;
                let delm = xmcof * ((1.0 + self.common.eta * xmdf.cos()).powi(3) - delmo);
                let temp = delomg + delm;
                let xmp = xmdf + temp;

                let tcube = tsq * tsince;
                let tfour = tsince * tcube;
                tempa -= d2 * tsq + d3 * tcube + d4 * tfour;
                tempe += els.bstar * c5 * (xmp.sin() - sinmo);
                templ += t3cof * tcube + tfour * (t4cof + tsince * t5cof);

                (xmp, omgadf - temp)
            }
        };

        let a = els.semi_major * tempa * tempa;
        let e = els.eccentricity - tempe;
        let xl = xmp + omega + xnode + els.mean_motion * templ;
        let xn = model::XKE / a.powf(1.5);

        self.common.final_position(
            els.inclination,
            omgadf,
            e,
            a,
            xl,
            xnode,
            xn,
            tsince,
            epoch,
            satellite,
        )
    }
}
