//! Initialization and final stage shared by the SGP4 and SDP4 models.

use crate::coords::Eci;
use crate::error::{Error, Result};
use crate::julian::Julian;
use crate::model;
use crate::vector::Vec3;

/// Brouwer mean elements at epoch, in radians and radians per minute
#[derive(Debug, Clone)]
pub(crate) struct MeanElements {
    pub inclination: f64,
    pub right_ascension: f64,
    pub eccentricity: f64,
    pub argument_of_perigee: f64,
    pub mean_anomaly: f64,

    /// B* drag term in earth radii⁻¹
    pub bstar: f64,

    /// Recovered (Brouwer) mean motion n₀" in rad.min⁻¹
    pub mean_motion: f64,

    /// Recovered semi-major axis a₀" in earth radii
    pub semi_major: f64,
}

/// Orbital quantities needed only once per orbit, shared by both models
#[derive(Debug, Clone)]
pub(crate) struct Common {
    pub els: MeanElements,

    pub cosio: f64,
    pub sinio: f64,

    // inclination polynomials in cos²I₀
    pub x3thm1: f64,
    pub x1mth2: f64,
    pub x7thm1: f64,

    pub eosq: f64,
    pub betao2: f64,
    pub betao: f64,

    // s₄, adjusted for perigees below 156 km
    pub s4: f64,

    pub tsi: f64,
    pub eta: f64,
    pub etasq: f64,
    pub eeta: f64,
    pub coef: f64,
    pub coef1: f64,

    pub c1: f64,
    pub c3: f64,
    pub c4: f64,

    // secular rates of the mean anomaly, perigee and node
    pub xmdot: f64,
    pub omgdot: f64,
    pub xnodot: f64,
    pub xnodcf: f64,
    pub t2cof: f64,

    // long-period orientation coefficients
    pub xlcof: f64,
    pub aycof: f64,
}

impl Common {
    pub(crate) fn new(els: MeanElements) -> Common {
        let cosio = els.inclination.cos();
        let sinio = els.inclination.sin();
        let theta2 = cosio * cosio;
        let x3thm1 = 3.0 * theta2 - 1.0;
        let eosq = els.eccentricity * els.eccentricity;
        let betao2 = 1.0 - eosq;
        let betao = betao2.sqrt();

        let aodp = els.semi_major;
        let xnodp = els.mean_motion;

        // for perigees below 156 km, the values of s and q₀ms2t are altered
        let perigee = model::XKMPER * (aodp * (1.0 - els.eccentricity) - model::AE);
        let mut s4 = model::S;
        let mut qoms24 = model::QOMS2T;
        if perigee < 156.0 {
            s4 = if perigee <= 98.0 { 20.0 } else { perigee - 78.0 };
            qoms24 = ((120.0 - s4) * model::AE / model::XKMPER).powi(4);
            s4 = s4 / model::XKMPER + model::AE;
        }

        let pinvsq = 1.0 / (aodp * aodp * betao2 * betao2);

        let tsi = 1.0 / (aodp - s4);
        let eta = aodp * els.eccentricity * tsi;
        let etasq = eta * eta;
        let eeta = els.eccentricity * eta;

        let psisq = (1.0 - etasq).abs();

        let coef = qoms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);

        // C₂ = q₀ms₂₄ ξ⁴ n₀" (1 - η²)⁻⁷ᐟ² (a₀" (1 + ³/₂ η² + e₀ η (4 + η²))
        //      + ³/₄ k₂ ξ (3 θ² - 1) (8 + 3 η² (8 + η²)) / (1 - η²))
        let c2 = coef1
            * xnodp
            * (aodp * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.75 * model::CK2 * tsi / psisq
                    * x3thm1
                    * (8.0 + 3.0 * etasq * (8.0 + etasq)));

        // C₁ = B* C₂
        let c1 = els.bstar * c2;

        let a3ovk2 = -model::J3 / model::CK2 * model::AE.powi(3);

        // C₃ is only meaningful for elliptic orbits
        let c3 = if els.eccentricity > 1.0e-4 {
            coef * tsi * a3ovk2 * xnodp * model::AE * sinio / els.eccentricity
        } else {
            0.0
        };

        let x1mth2 = 1.0 - theta2;

        // C₄ = 2 n₀" coef₁ a₀" β₀² (η (2 + ¹/₂ η²) + e₀ (¹/₂ + 2 η²)
        //      - 2 k₂ ξ / (a₀" (1 - η²)) (- 3 (3 θ² - 1) (1 - 2 e₀ η
        //      + η² (³/₂ - ¹/₂ e₀ η)) + ³/₄ (1 - θ²) (2 η² - e₀ η (1 + η²)) cos 2ω₀))
        let c4 = 2.0
            * xnodp
            * coef1
            * aodp
            * betao2
            * (eta * (2.0 + 0.5 * etasq) + els.eccentricity * (0.5 + 2.0 * etasq)
                - 2.0 * model::CK2 * tsi / (aodp * psisq)
                    * (-3.0 * x3thm1 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75
                            * x1mth2
                            * (2.0 * etasq - eeta * (1.0 + etasq))
                            * (2.0 * els.argument_of_perigee).cos()));

        let theta4 = theta2 * theta2;
        let temp1 = 3.0 * model::CK2 * pinvsq * xnodp;
        let temp2 = temp1 * model::CK2 * pinvsq;
        let temp3 = 1.25 * model::CK4 * pinvsq * pinvsq * xnodp;

        // Ṁ = n₀" + ³/₂ k₂ β₀ (3 θ² - 1) / p² n₀" + ...
        let xmdot = xnodp
            + 0.5 * temp1 * betao * x3thm1
            + 0.0625 * temp2 * betao * (13.0 - 78.0 * theta2 + 137.0 * theta4);

        let x1m5th = 1.0 - 5.0 * theta2;

        // ω̇ secular rate of the argument of perigee
        let omgdot = -0.5 * temp1 * x1m5th
            + 0.0625 * temp2 * (7.0 - 114.0 * theta2 + 395.0 * theta4)
            + temp3 * (3.0 - 36.0 * theta2 + 49.0 * theta4);

        // Ω̇ secular rate of the ascending node
        let xhdot1 = -temp1 * cosio;
        let xnodot = xhdot1
            + (0.5 * temp2 * (4.0 - 19.0 * theta2) + 2.0 * temp3 * (3.0 - 7.0 * theta2)) * cosio;
        let xnodcf = 3.5 * betao2 * xhdot1 * c1;
        let t2cof = 1.5 * c1;

        let xlcof = 0.125 * a3ovk2 * sinio * (3.0 + 5.0 * cosio) / (1.0 + cosio);
        let aycof = 0.25 * a3ovk2 * sinio;
        let x7thm1 = 7.0 * theta2 - 1.0;

        Common {
            els,
            cosio,
            sinio,
            x3thm1,
            x1mth2,
            x7thm1,
            eosq,
            betao2,
            betao,
            s4,
            tsi,
            eta,
            etasq,
            eeta,
            coef,
            coef1,
            c1,
            c3,
            c4,
            xmdot,
            omgdot,
            xnodot,
            xnodcf,
            t2cof,
            xlcof,
            aycof,
        }
    }

    /// Solves Kepler's equation for the time-evolved elements, applies the
    /// short-period periodics and rotates the orbit-plane state into ECI.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn final_position(
        &self,
        incl: f64,
        omega: f64,
        e: f64,
        a: f64,
        xl: f64,
        xnode: f64,
        xn: f64,
        tsince: f64,
        epoch: &Julian,
        satellite: &str,
    ) -> Result<Eci> {
        if e * e > 1.0 {
            return Err(Error::Hyperbolic {
                eccentricity: e,
                t: tsince,
            });
        }

        let beta = (1.0 - e * e).sqrt();

        // long period periodics
        let axn = e * omega.cos();
        let temp = 1.0 / (a * beta * beta);
        let xll = temp * self.xlcof * axn;
        let aynl = temp * self.aycof;
        let xlt = xl + xll;
        let ayn = e * omega.sin() + aynl;

        // solve Kepler's equation; after ten iterations the last iterate is used
        let capu = model::fmod2p(xlt - xnode);
        let mut epw = capu;
        let mut sinepw = epw.sin();
        let mut cosepw = epw.cos();
        let mut temp3 = axn * sinepw;
        let mut temp4 = ayn * cosepw;
        let mut temp5 = axn * cosepw;
        let mut temp6 = ayn * sinepw;
        for _ in 0..10 {
            let next = (capu - temp4 + temp3 - epw) / (1.0 - temp5 - temp6) + epw;
            if (next - epw).abs() <= 1.0e-6 {
                break;
            }
            epw = next;
            sinepw = epw.sin();
            cosepw = epw.cos();
            temp3 = axn * sinepw;
            temp4 = ayn * cosepw;
            temp5 = axn * cosepw;
            temp6 = ayn * sinepw;
        }

        // short period preliminary quantities
        let ecose = temp5 + temp6;
        let esine = temp3 - temp4;
        let elsq = axn * axn + ayn * ayn;
        let temp = 1.0 - elsq;
        let pl = a * temp;
        let r = a * (1.0 - ecose);
        let temp1 = 1.0 / r;
        let rdot = model::XKE * a.sqrt() * esine * temp1;
        let rfdot = model::XKE * pl.sqrt() * temp1;
        let temp2 = a * temp1;
        let betal = temp.sqrt();
        let temp3 = 1.0 / (1.0 + betal);
        let cosu = temp2 * (cosepw - axn + ayn * esine * temp3);
        let sinu = temp2 * (sinepw - ayn - axn * esine * temp3);
        let u = model::actan(sinu, cosu);
        let sin2u = 2.0 * sinu * cosu;
        let cos2u = 2.0 * cosu * cosu - 1.0;

        let temp = 1.0 / pl;
        let temp1 = model::CK2 * temp;
        let temp2 = temp1 * temp;

        // update for short periodics
        let rk = r * (1.0 - 1.5 * temp2 * betal * self.x3thm1) + 0.5 * temp1 * self.x1mth2 * cos2u;
        let uk = u - 0.25 * temp2 * self.x7thm1 * sin2u;
        let xnodek = xnode + 1.5 * temp2 * self.cosio * sin2u;
        let xinck = incl + 1.5 * temp2 * self.cosio * self.sinio * cos2u;
        let rdotk = rdot - xn * temp1 * self.x1mth2 * sin2u;
        let rfdotk = rfdot + xn * temp1 * (self.x1mth2 * cos2u + 1.5 * self.x3thm1);

        // orientation vectors
        let sinuk = uk.sin();
        let cosuk = uk.cos();
        let sinik = xinck.sin();
        let cosik = xinck.cos();
        let sinnok = xnodek.sin();
        let cosnok = xnodek.cos();
        let xmx = -sinnok * cosik;
        let xmy = cosnok * cosik;
        let ux = xmx * sinuk + cosnok * cosuk;
        let uy = xmy * sinuk + sinnok * cosuk;
        let uz = sinik * sinuk;
        let vx = xmx * cosuk - cosnok * sinuk;
        let vy = xmy * cosuk - sinnok * sinuk;
        let vz = sinik * cosuk;

        // position in km and velocity in km.s⁻¹
        let position = Vec3::new(rk * ux, rk * uy, rk * uz) * (model::XKMPER / model::AE);
        let velocity = Vec3::new(
            rdotk * ux + rfdotk * vx,
            rdotk * uy + rfdotk * vy,
            rdotk * uz + rfdotk * vz,
        ) * (model::XKMPER / model::AE * (model::MIN_PER_DAY / model::SEC_PER_DAY));

        let date = epoch.add_minutes(tsince)?;

        // a state below the surface of the earth means the orbit has decayed
        if position.magnitude() < model::XKMPER {
            return Err(Error::Decayed {
                satellite: satellite.to_owned(),
                time: date.to_datetime(),
            });
        }

        Ok(Eci {
            position,
            velocity,
            date,
        })
    }
}
