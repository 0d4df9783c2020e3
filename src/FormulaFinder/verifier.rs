//! Turns an accepted count vector into a result: builds the empirical formula, checks the
//! hydrogen saturation bound, computes the empirical charge and checks charge range and m/z.
use crate::FormulaFinder::candidate::{CandidateElement, FormulaToken};
use crate::FormulaFinder::errors::FinderError;
use crate::FormulaFinder::options::SearchOptions;
use crate::FormulaFinder::results::SearchResult;
use std::fmt::Debug;

/// Target window of one mass search pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassTarget {
    /// centre of the mass window (target m/z times the charge multiple in m/z mode)
    pub mass: f64,
    /// half width of the mass window, Da
    pub tolerance: f64,
    /// charge multiple of this pass, 0 unless searching for a target m/z
    pub charge_multiple: i32,
    pub target_mz: f64,
    pub mz_tolerance: f64,
    /// report the delta mass in ppm
    pub ppm: bool,
}

impl MassTarget {
    pub fn new(mass: f64, tolerance: f64, ppm: bool) -> Self {
        Self {
            mass,
            tolerance,
            charge_multiple: 0,
            target_mz: 0.0,
            mz_tolerance: 0.0,
            ppm,
        }
    }

    /// pass looking for `target_mz` at charge `multiple`
    pub fn for_charge_multiple(target_mz: f64, mz_tolerance: f64, multiple: i32, ppm: bool) -> Self {
        Self {
            mass: target_mz * multiple as f64,
            tolerance: mz_tolerance * multiple as f64,
            charge_multiple: multiple,
            target_mz,
            mz_tolerance,
            ppm,
        }
    }

    pub fn lower(&self) -> f64 {
        self.mass - self.tolerance
    }
    pub fn upper(&self) -> f64 {
        self.mass + self.tolerance
    }
    pub fn contains(&self, mass: f64) -> bool {
        mass >= self.lower() && mass <= self.upper()
    }

    pub fn delta(&self, mass: f64) -> f64 {
        if self.ppm {
            (mass - self.mass) / self.mass * 1e6
        } else {
            mass - self.mass
        }
    }
}

/// Atom counts the hydrogen and charge rules look at. Everything not listed
/// (other elements, groups, custom masses) goes to `other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtomCounts {
    pub c: i64,
    pub si: i64,
    pub n: i64,
    pub p: i64,
    pub o: i64,
    pub s: i64,
    pub cl: i64,
    pub i: i64,
    pub f: i64,
    pub br: i64,
    pub h: i64,
    pub other: i64,
}

impl AtomCounts {
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = (&'a FormulaToken, u32)>) -> Self {
        let mut atoms = AtomCounts::default();
        for (token, count) in tokens {
            let count = i64::from(count);
            let slot = match token {
                FormulaToken::Standard(symbol) => match symbol.as_str() {
                    "C" => &mut atoms.c,
                    "Si" => &mut atoms.si,
                    "N" => &mut atoms.n,
                    "P" => &mut atoms.p,
                    "O" => &mut atoms.o,
                    "S" => &mut atoms.s,
                    "Cl" => &mut atoms.cl,
                    "I" => &mut atoms.i,
                    "F" => &mut atoms.f,
                    "Br" => &mut atoms.br,
                    "H" => &mut atoms.h,
                    _ => &mut atoms.other,
                },
                FormulaToken::CustomMass(_) => &mut atoms.other,
            };
            *slot += count;
        }
        atoms
    }

    pub fn halogens(&self) -> i64 {
        self.f + self.cl + self.br + self.i
    }
}

/// Upper bound on the number of hydrogens a composition can carry
pub trait HydrogenPolicy: Send + Sync + Debug {
    fn max_hydrogens(&self, atoms: &AtomCounts) -> i64;

    fn hydrogens_ok(&self, atoms: &AtomCounts) -> bool {
        atoms.h <= self.max_hydrogens(atoms)
    }
}

/// Valence saturation heuristic: 2n+3 hydrogens for C/Si chains, n+3 for N/P,
/// 4n+3 for other atoms, at least 3, minus one per halogen.
/// It is a heuristic bound, not a valence bond check.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValenceSaturationRule;

impl HydrogenPolicy for ValenceSaturationRule {
    fn max_hydrogens(&self, atoms: &AtomCounts) -> i64 {
        let carbon_like = atoms.c + atoms.si;
        let nitrogen_like = atoms.n + atoms.p;
        let only_o_and_s =
            carbon_like == 0 && nitrogen_like == 0 && atoms.other == 0 && (atoms.o > 0 || atoms.s > 0);

        let mut max_h = 0;
        if only_o_and_s {
            max_h = 3;
        } else {
            if carbon_like > 0 {
                max_h += carbon_like * 2 + 3;
            }
            if nitrogen_like > 0 {
                max_h += nitrogen_like + 3;
            }
            if carbon_like > 0 && nitrogen_like > 0 {
                max_h -= 3;
            }
            if atoms.other > 0 {
                max_h += atoms.other * 4 + 3;
            }
        }
        max_h = max_h.max(3);
        (max_h - atoms.halogens()).max(0)
    }
}

/// Empirical charge: hydrogens on carbon count -1 instead of +1, every C/Si beyond the first
/// takes 2, and each N/P on a carbon skeleton gives back +2 while hydrogens/halogens are left over.
pub fn correct_charge_empirical(total_charge: f64, atoms: &AtomCounts, hydrogen_charge_is_one: bool) -> f64 {
    let mut charge = total_charge;
    let carbon_like = atoms.c + atoms.si;
    if carbon_like >= 1 {
        if atoms.h > 0 && hydrogen_charge_is_one {
            charge -= (atoms.h * 2) as f64;
        }
        if carbon_like > 1 {
            charge -= ((carbon_like - 1) * 2) as f64;
        }
    }

    let nitrogen_like = atoms.n + atoms.p;
    if nitrogen_like > 0 && atoms.c > 0 {
        // hydrogens and halogens not taken up by the carbons, plus one per N/P
        let mut free = atoms.h + atoms.halogens() - (atoms.c * 2 + 2) + nitrogen_like;
        if free >= 0 {
            for _ in 0..nitrogen_like {
                charge += 2.0;
                free -= 1;
                if free <= 0 {
                    break;
                }
                charge += 2.0;
                free -= 1;
                if free <= 0 {
                    break;
                }
            }
        }
    }
    charge
}

/// true when every candidate is present and its percent of `total_mass` lies in its band
pub fn percent_composition_matches(candidates: &[CandidateElement], counts: &[u32], total_mass: f64) -> bool {
    if total_mass <= 0.0 {
        return false;
    }
    candidates.iter().zip(counts).all(|(candidate, &count)| {
        if count == 0 {
            return false;
        }
        let percent = count as f64 * candidate.mass / total_mass * 100.0;
        percent >= candidate.percent_comp_minimum && percent <= candidate.percent_comp_maximum
    })
}

pub struct CompoundVerifier<'a> {
    pub options: &'a SearchOptions,
    pub hydrogen_policy: &'a dyn HydrogenPolicy,
    hydrogen_charge_is_one: bool,
}

impl<'a> CompoundVerifier<'a> {
    pub fn new(
        options: &'a SearchOptions,
        hydrogen_policy: &'a dyn HydrogenPolicy,
        candidates: &[CandidateElement],
    ) -> Self {
        let hydrogen_charge_is_one = candidates
            .iter()
            .find(|c| c.token.is_symbol("H"))
            .is_some_and(|h| (h.charge - 1.0).abs() < f64::EPSILON);
        Self {
            options,
            hydrogen_policy,
            hydrogen_charge_is_one,
        }
    }

    /// Builds and checks the compound. `Err(InfeasibleCompound)` is the normal rejection,
    /// any other error means the composition could not be evaluated.
    pub fn verify(
        &self,
        candidates: &[CandidateElement],
        counts: &[u32],
        total_mass: f64,
        total_charge: f64,
        target: Option<&MassTarget>,
    ) -> Result<SearchResult, FinderError> {
        let mut present: Vec<(FormulaToken, u32, f64)> = candidates
            .iter()
            .zip(counts)
            .filter(|(_, n)| **n > 0)
            .map(|(c, n)| (c.token.clone(), *n, c.mass))
            .collect();
        present.sort_by(|a, b| a.0.cmp(&b.0));
        let masses: Vec<f64> = present.iter().map(|(_, _, m)| *m).collect();
        let tokens: Vec<(FormulaToken, u32)> = present.into_iter().map(|(t, n, _)| (t, n)).collect();

        if !total_mass.is_finite() || total_mass <= 0.0 {
            return Err(FinderError::Verification {
                formula: crate::FormulaFinder::results::render_formula(&tokens),
                reason: format!("mass {} is not a positive number", total_mass),
            });
        }

        let atoms = AtomCounts::from_tokens(tokens.iter().map(|(t, n)| (t, *n)));
        if (self.options.verify_hydrogens() || self.options.find_target_mz())
            && !self.hydrogen_policy.hydrogens_ok(&atoms)
        {
            return Err(FinderError::InfeasibleCompound(format!(
                "{} hydrogens exceed the saturation limit {}",
                atoms.h,
                self.hydrogen_policy.max_hydrogens(&atoms)
            )));
        }

        let mut charge_state = 0;
        let mut mz = 0.0;
        if self.options.find_charge() {
            let corrected = correct_charge_empirical(total_charge, &atoms, self.hydrogen_charge_is_one);
            if self.options.limit_charge_range()
                && (corrected < self.options.charge_min() as f64
                    || corrected > self.options.charge_max() as f64)
            {
                return Err(FinderError::InfeasibleCompound(format!(
                    "charge {} outside of {}..{}",
                    corrected,
                    self.options.charge_min(),
                    self.options.charge_max()
                )));
            }
            charge_state = corrected.round() as i32;
            if charge_state != 0 {
                mz = (total_mass / charge_state as f64).abs();
            }
            if self.options.find_target_mz() {
                if let Some(target) = target.filter(|t| t.charge_multiple > 0) {
                    if charge_state == 0 || (mz - target.target_mz).abs() > target.mz_tolerance {
                        return Err(FinderError::InfeasibleCompound(format!(
                            "m/z {} does not match {}",
                            mz, target.target_mz
                        )));
                    }
                }
            }
        }

        let (delta_mass, ppm) = match target {
            Some(target) => (target.delta(total_mass), target.ppm),
            None => (0.0, false),
        };
        Ok(SearchResult::new(
            &tokens,
            &masses,
            total_mass,
            delta_mass,
            ppm,
            charge_state,
            mz,
        ))
    }
}
