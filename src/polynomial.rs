// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two shapes a polynomial takes in the renderer.  The rooted
//! form is what the user gives us and what we classify converged
//! points against; the coefficient form is what the Newton iteration
//! actually evaluates, together with its derivative.

use complex::{distance, Pretty};
use itertools::iproduct;
use num::Complex;
use std::fmt;

/// A polynomial with complex coefficients, stored by ascending
/// power: `coefficients[p]` multiplies `z^p`.  Nothing is trimmed, so
/// an explicit zero in the highest slot still counts toward the
/// order.  No coefficients at all is the zero polynomial.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<Complex<f64>>,
}

impl Polynomial {
    /// Takes the coefficients exactly as given, lowest power first.
    pub fn new(coefficients: Vec<Complex<f64>>) -> Self {
        Polynomial { coefficients }
    }

    /// The polynomial with no coefficients.
    pub fn zero() -> Self {
        Polynomial {
            coefficients: vec![],
        }
    }

    /// The coefficients, lowest power first.
    pub fn coefficients(&self) -> &[Complex<f64>] {
        &self.coefficients
    }

    /// The highest power present, or `None` for the zero polynomial.
    pub fn order(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    /// True when there are no coefficients at all.  A polynomial whose
    /// coefficients happen to be zero is not the zero polynomial here.
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Convolve the two coefficient sequences.  The order of the
    /// product is the sum of the orders.
    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        let mut product =
            vec![Complex::new(0.0, 0.0); self.coefficients.len() + other.coefficients.len() - 1];
        for ((i, a), (j, b)) in iproduct!(
            self.coefficients.iter().enumerate(),
            other.coefficients.iter().enumerate()
        ) {
            product[i + j] += a * b;
        }
        Polynomial::new(product)
    }

    /// The first derivative.  A constant derives to the zero
    /// polynomial, and so does the zero polynomial itself.
    pub fn derive(&self) -> Polynomial {
        Polynomial::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(power, c)| c.scale(power as f64))
                .collect(),
        )
    }

    /// Evaluate at `z` by Horner's rule.
    pub fn apply(&self, z: Complex<f64>) -> Complex<f64> {
        self.coefficients
            .iter()
            .rev()
            .fold(Complex::new(0.0, 0.0), |acc, c| acc * z + c)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (power, c) in self.coefficients.iter().enumerate().rev() {
            match power {
                0 => write!(f, "({})", Pretty(*c))?,
                1 => write!(f, "({})z+", Pretty(*c))?,
                _ => write!(f, "({})z^{}+", Pretty(*c), power)?,
            }
        }
        Ok(())
    }
}

/// A polynomial described by its roots, `(z - r0)(z - r1)...`.  The
/// order of the roots is kept: it fixes the numbering used when
/// classifying points and the order in which they are expanded.
#[derive(Clone, Debug, PartialEq)]
pub struct RootedPolynomial {
    roots: Vec<Complex<f64>>,
}

impl RootedPolynomial {
    /// Keeps the roots in the order given.
    pub fn new(roots: Vec<Complex<f64>>) -> Self {
        RootedPolynomial { roots }
    }

    /// The roots, in order.
    pub fn roots(&self) -> &[Complex<f64>] {
        &self.roots
    }

    /// The number of roots.
    pub fn order(&self) -> usize {
        self.roots.len()
    }

    /// Evaluate the product of `(z - root)` over all roots.  This
    /// agrees with `to_coefficient_form().apply(z)`.
    pub fn apply(&self, z: Complex<f64>) -> Complex<f64> {
        self.roots
            .iter()
            .fold(Complex::new(1.0, 0.0), |acc, root| acc * (z - root))
    }

    /// Multiply the linear factors out into coefficient form.  Starts
    /// from `z - r0` and folds each further root into the running
    /// coefficients in place, touching each of them once per root.
    /// There is nothing to expand without roots.
    pub fn to_coefficient_form(&self) -> Option<Polynomial> {
        let (first, rest) = self.roots.split_first()?;

        // Highest power first while we work; flipped at the end.
        let mut descending = Vec::with_capacity(self.roots.len() + 1);
        descending.push(Complex::new(1.0, 0.0));
        descending.push(-*first);
        for root in rest {
            let lowest = descending[descending.len() - 1];
            descending.push(-lowest * *root);
            for j in (1..descending.len() - 1).rev() {
                let shifted = descending[j - 1] * *root;
                descending[j] -= shifted;
            }
        }
        descending.reverse();
        Some(Polynomial::new(descending))
    }

    /// Find the root strictly closer to `z` than `threshold`.  When
    /// several qualify the nearest wins, and an exact tie goes to the
    /// root listed first.  The index is zero-based.  A NaN `z` is
    /// never close to anything.
    pub fn index_of_closest_root_for(&self, z: Complex<f64>, threshold: f64) -> Option<usize> {
        self.roots
            .iter()
            .enumerate()
            .map(|(index, root)| (index, distance(*root, z)))
            .filter(|&(_, d)| d < threshold)
            .fold(None, |best: Option<(usize, f64)>, (index, d)| match best {
                Some((_, nearest)) if nearest <= d => best,
                _ => Some((index, d)),
            })
            .map(|(index, _)| index)
    }
}

impl fmt::Display for RootedPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for root in &self.roots {
            let shown = Pretty(*root).to_string();
            let (sign, magnitude) = match shown.chars().next() {
                Some('-') => ("+", &shown[1..]),
                Some('+') => ("-", &shown[1..]),
                _ => ("-", &shown[..]),
            };
            write!(f, "(z{}{})", sign, magnitude)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complex::approx_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TOLERANCE: f64 = 1e-9;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    fn sample(rng: &mut StdRng) -> Complex<f64> {
        c(rng.gen_range(-2.0, 2.0), rng.gen_range(-2.0, 2.0))
    }

    fn random_polynomial(rng: &mut StdRng, order: usize) -> Polynomial {
        Polynomial::new((0..=order).map(|_| sample(rng)).collect())
    }

    #[test]
    fn order_counts_explicit_zero_leading_terms() {
        let p = Polynomial::new(vec![c(1.0, 0.0), c(2.0, 0.0), c(0.0, 0.0)]);
        assert_eq!(p.order(), Some(2));
        assert_eq!(p.coefficients().len(), 3);
        assert_eq!(Polynomial::zero().order(), None);
    }

    #[test]
    fn deriving_past_the_order_reaches_zero() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for order in 0..6 {
            let mut p = random_polynomial(&mut rng, order);
            for _ in 0..=order {
                p = p.derive();
            }
            assert!(p.is_zero());
            assert_eq!(p.apply(sample(&mut rng)), c(0.0, 0.0));
            assert!(p.derive().is_zero());
        }
    }

    #[test]
    fn derivative_of_a_cubic() {
        // (7+2i)z^3 + 2z^2 + 5z + 1
        let p = Polynomial::new(vec![c(1.0, 0.0), c(5.0, 0.0), c(2.0, 0.0), c(7.0, 2.0)]);
        let expected = Polynomial::new(vec![c(5.0, 0.0), c(4.0, 0.0), c(21.0, 6.0)]);
        assert_eq!(p.derive(), expected);
    }

    #[test]
    fn product_evaluates_as_product_of_values() {
        let mut rng = StdRng::seed_from_u64(42);
        for &(a, b) in &[(0, 0), (1, 2), (3, 1), (4, 4)] {
            let pa = random_polynomial(&mut rng, a);
            let pb = random_polynomial(&mut rng, b);
            let product = pa.multiply(&pb);
            assert_eq!(product.order(), Some(a + b));
            for _ in 0..16 {
                let z = sample(&mut rng);
                assert!(approx_eq(product.apply(z), pa.apply(z) * pb.apply(z), 1e-6));
            }
        }
    }

    #[test]
    fn product_sums_every_pair_of_powers() {
        // (1 + z)(1 + z) = 1 + 2z + z^2
        let p = Polynomial::new(vec![c(1.0, 0.0), c(1.0, 0.0)]);
        let square = p.multiply(&p);
        assert_eq!(square.coefficients(), &[c(1.0, 0.0), c(2.0, 0.0), c(1.0, 0.0)]);
        assert!(p.multiply(&Polynomial::zero()).is_zero());
    }

    #[test]
    fn apply_matches_direct_powers() {
        let p = Polynomial::new(vec![c(1.0, -1.0), c(0.5, 0.0), c(0.0, 2.0)]);
        let z = c(0.3, -1.2);
        let direct = p.coefficients()[0] + p.coefficients()[1] * z + p.coefficients()[2] * z * z;
        assert!(approx_eq(p.apply(z), direct, TOLERANCE));
    }

    #[test]
    fn expands_plus_and_minus_one_into_z_squared_minus_one() {
        let rooted = RootedPolynomial::new(vec![c(1.0, 0.0), c(-1.0, 0.0)]);
        let p = rooted.to_coefficient_form().unwrap();
        let expected = [c(-1.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)];
        assert_eq!(p.order(), Some(2));
        for (got, want) in p.coefficients().iter().zip(expected.iter()) {
            assert!(approx_eq(*got, *want, TOLERANCE));
        }
        assert!(approx_eq(p.derive().apply(c(0.0, 0.0)), c(0.0, 0.0), TOLERANCE));
    }

    #[test]
    fn expansion_vanishes_at_every_root() {
        let roots = vec![c(1.0, 0.0), c(-0.5, 0.866), c(-0.5, -0.866), c(0.0, 2.0)];
        let rooted = RootedPolynomial::new(roots.clone());
        let p = rooted.to_coefficient_form().unwrap();
        assert_eq!(p.order(), Some(4));
        assert!(approx_eq(*p.coefficients().last().unwrap(), c(1.0, 0.0), TOLERANCE));
        for root in roots {
            assert!(p.apply(root).norm() < 1e-9);
        }
    }

    #[test]
    fn nothing_to_expand_without_roots() {
        assert_eq!(RootedPolynomial::new(vec![]).to_coefficient_form(), None);
    }

    #[test]
    fn rooted_and_expanded_forms_agree() {
        let mut rng = StdRng::seed_from_u64(7);
        let rooted = RootedPolynomial::new((0..5).map(|_| sample(&mut rng)).collect());
        let p = rooted.to_coefficient_form().unwrap();
        for _ in 0..16 {
            let z = sample(&mut rng);
            assert!(approx_eq(rooted.apply(z), p.apply(z), 1e-6));
        }
    }

    #[test]
    fn single_root_is_found_at_itself() {
        let rooted = RootedPolynomial::new(vec![c(0.25, -3.0)]);
        assert_eq!(rooted.index_of_closest_root_for(c(0.25, -3.0), 1e-9), Some(0));
    }

    #[test]
    fn nothing_within_threshold_is_none() {
        let rooted = RootedPolynomial::new(vec![c(1.0, 0.0), c(-1.0, 0.0)]);
        assert_eq!(rooted.index_of_closest_root_for(c(0.0, 0.0), 0.002), None);
        assert_eq!(rooted.index_of_closest_root_for(c(1.01, 0.0), 0.002), None);
        let nan = c(0.0, 0.0) / c(0.0, 0.0);
        assert_eq!(rooted.index_of_closest_root_for(nan, 10.0), None);
    }

    #[test]
    fn nearest_root_wins_over_later_roots() {
        let rooted = RootedPolynomial::new(vec![c(0.0, 0.0), c(0.5, 0.0)]);
        assert_eq!(rooted.index_of_closest_root_for(c(0.1, 0.0), 1.0), Some(0));
        assert_eq!(rooted.index_of_closest_root_for(c(0.4, 0.0), 1.0), Some(1));
        // Equidistant: the first listed root is credited.
        assert_eq!(rooted.index_of_closest_root_for(c(0.25, 0.0), 1.0), Some(0));
    }

    #[test]
    fn displays_both_forms() {
        let rooted = RootedPolynomial::new(vec![c(1.0, 0.0), c(-1.0, 0.0), c(0.0, 2.0)]);
        assert_eq!(rooted.to_string(), "(z-1)(z+1)(z-2i)");
        let p = RootedPolynomial::new(vec![c(1.0, 0.0), c(-1.0, 0.0)])
            .to_coefficient_form()
            .unwrap();
        assert_eq!(p.to_string(), "(1)z^2+(0)z+(-1)");
        assert_eq!(Polynomial::zero().to_string(), "0");
    }
}
