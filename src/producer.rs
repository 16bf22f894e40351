// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render request end to end: partition, submit, aggregate.

use aggregator::Aggregator;
use config::SolverConfig;
use error::RenderError;
use executor::JobService;
use num::Complex;
use partition::partition;
use planes::Window;
use polynomial::{Polynomial, RootedPolynomial};
use solver::MAX_ROOTS;
use std::ops::Range;

/// The answer to one render request.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendering {
    /// One root index per pixel, row-major, top row first: 0 where
    /// nothing converged, `k` for the `k`-th root.
    pub indices: Vec<u16>,
    /// How many roots the indices can name.
    pub roots: usize,
    /// Echoed from the request.
    pub request_id: u64,
    /// Rows left at 0 because their band failed.
    pub failed_bands: Vec<Range<usize>>,
}

/// Holds the polynomial built once from the user's roots, and the
/// job service that runs the bands.  Requests share nothing else, so
/// a producer can serve several of them at once when its job service
/// allows it.
pub struct FractalProducer<S> {
    rooted: RootedPolynomial,
    polynomial: Polynomial,
    derivative: Polynomial,
    config: SolverConfig,
    service: S,
}

impl<S: JobService> FractalProducer<S> {
    /// Build the coefficient form and its derivative from `roots`.
    pub fn new(
        roots: Vec<Complex<f64>>,
        config: SolverConfig,
        service: S,
    ) -> Result<Self, RenderError> {
        config.validate()?;
        if roots.len() > MAX_ROOTS {
            return Err(RenderError::TooManyRoots {
                count: roots.len(),
                limit: MAX_ROOTS,
            });
        }
        let rooted = RootedPolynomial::new(roots);
        let polynomial = rooted.to_coefficient_form().ok_or(RenderError::NoRoots)?;
        let derivative = polynomial.derive();
        debug!("Solving {} = {}", rooted, polynomial);
        Ok(FractalProducer {
            rooted,
            polynomial,
            derivative,
            config,
            service,
        })
    }

    /// The roots, in the order their indices are numbered.
    pub fn rooted(&self) -> &RootedPolynomial {
        &self.rooted
    }

    /// The expanded polynomial.
    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    /// Its derivative.
    pub fn derivative(&self) -> &Polynomial {
        &self.derivative
    }

    /// The solver settings every band gets.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Render `window` at `width` by `height` pixels.  Failed bands do
    /// not fail the request; they come back as zeroed rows listed in
    /// `failed_bands`.
    pub fn produce(
        &self,
        window: Window,
        width: usize,
        height: usize,
        request_id: u64,
    ) -> Result<Rendering, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }
        window.validate()?;

        let tasks = partition(
            window,
            width,
            height,
            &self.config,
            &self.polynomial,
            &self.derivative,
            &self.rooted,
        );
        let submitted = tasks.len();
        let expected = tasks.iter().map(|t| t.rows()).collect();
        let outcomes = self.service.submit(tasks);
        if outcomes.len() != submitted {
            warn!(
                "Request {}: submitted {} bands, {} came back",
                request_id,
                submitted,
                outcomes.len()
            );
        }

        let mut aggregator = Aggregator::new(width, height, expected);
        aggregator.accept_all(outcomes);
        let (indices, failed_bands) = aggregator.finish();
        if !failed_bands.is_empty() {
            warn!(
                "Request {}: {} of {} bands failed",
                request_id,
                failed_bands.len(),
                submitted
            );
        }

        Ok(Rendering {
            indices,
            roots: self.rooted.order(),
            request_id,
            failed_bands,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::TaskFailure;
    use executor::SerialExecutor;
    use solver::solve_band;
    use task::{BandTask, TaskOutcome};

    fn roots() -> Vec<Complex<f64>> {
        vec![Complex::new(1.0, 0.0), Complex::new(-1.0, 0.0)]
    }

    fn square() -> Window {
        Window::new(-2.0, 2.0, -2.0, 2.0).unwrap()
    }

    #[test]
    fn three_by_three_request() {
        let producer = FractalProducer::new(roots(), SolverConfig::default(), SerialExecutor).unwrap();
        let rendering = producer.produce(square(), 3, 3, 17).unwrap();
        assert_eq!(rendering.indices, vec![2, 0, 1, 2, 0, 1, 2, 0, 1]);
        assert_eq!(rendering.roots, 2);
        assert_eq!(rendering.request_id, 17);
        assert!(rendering.failed_bands.is_empty());
    }

    #[test]
    fn refuses_to_build_without_roots() {
        let producer = FractalProducer::new(vec![], SolverConfig::default(), SerialExecutor);
        assert_eq!(producer.err(), Some(RenderError::NoRoots));
    }

    #[test]
    fn refuses_more_roots_than_indices() {
        let roots = vec![Complex::new(0.5, 0.5); MAX_ROOTS + 1];
        let producer = FractalProducer::new(roots, SolverConfig::default(), SerialExecutor);
        assert_eq!(
            producer.err(),
            Some(RenderError::TooManyRoots {
                count: 65_536,
                limit: 65_535
            })
        );
    }

    #[test]
    fn refuses_bad_configuration() {
        let config = SolverConfig::default().with_band_height(0);
        assert!(FractalProducer::new(roots(), config, SerialExecutor).is_err());
    }

    #[test]
    fn refuses_empty_images() {
        let producer = FractalProducer::new(roots(), SolverConfig::default(), SerialExecutor).unwrap();
        assert_eq!(
            producer.produce(square(), 0, 10, 1),
            Err(RenderError::EmptyImage {
                width: 0,
                height: 10
            })
        );
        let inverted = Window {
            re_min: 1.0,
            re_max: -1.0,
            im_min: -1.0,
            im_max: 1.0,
        };
        assert!(producer.produce(inverted, 4, 4, 1).is_err());
    }

    #[test]
    fn failed_bands_are_reported_not_fatal() {
        let flaky = |tasks: Vec<BandTask>| -> Vec<TaskOutcome> {
            tasks
                .iter()
                .map(|t| {
                    if t.rows().start == 2 {
                        Err(TaskFailure::new(t.rows(), "connection reset"))
                    } else {
                        SerialExecutor.submit(vec![t.clone()]).remove(0)
                    }
                })
                .collect()
        };
        let config = SolverConfig::default().with_band_height(2);
        let reliable = FractalProducer::new(roots(), config, SerialExecutor).unwrap();
        let unreliable = FractalProducer::new(roots(), config, flaky).unwrap();

        let good = reliable.produce(square(), 5, 5, 1).unwrap();
        let degraded = unreliable.produce(square(), 5, 5, 1).unwrap();
        assert_eq!(degraded.failed_bands, vec![2..4]);
        assert_eq!(degraded.indices.len(), 25);
        assert!(degraded.indices[10..20].iter().all(|&i| i == 0));
        assert_eq!(&degraded.indices[..10], &good.indices[..10]);
        assert_eq!(&degraded.indices[20..], &good.indices[20..]);
    }

    #[test]
    fn dropped_bands_are_reported() {
        let forgetful = |tasks: Vec<BandTask>| -> Vec<TaskOutcome> {
            tasks
                .into_iter()
                .filter(|t| t.rows().start != 2)
                .map(|t| Ok(solve_band(&t)))
                .collect()
        };
        let config = SolverConfig::default().with_band_height(2);
        let producer = FractalProducer::new(roots(), config, forgetful).unwrap();
        let rendering = producer.produce(square(), 5, 5, 4).unwrap();
        assert_eq!(rendering.failed_bands, vec![2..4]);
        assert!(rendering.indices[10..20].iter().all(|&i| i == 0));
    }
}
