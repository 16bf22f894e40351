// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plain records for shipping bands across a process boundary.
//! Complex numbers travel as `[re, im]` pairs, everything else as
//! scalars, and the records are written as JSON.  Decoding checks the
//! record before handing back a task, since it may have come from
//! anywhere.

use config::SolverConfig;
use failure::Error;
use num::Complex;
use planes::Window;
use polynomial::{Polynomial, RootedPolynomial};
use serde::{Deserialize, Serialize};
use serde_json;
use solver::MAX_ROOTS;
use task::{BandResult, BandTask};

/// A `BandTask` flattened into plain values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskRecord {
    /// `[re_min, re_max, im_min, im_max]`
    pub window: [f64; 4],
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// First row of the band.
    pub y_min: usize,
    /// One past the last row of the band.
    pub y_max: usize,
    /// Newton step cap.
    pub iteration_limit: usize,
    /// Convergence epsilon.
    pub convergence_epsilon: f64,
    /// Nearest-root threshold.
    pub root_threshold: f64,
    /// Band height the request was cut with.
    pub band_height: usize,
    /// Coefficients, lowest power first.
    pub coefficients: Vec<[f64; 2]>,
    /// Derivative coefficients, lowest power first.
    pub derivative: Vec<[f64; 2]>,
    /// Roots, in order.
    pub roots: Vec<[f64; 2]>,
}

/// A `BandResult` flattened into plain values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// First row of the band.
    pub y_min: usize,
    /// One past the last row of the band.
    pub y_max: usize,
    /// Root indices, row by row.
    pub indices: Vec<u16>,
}

fn pairs(values: &[Complex<f64>]) -> Vec<[f64; 2]> {
    values.iter().map(|c| [c.re, c.im]).collect()
}

fn complexes(pairs: &[[f64; 2]]) -> Vec<Complex<f64>> {
    pairs.iter().map(|p| Complex::new(p[0], p[1])).collect()
}

impl<'a> From<&'a BandTask> for TaskRecord {
    fn from(task: &'a BandTask) -> Self {
        let window = task.window();
        let config = task.config();
        TaskRecord {
            window: [window.re_min, window.re_max, window.im_min, window.im_max],
            width: task.width(),
            height: task.height(),
            y_min: task.rows().start,
            y_max: task.rows().end,
            iteration_limit: config.iteration_limit,
            convergence_epsilon: config.convergence_epsilon,
            root_threshold: config.root_threshold,
            band_height: config.band_height,
            coefficients: pairs(task.polynomial().coefficients()),
            derivative: pairs(task.derivative().coefficients()),
            roots: pairs(task.rooted().roots()),
        }
    }
}

impl TaskRecord {
    /// Rebuild the task, refusing records no partitioner would make.
    pub fn into_task(self) -> Result<BandTask, Error> {
        let w = self.window;
        let window = Window::new(w[0], w[1], w[2], w[3])?;
        ensure!(
            self.y_min <= self.y_max && self.y_max <= self.height,
            "rows {}..{} do not fit an image {} rows high",
            self.y_min,
            self.y_max,
            self.height
        );
        ensure!(!self.roots.is_empty(), "a band needs at least one root");
        ensure!(
            self.roots.len() <= MAX_ROOTS,
            "{} roots are more than a pixel index can name",
            self.roots.len()
        );
        let config = SolverConfig {
            iteration_limit: self.iteration_limit,
            convergence_epsilon: self.convergence_epsilon,
            root_threshold: self.root_threshold,
            band_height: self.band_height,
        };
        config.validate()?;
        Ok(BandTask::new(
            window,
            self.width,
            self.height,
            self.y_min..self.y_max,
            config,
            Polynomial::new(complexes(&self.coefficients)),
            Polynomial::new(complexes(&self.derivative)),
            RootedPolynomial::new(complexes(&self.roots)),
        ))
    }
}

impl From<BandResult> for ResultRecord {
    fn from(result: BandResult) -> Self {
        ResultRecord {
            y_min: result.rows.start,
            y_max: result.rows.end,
            indices: result.indices,
        }
    }
}

impl From<ResultRecord> for BandResult {
    fn from(record: ResultRecord) -> Self {
        BandResult {
            rows: record.y_min..record.y_max,
            indices: record.indices,
        }
    }
}

/// Write a task as JSON.
pub fn encode_task(task: &BandTask) -> Result<String, Error> {
    Ok(serde_json::to_string(&TaskRecord::from(task))?)
}

/// Read a task written by `encode_task`.
pub fn decode_task(json: &str) -> Result<BandTask, Error> {
    let record: TaskRecord = serde_json::from_str(json)?;
    record.into_task()
}

/// Write a band result as JSON.
pub fn encode_result(result: BandResult) -> Result<String, Error> {
    Ok(serde_json::to_string(&ResultRecord::from(result))?)
}

/// Read a band result written by `encode_result`.
pub fn decode_result(json: &str) -> Result<BandResult, Error> {
    let record: ResultRecord = serde_json::from_str(json)?;
    ensure!(
        record.y_min <= record.y_max,
        "rows {}..{} run backwards",
        record.y_min,
        record.y_max
    );
    Ok(record.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use partition::partition;
    use solver::solve_band;

    fn tasks() -> Vec<BandTask> {
        let rooted = RootedPolynomial::new(vec![
            Complex::new(1.0, 0.5),
            Complex::new(-1.0, 0.0),
            Complex::new(0.25, -1.0),
        ]);
        let polynomial = rooted.to_coefficient_form().unwrap();
        let derivative = polynomial.derive();
        partition(
            Window::new(-2.0, 2.0, -1.5, 1.5).unwrap(),
            11,
            9,
            &SolverConfig::default().with_band_height(4),
            &polynomial,
            &derivative,
            &rooted,
        )
    }

    #[test]
    fn shipped_tasks_solve_the_same() {
        for task in tasks() {
            let json = encode_task(&task).unwrap();
            let shipped = decode_task(&json).unwrap();
            assert_eq!(shipped, task);

            let result = solve_band(&shipped);
            let returned = decode_result(&encode_result(result.clone()).unwrap()).unwrap();
            assert_eq!(returned, solve_band(&task));
        }
    }

    #[test]
    fn records_are_plain_pairs() {
        let task = &tasks()[0];
        let record = TaskRecord::from(task);
        assert_eq!(record.roots, vec![[1.0, 0.5], [-1.0, 0.0], [0.25, -1.0]]);
        assert_eq!(record.coefficients.len(), 4);
        assert_eq!(record.derivative.len(), 3);
        assert_eq!((record.y_min, record.y_max), (0, 4));
        let json = encode_task(task).unwrap();
        assert!(json.contains("\"roots\":[[1.0,0.5],[-1.0,0.0],[0.25,-1.0]]"));
    }

    #[test]
    fn refuses_records_no_partitioner_would_make() {
        let mut record = TaskRecord::from(&tasks()[0]);
        record.y_max = 100;
        assert!(record.clone().into_task().is_err());

        let mut record = TaskRecord::from(&tasks()[0]);
        record.roots.clear();
        assert!(record.into_task().is_err());

        let mut record = TaskRecord::from(&tasks()[0]);
        record.window = [1.0, -1.0, 0.0, 1.0];
        assert!(record.into_task().is_err());

        assert!(decode_task("{\"width\": 3}").is_err());
        assert!(decode_result("{\"y_min\": 4, \"y_max\": 2, \"indices\": []}").is_err());
    }
}
