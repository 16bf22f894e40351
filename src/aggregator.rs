// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reassembles band results into the full image.  Bands own disjoint
//! rows, so each result is a plain copy into its own stretch of a
//! buffer allocated up front, and the order results arrive in cannot
//! matter.  A band that failed, came back the wrong shape, or never
//! came back at all is logged and its rows stay at 0.

use std::ops::Range;
use task::{BandResult, TaskOutcome};

/// Collects the outcomes of one render request.
#[derive(Debug)]
pub struct Aggregator {
    width: usize,
    height: usize,
    buffer: Vec<u16>,
    failed: Vec<Range<usize>>,
    outstanding: Vec<Range<usize>>,
}

impl Aggregator {
    /// A zeroed `width` by `height` buffer waiting for the bands
    /// covering `expected`.
    pub fn new(width: usize, height: usize, expected: Vec<Range<usize>>) -> Self {
        Aggregator {
            width,
            height,
            buffer: vec![0 as u16; width * height],
            failed: vec![],
            outstanding: expected,
        }
    }

    fn check_in(&mut self, rows: &Range<usize>) {
        if let Some(pos) = self.outstanding.iter().position(|r| r == rows) {
            self.outstanding.swap_remove(pos);
        }
    }

    /// Take one outcome, whatever order it arrives in.
    pub fn accept(&mut self, outcome: TaskOutcome) {
        match outcome {
            Ok(ref result) => self.check_in(&result.rows),
            Err(ref failure) => self.check_in(&failure.rows),
        }
        match outcome {
            Ok(result) => self.place(result),
            Err(failure) => {
                warn!("{}; leaving rows {:?} empty", failure, failure.rows);
                self.failed.push(failure.rows);
            }
        }
    }

    fn place(&mut self, result: BandResult) {
        let BandResult { rows, indices } = result;
        let fits = rows.start <= rows.end && rows.end <= self.height;
        if !fits || indices.len() != self.width * (rows.end - rows.start) {
            error!(
                "Band {:?} returned {} indices for a {}x{} image; leaving it empty",
                rows,
                indices.len(),
                self.width,
                self.height
            );
            self.failed.push(rows);
            return;
        }
        let offset = self.width * rows.start;
        self.buffer[offset..offset + indices.len()].copy_from_slice(&indices);
    }

    /// Take every outcome of a batch.
    pub fn accept_all<I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = TaskOutcome>,
    {
        for outcome in outcomes {
            self.accept(outcome);
        }
    }

    /// Row ranges of the bands reported as failed or refused so far,
    /// in the order they were reported.
    pub fn failed_bands(&self) -> &[Range<usize>] {
        &self.failed
    }

    /// The finished buffer, row-major, top row first, along with the
    /// bands left empty.  Expected bands that never reported come
    /// last, in row order.
    pub fn finish(mut self) -> (Vec<u16>, Vec<Range<usize>>) {
        let mut missing = self.outstanding;
        missing.sort_by_key(|r| r.start);
        for rows in missing {
            warn!("Band {:?} never came back; leaving it empty", rows);
            self.failed.push(rows);
        }
        (self.buffer, self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::TaskFailure;

    fn band(rows: Range<usize>, width: usize, value: u16) -> TaskOutcome {
        Ok(BandResult {
            indices: vec![value; width * (rows.end - rows.start)],
            rows,
        })
    }

    #[test]
    fn bands_land_at_their_rows() {
        let mut agg = Aggregator::new(2, 5, vec![0..2, 2..4, 4..5]);
        agg.accept_all(vec![band(4..5, 2, 3), band(0..2, 2, 1), band(2..4, 2, 2)]);
        let (buffer, failed) = agg.finish();
        assert_eq!(buffer, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3]);
        assert!(failed.is_empty());
    }

    #[test]
    fn arrival_order_does_not_matter() {
        let outcomes = vec![band(0..3, 4, 1), band(3..6, 4, 2), band(6..7, 4, 3)];
        let expected = vec![0..3, 3..6, 6..7];
        let mut forward = Aggregator::new(4, 7, expected.clone());
        forward.accept_all(outcomes.clone());
        let mut backward = Aggregator::new(4, 7, expected);
        backward.accept_all(outcomes.into_iter().rev());
        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn failed_band_stays_zero() {
        let mut agg = Aggregator::new(3, 4, vec![0..2, 2..4]);
        agg.accept(band(0..2, 3, 1));
        agg.accept(Err(TaskFailure::new(2..4, "worker lost")));
        assert_eq!(agg.failed_bands(), &[2..4]);
        let (buffer, failed) = agg.finish();
        assert_eq!(buffer, vec![1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(failed, vec![2..4]);
    }

    #[test]
    fn misshapen_results_are_refused() {
        let mut agg = Aggregator::new(3, 4, vec![0..2, 2..4]);
        agg.accept(Ok(BandResult {
            rows: 0..2,
            indices: vec![1; 5],
        }));
        agg.accept(band(3..6, 3, 2));
        let (buffer, failed) = agg.finish();
        assert!(buffer.iter().all(|&i| i == 0));
        assert_eq!(failed, vec![0..2, 3..6, 2..4]);
    }

    #[test]
    fn nothing_expected() {
        let (buffer, failed) = Aggregator::new(2, 2, vec![]).finish();
        assert_eq!(buffer, vec![0; 4]);
        assert!(failed.is_empty());
    }

    #[test]
    fn silent_bands_count_as_failed() {
        let mut agg = Aggregator::new(2, 6, vec![0..2, 2..4, 4..6]);
        agg.accept(band(2..4, 2, 5));
        assert!(agg.failed_bands().is_empty());
        let (buffer, failed) = agg.finish();
        assert_eq!(buffer, vec![0, 0, 0, 0, 5, 5, 5, 5, 0, 0, 0, 0]);
        assert_eq!(failed, vec![0..2, 4..6]);
    }

    #[test]
    fn failures_are_not_reported_twice() {
        let mut agg = Aggregator::new(1, 2, vec![0..1, 1..2]);
        agg.accept(band(1..2, 1, 1));
        agg.accept(Err(TaskFailure::new(0..1, "timeout")));
        let (_, failed) = agg.finish();
        assert_eq!(failed, vec![0..1]);
    }
}
