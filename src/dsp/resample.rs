//! Nearest-sample read positions for rate-scaled playback.

/*
Nearest-Index Resampling
========================

A voice does not interpolate between samples. Its read head is a real
number (start position + frame offset × rate) rounded to the nearest
integer index:

    rate = 1.5, start = 10

    frame   exact   index
      0     10.0     10
      1     11.5     12      (round half away from zero)
      2     13.0     13
      3     14.5     15

At rate 1.0 this is bit-exact playback. Away from 1.0 samples get repeated
(slower) or skipped (faster), which aliases audibly at large deviations.
That is the accepted price for a mixer whose cost per voice is one
multiply-add and one table read per channel per frame.

Positions are only committed once per callback: the whole buffer reads
from the start position plus a scaled offset, and afterwards the start
position moves by round(frames × rate). Negative rates play backwards.
*/

/// Unwrapped read index for frame `offset` of a buffer starting at `position`.
#[inline]
pub fn read_index(position: usize, offset: usize, rate: f64) -> i64 {
    (position as f64 + offset as f64 * rate).round() as i64
}

/// Wrap an unwrapped index into `[0, len)`, backwards indices included.
#[inline]
pub fn wrap(index: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    index.rem_euclid(len as i64) as usize
}

/// The index itself if it lies inside `[0, len)`.
#[inline]
pub fn within(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_rate_reads_consecutive_samples() {
        let indices: Vec<i64> = (0..4).map(|i| read_index(7, i, 1.0)).collect();
        assert_eq!(indices, vec![7, 8, 9, 10]);
    }

    #[test]
    fn fractional_rate_rounds_to_nearest() {
        let indices: Vec<i64> = (0..4).map(|i| read_index(10, i, 1.5)).collect();
        assert_eq!(indices, vec![10, 12, 13, 15]);
    }

    #[test]
    fn wrap_handles_both_directions() {
        assert_eq!(wrap(5, 4), 1);
        assert_eq!(wrap(-1, 4), 3);
        assert_eq!(wrap(-9, 4), 3);
        assert_eq!(wrap(3, 4), 3);
    }

    #[test]
    fn within_rejects_out_of_range() {
        assert_eq!(within(0, 3), Some(0));
        assert_eq!(within(2, 3), Some(2));
        assert_eq!(within(3, 3), None);
        assert_eq!(within(-1, 3), None);
    }
}
