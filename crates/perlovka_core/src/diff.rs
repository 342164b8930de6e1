//! Forward and inverse discrete differencing of a row-major plane.
//!
//! The plane is treated as one continuous sequence. Horizontal differences
//! subtract the preceding element (so the first pixel of a row is diffed
//! against the last pixel of the row above); vertical differences subtract
//! the element one row below. Only pixels at least `radius` from every edge
//! are ever corrected, so the wrap at row boundaries never reaches the
//! corrected region.
//!
//! All arithmetic wraps, which keeps each pair of functions an exact inverse
//! for every `i32` input.

/// `d[i] = s[i] - s[i-1]` for `i >= 1`; `d[0]` unchanged.
pub fn diff_horizontal(data: &mut [i32]) {
    let Some(&first) = data.first() else {
        return;
    };

    let mut previous = first;
    for value in data.iter_mut().skip(1) {
        let current = *value;
        *value = current.wrapping_sub(previous);
        previous = current;
    }
}

/// Prefix sum, ascending from the untouched first element.
pub fn undiff_horizontal(data: &mut [i32]) {
    for i in 1..data.len() {
        data[i] = data[i].wrapping_add(data[i - 1]);
    }
}

/// `d[i] = s[i] - s[i+width]`; the last row is left unchanged.
pub fn diff_vertical(data: &mut [i32], width: usize) {
    if width == 0 || data.len() <= width {
        return;
    }

    for i in 0..data.len() - width {
        data[i] = data[i].wrapping_sub(data[i + width]);
    }
}

/// Inverse of [`diff_vertical`]; must run from the bottom rows up.
pub fn undiff_vertical(data: &mut [i32], width: usize) {
    if width == 0 || data.len() <= width {
        return;
    }

    for i in (0..data.len() - width).rev() {
        data[i] = data[i].wrapping_add(data[i + width]);
    }
}

/// Horizontal then vertical forward pass.
pub fn forward(data: &mut [i32], width: usize) {
    diff_horizontal(data);
    diff_vertical(data, width);
}

/// Vertical then horizontal inverse pass.
pub fn inverse(data: &mut [i32], width: usize) {
    undiff_vertical(data, width);
    undiff_horizontal(data);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SimpleLcg {
        state: u64,
    }

    impl SimpleLcg {
        fn new(seed: u64) -> Self {
            Self { state: seed }
        }

        fn next_i32(&mut self) -> i32 {
            self.state = self
                .state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.state >> 32) as i32
        }
    }

    #[test]
    fn test_horizontal_example() {
        let mut data = vec![5, 3, 8, 1];
        diff_horizontal(&mut data);
        assert_eq!(data, vec![5, -2, 5, -7]);
        undiff_horizontal(&mut data);
        assert_eq!(data, vec![5, 3, 8, 1]);
    }

    #[test]
    fn test_vertical_example() {
        let mut data = vec![1, 2, 3, 4];
        diff_vertical(&mut data, 2);
        assert_eq!(data, vec![-2, -2, 3, 4]);
        undiff_vertical(&mut data, 2);
        assert_eq!(data, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_horizontal_crosses_row_boundaries() {
        // width 3: element 3 starts row 1 and is diffed against element 2.
        let mut data = vec![1, 1, 10, 4, 4, 4];
        diff_horizontal(&mut data);
        assert_eq!(data[3], -6);
    }

    #[test]
    fn test_single_element_and_single_row() {
        let mut one = vec![42];
        forward(&mut one, 1);
        assert_eq!(one, vec![42]);
        inverse(&mut one, 1);
        assert_eq!(one, vec![42]);

        let mut row = vec![3, 9, -4];
        diff_vertical(&mut row, 3);
        assert_eq!(row, vec![3, 9, -4]);
    }

    #[test]
    fn test_round_trip_random_planes() {
        let mut rng = SimpleLcg::new(2025);
        for (width, height) in [(1, 1), (1, 7), (7, 1), (4, 4), (13, 9), (32, 17)] {
            let original: Vec<i32> = (0..width * height).map(|_| rng.next_i32()).collect();
            let mut data = original.clone();

            forward(&mut data, width);
            inverse(&mut data, width);

            assert_eq!(data, original, "round trip failed for {}x{}", width, height);
        }
    }

    #[test]
    fn test_flat_plane_diffs_to_zero_interior() {
        let width = 5;
        let mut data = vec![100; width * 4];
        forward(&mut data, width);

        // Only the anchor survives.
        assert_eq!(data[0], 100);
        assert!(data[1..].iter().all(|&v| v == 0));
    }
}
