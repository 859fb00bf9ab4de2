use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks every module outside the vertical timing column in placement order:
// column pairs from right to left, alternating upward and downward, right
// module before left. Yields (x, y); function modules are left to the caller
// to skip.
pub struct EncRegionIter {
    right: i32,
    vert: i32,
    j: i32,
    width: i32,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i32;
        Self { right: w - 1, vert: 0, j: 0, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i32, i32);
    fn next(&mut self) -> Option<Self::Item> {
        if self.right < 1 {
            return None;
        }

        let x = self.right - self.j;
        let upward = (self.right + 1) & 2 == 0;
        let y = if upward { self.width - 1 - self.vert } else { self.vert };

        self.j += 1;
        if self.j == 2 {
            self.j = 0;
            self.vert += 1;
            if self.vert == self.width {
                self.vert = 0;
                self.right -= 2;
                if self.right == 6 {
                    self.right = 5;
                }
            }
        }
        Some((x, y))
    }
}

#[cfg(test)]
mod iter_tests {
    use std::collections::HashSet;

    use super::EncRegionIter;
    use crate::common::metadata::Version;

    #[test]
    fn test_start_order() {
        let coords = EncRegionIter::new(Version::MIN).take(6).collect::<Vec<_>>();
        assert_eq!(coords, vec![(20, 20), (19, 20), (20, 19), (19, 19), (20, 18), (19, 18)]);
    }

    #[test]
    fn test_direction_change() {
        let coords = EncRegionIter::new(Version::MIN).skip(40).take(4).collect::<Vec<_>>();
        assert_eq!(coords, vec![(20, 0), (19, 0), (18, 0), (17, 0)]);
    }

    #[test]
    fn test_skips_timing_column() {
        let coords = EncRegionIter::new(Version::MIN).collect::<Vec<_>>();
        assert!(coords.iter().all(|&(x, _)| x != 6));
        // Column pair left of the timing column is 5 and 4
        let pos = coords.iter().position(|&(x, _)| x < 7).unwrap();
        assert_eq!(&coords[pos..pos + 2], &[(5, 0), (4, 0)]);
        assert_eq!(coords.last(), Some(&(0, 20)));
    }

    #[test]
    fn test_covers_grid_once() {
        for ver in Version::range(Version::MIN, Version::MAX) {
            let w = ver.width() as i32;
            let coords = EncRegionIter::new(ver).collect::<Vec<_>>();
            assert_eq!(coords.len(), (w * (w - 1)) as usize, "Version {ver}");
            let unique = coords.iter().collect::<HashSet<_>>();
            assert_eq!(unique.len(), coords.len(), "Version {ver}");
            assert!(coords.iter().all(|&(x, y)| (0..w).contains(&x) && (0..w).contains(&y)));
        }
    }
}
