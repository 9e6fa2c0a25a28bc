//! Neighborhood patterns for window operations

/// Defines a neighborhood pattern around a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    /// Right and below neighbors only, so every adjacent pair is visited once
    Forward,
    /// Square neighborhood of given radius, (2r+1)² cells
    Square(usize),
}

impl Neighborhood {
    /// Get the radius of the neighborhood
    pub fn radius(&self) -> usize {
        match self {
            Neighborhood::Forward => 1,
            Neighborhood::Square(r) => *r,
        }
    }

    /// Get the size of the neighborhood (width and height)
    pub fn size(&self) -> usize {
        self.radius() * 2 + 1
    }

    /// Check if a relative position is within this neighborhood
    pub fn contains(&self, dr: isize, dc: isize) -> bool {
        match self {
            Neighborhood::Forward => (dr, dc) == (0, 1) || (dr, dc) == (1, 0),
            Neighborhood::Square(r) => {
                let r = *r as isize;
                dr.abs() <= r && dc.abs() <= r
            }
        }
    }

    /// Relative positions in this neighborhood, row-major
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius() as isize;
        let mut offsets = Vec::with_capacity(self.size() * self.size());

        for dr in -r..=r {
            for dc in -r..=r {
                if self.contains(dr, dc) {
                    offsets.push((dr, dc));
                }
            }
        }

        offsets
    }

    /// Get offsets excluding the center cell
    pub fn offsets_no_center(&self) -> Vec<(isize, isize)> {
        self.offsets()
            .into_iter()
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighborhood_offsets() {
        assert_eq!(Neighborhood::Square(1).offsets().len(), 9);
        assert_eq!(Neighborhood::Square(2).offsets().len(), 25);
        assert_eq!(Neighborhood::Square(0).offsets(), vec![(0, 0)]);
    }

    #[test]
    fn test_forward_pairs() {
        assert_eq!(Neighborhood::Forward.offsets(), vec![(0, 1), (1, 0)]);
        assert_eq!(Neighborhood::Forward.offsets_no_center().len(), 2);
    }
}
