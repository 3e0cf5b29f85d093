//! 2D occupancy grid for one container instance.

use crate::error::{LootError, Result};

/// A free region found by `ContainerSpaceMap::find_slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPosition {
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

#[derive(Debug, Clone)]
pub struct ContainerSpaceMap {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl ContainerSpaceMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.cells[(y * self.width + x) as usize]
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// First free origin for a `w`x`h` item, scanning rows top to bottom and
    /// columns left to right. At each origin the unrotated footprint is tried
    /// before the rotated one.
    pub fn find_slot(&self, w: u32, h: u32) -> Option<SlotPosition> {
        if w == 0 || h == 0 {
            return None;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                if self.region_free(x, y, w, h) {
                    return Some(SlotPosition { x, y, rotated: false });
                }
                if w != h && self.region_free(x, y, h, w) {
                    return Some(SlotPosition { x, y, rotated: true });
                }
            }
        }
        None
    }

    /// Marks the cells of a placement taken. `w` and `h` are the unrotated size.
    pub fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, rotated: bool) -> Result<()> {
        let (fw, fh) = if rotated { (h, w) } else { (w, h) };
        if !self.region_free(x, y, fw, fh) {
            return Err(LootError::SlotOccupied {
                x,
                y,
                width: fw,
                height: fh,
            });
        }
        for cy in y..y + fh {
            for cx in x..x + fw {
                self.cells[(cy * self.width + cx) as usize] = true;
            }
        }
        Ok(())
    }

    fn region_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        if x + w > self.width || y + h > self.height {
            return false;
        }
        (y..y + h).all(|cy| (x..x + w).all(|cx| !self.cells[(cy * self.width + cx) as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_places_at_origin() {
        let map = ContainerSpaceMap::new(4, 4);
        assert_eq!(
            map.find_slot(2, 2),
            Some(SlotPosition {
                x: 0,
                y: 0,
                rotated: false
            })
        );
    }

    #[test]
    fn test_rotation_used_when_only_fit() {
        // 2 wide, 3 tall grid; a 3x1 item only fits standing up
        let map = ContainerSpaceMap::new(2, 3);
        let slot = map.find_slot(3, 1).unwrap();
        assert!(slot.rotated);
        assert_eq!((slot.x, slot.y), (0, 0));
    }

    #[test]
    fn test_too_big_returns_none() {
        let map = ContainerSpaceMap::new(2, 2);
        assert!(map.find_slot(3, 3).is_none());
        assert!(map.find_slot(0, 1).is_none());
    }

    #[test]
    fn test_fill_prevents_overlap() {
        let mut map = ContainerSpaceMap::new(3, 3);
        map.fill(0, 0, 2, 2, false).unwrap();
        assert_eq!(map.occupied_cells(), 4);
        assert!(map.fill(1, 1, 1, 1, false).is_err());

        let next = map.find_slot(1, 1).unwrap();
        assert_eq!((next.x, next.y), (2, 0));
    }

    #[test]
    fn test_fill_rotated_footprint() {
        let mut map = ContainerSpaceMap::new(3, 3);
        map.fill(0, 0, 3, 1, true).unwrap();
        assert!(map.is_occupied(0, 2));
        assert!(!map.is_occupied(1, 0));
    }

    #[test]
    fn test_grid_fills_until_full() {
        let mut map = ContainerSpaceMap::new(4, 2);
        let mut placed = 0;
        while let Some(slot) = map.find_slot(2, 1) {
            map.fill(slot.x, slot.y, 2, 1, slot.rotated).unwrap();
            placed += 1;
        }
        assert_eq!(placed, 4);
        assert_eq!(map.occupied_cells(), 8);
    }

    #[test]
    fn test_fill_out_of_bounds_is_error() {
        let mut map = ContainerSpaceMap::new(2, 2);
        assert!(map.fill(1, 1, 2, 1, false).is_err());
    }
}
