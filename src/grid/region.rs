//! Region segmentation
//!
//! A region (color block) is a maximal set of same-colored codels connected
//! through horizontal/vertical neighbors; diagonal contact does not join two
//! regions. Black and white codels form regions like any other color.
//!
//! Membership is kept in a side table indexed by grid slot, so looking up the
//! region of a codel is a single array access.
//!
//! # Algorithm
//!
//! Cells are visited in raster order. Each cell looks at its already-visited
//! 4-neighbors (left and above) of the same color:
//! - no match: the cell starts a new region
//! - one region: the cell joins it
//! - two distinct regions: the cell bridges them, so both are merged together
//!   with the cell into one region
//!
//! The merge step matters: a `U`-shaped block is first seen as two separate
//! strips that only meet at the bottom.

use super::color::Color;
use super::{Grid, Position};

/// Identifier of a region within one segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

/// A maximal 4-connected block of same-colored codels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    pub color: Color,
    /// Member codels in raster order
    pub cells: Vec<Position>,
}

impl Region {
    /// Number of codels, the value pushed by `push`
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Partition of a grid into regions
#[derive(Debug, Clone)]
pub struct Regions {
    regions: Vec<Region>,
    /// Region id of each grid slot, row-major
    owner: Vec<RegionId>,
    width: usize,
}

impl Regions {
    /// Segment the whole grid
    pub fn segment(grid: &Grid) -> Self {
        let width = grid.width();
        let mut owner: Vec<usize> = vec![usize::MAX; grid.len()];
        // Working buckets; merged-away buckets are left as None
        let mut buckets: Vec<Option<(Color, Vec<Position>)>> = Vec::new();

        for (idx, cell) in grid.cells().iter().enumerate() {
            let pos = Position::new(idx % width, idx / width);
            let color = cell.color;

            let mut matching: [Option<usize>; 2] = [None, None];
            if pos.x > 0 && grid.cells()[idx - 1].color == color {
                matching[0] = Some(owner[idx - 1]);
            }
            if pos.y > 0 && grid.cells()[idx - width].color == color {
                matching[1] = Some(owner[idx - width]);
            }

            let target = match matching {
                [None, None] => {
                    buckets.push(Some((color, Vec::new())));
                    buckets.len() - 1
                }
                [Some(a), None] | [None, Some(a)] => a,
                [Some(a), Some(b)] if a == b => a,
                [Some(a), Some(b)] => {
                    // Bridge cell: fold the smaller bucket into the larger one
                    let (keep, absorb) = if bucket_len(&buckets, a) >= bucket_len(&buckets, b) {
                        (a, b)
                    } else {
                        (b, a)
                    };
                    if let Some((_, moved)) = buckets[absorb].take() {
                        for p in &moved {
                            owner[p.y * width + p.x] = keep;
                        }
                        if let Some((_, cells)) = buckets[keep].as_mut() {
                            cells.extend(moved);
                        }
                    }
                    keep
                }
            };

            owner[idx] = target;
            if let Some((_, cells)) = buckets[target].as_mut() {
                cells.push(pos);
            }
        }

        // Compact surviving buckets into dense ids, ordered by first cell
        let mut remap = vec![usize::MAX; buckets.len()];
        let mut regions = Vec::new();
        for (old, bucket) in buckets.into_iter().enumerate() {
            if let Some((color, mut cells)) = bucket {
                cells.sort_by_key(|p| (p.y, p.x));
                remap[old] = regions.len();
                regions.push(Region {
                    id: RegionId(regions.len()),
                    color,
                    cells,
                });
            }
        }
        regions.sort_by_key(|r| (r.cells[0].y, r.cells[0].x));
        let mut order = vec![0; regions.len()];
        for (new, region) in regions.iter_mut().enumerate() {
            order[region.id.0] = new;
            region.id = RegionId(new);
        }

        let owner = owner
            .into_iter()
            .map(|old| RegionId(order[remap[old]]))
            .collect();

        log::debug!(
            "segmented {}x{} grid into {} regions",
            grid.width(),
            grid.height(),
            regions.len()
        );

        Regions {
            regions,
            owner,
            width,
        }
    }

    /// Region containing the codel at `pos` (caller guarantees it is in bounds)
    pub fn region_at(&self, pos: Position) -> &Region {
        &self.regions[self.owner[pos.y * self.width + pos.x].0]
    }

    pub fn id_at(&self, pos: Position) -> RegionId {
        self.owner[pos.y * self.width + pos.x]
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }
}

fn bucket_len(buckets: &[Option<(Color, Vec<Position>)>], idx: usize) -> usize {
    buckets[idx].as_ref().map_or(0, |(_, cells)| cells.len())
}
