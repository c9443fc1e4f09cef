use std::cmp::Reverse;

use arrayvec::ArrayVec;
use bitvec::prelude::*;
use itertools::Itertools;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{PuzzleError, Result};
use crate::grid::Grid;
use crate::input;

const SEA_MONSTER: [&str; 3] = [
    "                  # ",
    "#    ##    ##    ###",
    " #  #  #  #  #  #   ",
];

type Neighbours = ArrayVec<u64, 4>;

struct Jigsaw {
    tiles: FxHashMap<u64, Grid>,
    neighbours: FxHashMap<u64, Neighbours>,
}

impl Jigsaw {
    fn parse(s: &str) -> Result<Jigsaw> {
        let header_re = Regex::new(r"^Tile (\d+):$")?;
        let mut tiles: FxHashMap<u64, Grid> = FxHashMap::default();
        for block in input::paragraphs(s) {
            let caps = header_re.captures(block[0])
                .ok_or_else(|| PuzzleError::Malformed(format!("expected a tile header, got {:?}", block[0])))?;
            let id = input::parse_num(&caps[1])?;
            tiles.insert(id, Grid::parse(&block[1 ..])?);
        }
        if !tiles.values().map(Grid::size).all_equal() {
            return Err(PuzzleError::Malformed("tiles differ in size".to_owned()));
        }

        let neighbours = find_neighbours(&tiles)?;
        Ok(Jigsaw { tiles, neighbours })
    }

    fn corners(&self) -> Vec<u64> {
        self.neighbours.iter()
            .filter(|(_, neighbours)| neighbours.len() == 2)
            .map(|(&id, _)| id)
            .sorted_unstable()
            .collect()
    }

    /// Tile ids by grid cell, chosen greedily from neighbour counts alone.
    fn arrange(&self) -> Result<Vec<Vec<u64>>> {
        let side = (1 ..).find(|side| side * side >= self.tiles.len()).unwrap_or(0);
        if side * side != self.tiles.len() {
            return Err(PuzzleError::Arrangement(format!("{} tiles do not make a square", self.tiles.len())));
        }

        let mut used = FxHashSet::default();
        let mut layout: Vec<Vec<u64>> = Vec::with_capacity(side);
        for r in 0 .. side {
            let mut row: Vec<u64> = Vec::with_capacity(side);
            for c in 0 .. side {
                let expected = [r > 0, c > 0, r + 1 < side, c + 1 < side].iter().filter(|&&inside| inside).count();
                let adjacent = [
                    (r > 0).then(|| layout[r - 1][c]),
                    (c > 0).then(|| row[c - 1]),
                ];
                let id = if r == 0 && c == 0 {
                    self.neighbours.iter()
                        .filter(|(_, neighbours)| neighbours.len() == expected)
                        .map(|(&id, _)| id)
                        .min()
                } else {
                    self.best_candidate(expected, adjacent.iter().flatten(), &used)
                };
                let id = id.ok_or_else(|| PuzzleError::Arrangement(format!("no tile fits row {}, column {}", r, c)))?;
                used.insert(id);
                row.push(id);
            }
            log::debug!("row {}: {:?}", r, row);
            layout.push(row);
        }
        Ok(layout)
    }

    /// The unused tile with `expected` neighbours that touches most of the placed
    /// `adjacent` tiles, lowest id first on ties.
    fn best_candidate<'a>(&self, expected: usize, adjacent: impl Iterator<Item = &'a u64>, used: &FxHashSet<u64>) -> Option<u64> {
        let mut overlap: FxHashMap<u64, usize> = FxHashMap::default();
        for placed in adjacent {
            for &candidate in &self.neighbours[placed] {
                if !used.contains(&candidate) && self.neighbours[&candidate].len() == expected {
                    *overlap.entry(candidate).or_default() += 1;
                }
            }
        }
        overlap.into_iter().max_by_key(|&(id, count)| (count, Reverse(id))).map(|(id, _)| id)
    }

    /// Turns and flips every placed tile until its borders meet those already laid.
    fn orient(&self, layout: &[Vec<u64>]) -> Result<Vec<Vec<Grid>>> {
        let mut oriented: Vec<Vec<Grid>> = Vec::with_capacity(layout.len());
        for (r, ids) in layout.iter().enumerate() {
            let mut row: Vec<Grid> = Vec::with_capacity(ids.len());
            for (c, &id) in ids.iter().enumerate() {
                let fits = |tile: &Grid| {
                    if r == 0 && c == 0 {
                        // nothing laid yet: face the tiles that will go right of and below it
                        let faces = |border: Vec<u8>, neighbour: Option<&u64>| match neighbour {
                            Some(neighbour) => edge_strings(&self.tiles[neighbour]).contains(&border),
                            None => true,
                        };
                        faces(tile.right(), ids.get(1)) && faces(tile.bottom(), layout.get(1).map(|below| &below[0]))
                    } else {
                        (c == 0 || tile.left() == row[c - 1].right())
                            && (r == 0 || tile.top() == oriented[r - 1][c].bottom())
                    }
                };
                let tile = self.tiles[&id].orientations().find(fits).ok_or(PuzzleError::NoOrientation(id))?;
                row.push(tile);
            }
            oriented.push(row);
        }
        Ok(oriented)
    }

    fn image(&self) -> Result<Grid> {
        let layout = self.arrange()?;
        let pieces = self.orient(&layout)?.into_iter()
            .map(|row| row.iter().map(Grid::interior).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Ok(Grid::stitch(&pieces))
    }
}

/// Every border of the tile, forwards and backwards.
fn edge_strings(tile: &Grid) -> Vec<Vec<u8>> {
    tile.borders().into_iter()
        .flat_map(|border| {
            let reversed = border.iter().rev().copied().collect::<Vec<_>>();
            [border, reversed]
        })
        .collect()
}

fn find_neighbours(tiles: &FxHashMap<u64, Grid>) -> Result<FxHashMap<u64, Neighbours>> {
    let mut edges: FxHashMap<Vec<u8>, Vec<u64>> = FxHashMap::default();
    for (&id, tile) in tiles {
        for edge in edge_strings(tile) {
            let ids = edges.entry(edge).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    let mut neighbours: FxHashMap<u64, Neighbours> = tiles.keys().map(|&id| (id, Neighbours::new())).collect();
    for ids in edges.values() {
        for (&a, &b) in ids.iter().tuple_combinations() {
            for (from, to) in [(a, b), (b, a)] {
                let list = neighbours.entry(from).or_default();
                if !list.contains(&to) {
                    list.try_push(to).map_err(|_| PuzzleError::Arrangement(format!("tile {} matches more than four others", from)))?;
                }
            }
        }
    }
    Ok(neighbours)
}

fn monster_offsets() -> Vec<(usize, usize)> {
    SEA_MONSTER.iter().enumerate()
        .flat_map(|(r, line)| line.bytes().positions(|b| b == b'#').map(move |c| (r, c)))
        .collect()
}

/// `#` cells outside every sea monster, in the first orientation of `image` that shows any.
fn roughness(image: &Grid) -> usize {
    let offsets = monster_offsets();
    let height = SEA_MONSTER.len();
    let width = SEA_MONSTER[0].len();
    let size = image.size();
    for oriented in image.orientations() {
        let mut covered = bitvec![0; size * size];
        let mut monsters = 0;
        for r in 0 .. (size + 1).saturating_sub(height) {
            for c in 0 .. (size + 1).saturating_sub(width) {
                if offsets.iter().all(|&(dr, dc)| oriented.get(r + dr, c + dc) == b'#') {
                    monsters += 1;
                    for &(dr, dc) in &offsets {
                        covered.set((r + dr) * size + c + dc, true);
                    }
                }
            }
        }
        if monsters > 0 {
            log::info!("{} sea monsters", monsters);
            return oriented.count(b'#') - covered.count_ones();
        }
    }
    log::warn!("no sea monsters in any orientation");
    image.count(b'#')
}

pub fn solve(part: u8, s: &str) -> Result<String> {
    let jigsaw = Jigsaw::parse(s)?;
    if part == 1 {
        let corners = jigsaw.corners();
        if corners.len() != 4 {
            return Err(PuzzleError::Arrangement(format!("expected 4 corner tiles, found {:?}", corners)));
        }
        Ok(corners.iter().product::<u64>().to_string())
    } else {
        let image = jigsaw.image()?;
        log::debug!("assembled image:\n{}", image);
        Ok(roughness(&image).to_string())
    }
}
