//! Choosing which dots of the supercell start growing at each dither level.
//!
//! Every cell of the tiled supercell has one dot site, the pixel holding
//! rank 1. Level 0 gets a random subset of the sites, which
//! [`relocate_seed_dots`] then spreads out by repeatedly moving the dot in
//! the densest spot to the emptiest one. Each further level adds its dots
//! one at a time into the emptiest spot ([`add_level_dots`]).

use rand::Rng;

use super::blur::GaussianFilter;
use crate::api::ScreenError;
use crate::grid::Grid;

/// Dot sites of a supercell, which of them are on, and at which level each
/// was switched on.
#[derive(Debug, Clone, PartialEq)]
pub struct DotField {
    sites: Vec<(usize, usize)>,
    bitmap: Grid<u8>,
    levels: Vec<Vec<usize>>,
}

/// Outcome of [`relocate_seed_dots`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub passes: usize,
    /// The dot taken away was put straight back, so the pattern is stable.
    pub converged: bool,
}

impl DotField {
    /// Collect the rank-1 pixels of `supercell` in row-major order.
    pub fn from_supercell(supercell: &Grid<i32>, levels: usize) -> Result<Self, ScreenError> {
        let sites = supercell
            .as_slice()
            .iter()
            .enumerate()
            .filter(|&(_, &rank)| rank == 1)
            .map(|(i, _)| supercell.index_to_xy(i))
            .collect();
        Self::new(sites, supercell.width(), supercell.height(), levels)
    }

    /// A field with every site off.
    pub fn new(
        sites: Vec<(usize, usize)>,
        width: usize,
        height: usize,
        levels: usize,
    ) -> Result<Self, ScreenError> {
        if let Some(&(x, y)) = sites.iter().find(|&&(x, y)| x >= width || y >= height) {
            return Err(ScreenError::grid(format!(
                "dot site ({x}, {y}) outside {width}x{height} field"
            )));
        }
        Ok(Self {
            sites,
            bitmap: Grid::try_new(width, height, 0)?,
            levels: vec![Vec::new(); levels.max(1)],
        })
    }

    pub fn sites(&self) -> &[(usize, usize)] {
        &self.sites
    }

    pub fn bitmap(&self) -> &Grid<u8> {
        &self.bitmap
    }

    /// Site indices switched on at `level`.
    pub fn level(&self, level: usize) -> &[usize] {
        self.levels.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `level + 1` for the level `site` was switched on at, `0` if it never was.
    pub fn level_rank(&self, site: usize) -> u32 {
        self.levels
            .iter()
            .position(|dots| dots.contains(&site))
            .map_or(0, |level| level as u32 + 1)
    }

    pub fn is_on(&self, site: usize) -> bool {
        let (x, y) = self.sites[site];
        self.bitmap.at(x, y) == 1
    }

    /// Switch on `count` distinct random sites as level 0.
    pub fn seed_random<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<(), ScreenError> {
        if count > self.sites.len() {
            return Err(ScreenError::InternalConsistency(format!(
                "cannot seed {count} dots into {} sites",
                self.sites.len()
            )));
        }
        for site in rand::seq::index::sample(rng, self.sites.len(), count).into_iter() {
            self.switch(site, 1);
            self.levels[0].push(site);
        }
        Ok(())
    }

    /// Switch every site on as level 0.
    pub fn seed_all(&mut self) {
        for site in 0..self.sites.len() {
            self.switch(site, 1);
            self.levels[0].push(site);
        }
    }

    /// Switch on the given sites as level 0.
    #[cfg(test)]
    pub(crate) fn seed_sites(&mut self, sites: &[usize]) {
        for &site in sites {
            self.switch(site, 1);
            self.levels[0].push(site);
        }
    }

    fn switch(&mut self, site: usize, state: u8) {
        let (x, y) = self.sites[site];
        self.bitmap.set(x, y, state);
    }

    /// The site in `state` closest to `target`; the first one wins ties.
    fn nearest(&self, target: (usize, usize), state: u8) -> Option<usize> {
        let (cols, rows) = (self.bitmap.width() as i64, self.bitmap.height() as i64);
        let (tx, ty) = (target.0 as i64, target.1 as i64);
        let mut best = cols * cols + rows * rows;
        let mut found = None;
        for (i, &(x, y)) in self.sites.iter().enumerate() {
            let (dx, dy) = (x as i64 - tx, y as i64 - ty);
            let dist = dx * dx + dy * dy;
            if dist < best && self.bitmap.at(x, y) == state {
                best = dist;
                found = Some(i);
            }
        }
        found
    }
}

/// Spread the level-0 dots until moving one no longer changes the pattern.
///
/// Each pass turns off the ON dot nearest the brightest spot of the blurred
/// bitmap, re-blurs, and turns on the OFF dot nearest the darkest spot. The
/// loop ends when both are the same dot or after `max_passes` passes.
pub fn relocate_seed_dots(
    field: &mut DotField,
    filter: &GaussianFilter,
    max_passes: usize,
) -> Result<Relocation, ScreenError> {
    for pass in 1..=max_passes {
        let blur = filter.apply(&field.bitmap);
        let black = field.nearest(blur.max_pos, 1).ok_or_else(|| {
            ScreenError::InternalConsistency("no ON dot left to relocate".to_string())
        })?;
        field.switch(black, 0);

        let blur = filter.apply(&field.bitmap);
        let white = field.nearest(blur.min_pos, 0).ok_or_else(|| {
            ScreenError::InternalConsistency("no OFF dot to relocate into".to_string())
        })?;
        field.switch(white, 1);

        if white == black {
            return Ok(Relocation {
                passes: pass,
                converged: true,
            });
        }

        let slot = field.levels[0].iter().position(|&site| site == black).ok_or_else(|| {
            ScreenError::InternalConsistency(format!(
                "relocated dot {:?} is not a level-0 dot",
                field.sites[black]
            ))
        })?;
        field.levels[0][slot] = white;
    }

    Ok(Relocation {
        passes: max_passes,
        converged: false,
    })
}

/// Switch on `count` more dots as `level`, each in the emptiest spot.
pub fn add_level_dots(
    field: &mut DotField,
    filter: &GaussianFilter,
    level: usize,
    count: usize,
) -> Result<(), ScreenError> {
    if level >= field.levels.len() {
        return Err(ScreenError::InternalConsistency(format!(
            "dither level {level} out of range"
        )));
    }
    for _ in 0..count {
        let blur = filter.apply(&field.bitmap);
        let white = field.nearest(blur.min_pos, 0).ok_or_else(|| {
            ScreenError::InternalConsistency(format!("no OFF dot left for level {level}"))
        })?;
        field.switch(white, 1);
        field.levels[level].push(white);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_field(side: usize, spacing: usize, levels: usize) -> DotField {
        let sites = (0..side)
            .flat_map(|y| (0..side).map(move |x| (x * spacing, y * spacing)))
            .collect();
        DotField::new(sites, side * spacing, side * spacing, levels).unwrap()
    }

    #[test]
    fn test_seed_random_picks_distinct_sites() {
        let mut field = square_field(4, 4, 2);
        let mut rng = StdRng::seed_from_u64(7);
        field.seed_random(5, &mut rng).unwrap();
        let mut seeded = field.level(0).to_vec();
        seeded.sort_unstable();
        seeded.dedup();
        assert_eq!(seeded.len(), 5);
        assert_eq!(field.bitmap().count_eq(1), 5);
    }

    #[test]
    fn test_seed_random_rejects_overflow() {
        let mut field = square_field(2, 4, 1);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(field.seed_random(5, &mut rng).is_err());
    }

    #[test]
    fn test_full_field_settles_in_one_pass() {
        let mut field = square_field(4, 4, 1);
        field.seed_all();
        let filter = GaussianFilter::new(1.0, 1.0).unwrap();
        let outcome = relocate_seed_dots(&mut field, &filter, 64).unwrap();
        assert_eq!(
            outcome,
            Relocation {
                passes: 1,
                converged: true
            }
        );
        assert_eq!(field.bitmap().count_eq(1), 16);
    }

    #[test]
    fn test_relocation_keeps_dot_count() {
        let mut field = square_field(6, 4, 2);
        let mut rng = StdRng::seed_from_u64(42);
        field.seed_random(12, &mut rng).unwrap();
        let filter = GaussianFilter::new(1.5, 1.5).unwrap();
        let outcome = relocate_seed_dots(&mut field, &filter, 4 * 36).unwrap();
        assert!(outcome.passes >= 1);
        assert_eq!(field.bitmap().count_eq(1), 12);
        assert_eq!(field.level(0).len(), 12);
        assert!(field.level(0).iter().all(|&s| field.is_on(s)));
    }

    #[test]
    fn test_added_dots_fill_the_largest_gap() {
        // Two sites on a 16 pixel wide strip: one on, the other must follow.
        let sites = vec![(0, 0), (8, 0)];
        let mut field = DotField::new(sites, 16, 1, 2).unwrap();
        field.switch(0, 1);
        field.levels[0].push(0);
        let filter = GaussianFilter::new(1.0, 0.0).unwrap();
        add_level_dots(&mut field, &filter, 1, 1).unwrap();
        assert_eq!(field.level(1), &[1]);
        assert_eq!(field.level_rank(0), 1);
        assert_eq!(field.level_rank(1), 2);
    }

    #[test]
    fn test_adding_past_the_last_site_fails() {
        let mut field = square_field(2, 4, 2);
        field.seed_all();
        let filter = GaussianFilter::new(1.0, 1.0).unwrap();
        let err = add_level_dots(&mut field, &filter, 1, 1).unwrap_err();
        assert!(matches!(err, ScreenError::InternalConsistency(_)));
    }

    #[test]
    fn test_unplaced_site_has_rank_zero() {
        let field = square_field(2, 4, 2);
        assert_eq!(field.level_rank(3), 0);
    }
}
